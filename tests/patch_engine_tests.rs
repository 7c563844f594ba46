use std::fs;
use std::path::{Path, PathBuf};

use ao_patcher::constants::{EXIT_SETUP, EXIT_WRITE_FAILED};
use ao_patcher::ini::backup::{static_backup_path, timestamped_backup_path};
use ao_patcher::ini::{self, ConfigDocument, PatchError};
use ao_patcher::{ApplyOutcome, BackupStatus};
use ao_patcher::utils::url::normalize_base_url;
use tempfile::TempDir;

fn write_ini(dir: &TempDir, content: &[u8]) -> PathBuf {
    let path = dir.path().join("DefaultWBIDVars.ini");
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap()
}

#[cfg(test)]
mod patch_engine_tests {
    use super::*;

    const KEYS: &[&str] = &["BaseUrl"];

    #[test]
    fn test_scenario_a_rewrites_existing_key() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            b"[Online]\nBaseUrl=http://old.example:8385/\nTimeout=30\n",
        );

        let result = ini::patch(&path, "http://new.example:8385/", KEYS).unwrap();

        assert_eq!(
            read(&path),
            b"[Online]\nBaseUrl=\"http://new.example:8385/\"\nTimeout=30\n"
        );
        assert_eq!(result.changed, vec!["BaseUrl"]);
        assert!(result.added.is_empty());
        assert!(result.written);
    }

    #[test]
    fn test_scenario_b_appends_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"[Online]\nTimeout=30\n");

        let result = ini::patch(&path, "http://x:8385/", KEYS).unwrap();

        assert_eq!(
            read(&path),
            b"[Online]\nTimeout=30\nBaseUrl=\"http://x:8385/\"\n"
        );
        assert!(result.changed.is_empty());
        assert_eq!(result.added, vec!["BaseUrl"]);
    }

    #[test]
    fn test_scenario_c_configured_file_is_untouched() {
        let dir = TempDir::new().unwrap();
        let original = b"baseurl=\"http://x:8385/\"\r\nOther=1";
        let path = write_ini(&dir, original);
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        assert!(ini::is_configured(&path, "http://x:8385/", KEYS));

        let result = ini::patch(&path, "http://x:8385/", KEYS).unwrap();
        assert!(result.is_noop());
        assert!(result.changed.is_empty());
        assert!(result.added.is_empty());
        assert_eq!(read(&path), original);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_scenario_d_address_is_normalized_before_use() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=old\n");

        let server = normalize_base_url("x:8385");
        assert_eq!(server, "http://x:8385/");

        ini::patch(&path, &server, KEYS).unwrap();
        assert_eq!(read(&path), b"BaseUrl=\"http://x:8385/\"\n");
        assert!(ini::is_configured(&path, "x:8385", KEYS));
    }

    #[test]
    fn test_second_patch_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            b"; comment\r\nbaseurl = 'http://old/'\r\nEchoUrl=old\nTail",
        );
        let keys = ["BaseUrl", "EchoUrl", "StoreUrl"];

        let first = ini::patch(&path, "http://x:8385/", &keys).unwrap();
        assert_eq!(first.changed, vec!["BaseUrl", "EchoUrl"]);
        assert_eq!(first.added, vec!["StoreUrl"]);
        let after_first = read(&path);

        let second = ini::patch(&path, "http://x:8385/", &keys).unwrap();
        assert!(!second.written);
        assert!(second.changed.is_empty());
        assert!(second.added.is_empty());
        assert_eq!(read(&path), after_first);
        assert!(ini::is_configured(&path, "http://x:8385/", &keys));
    }

    #[test]
    fn test_mixed_line_endings_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            b"A=1\r\nBaseUrl=old\nB=2\r\nEchoUrl=old\r\nC=3\n",
        );

        ini::patch(&path, "http://x/", &["BaseUrl", "EchoUrl", "StoreUrl"]).unwrap();

        assert_eq!(
            read(&path),
            b"A=1\r\nBaseUrl=\"http://x/\"\nB=2\r\nEchoUrl=\"http://x/\"\r\nC=3\nStoreUrl=\"http://x/\"\r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_untargeted_lines_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let original: &[u8] =
            b"[Section]\r\n  spaced = value  \r\n\r\n;BaseUrl=commented\n\t\xe9\xff raw\nBaseUrl=old";
        let path = write_ini(&dir, original);

        ini::patch(&path, "http://x/", &["BaseUrl"]).unwrap();
        let patched = read(&path);

        let before_doc = ConfigDocument::from_bytes(original);
        let before: Vec<&[u8]> = before_doc
            .lines()
            .map(|l| l.raw)
            .collect();
        let doc = ConfigDocument::from_bytes(patched.clone());
        let after: Vec<&[u8]> = doc.lines().map(|l| l.raw).collect();

        assert_eq!(before.len(), after.len());
        assert_eq!(&before[..5], &after[..5]);
        assert_eq!(after[5], b"BaseUrl=\"http://x/\"");
    }

    #[test]
    fn test_quotes_are_normalized_on_change() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl='http://old/'\nEchoUrl=http://old/\n");

        ini::patch(&path, "http://new/", &["BaseUrl", "EchoUrl"]).unwrap();

        assert_eq!(
            read(&path),
            b"BaseUrl=\"http://new/\"\nEchoUrl=\"http://new/\"\n"
        );
    }

    #[test]
    fn test_configured_implies_patch_is_noop() {
        let samples: &[&[u8]] = &[
            b"BaseUrl=\"http://x:8385/\"\n",
            b"  BASEURL = http://x:8385\r\n",
            b"baseurl='x:8385/'",
            b"BaseUrl=x:8385\nbaseurl=\"http://x:8385/\"\n",
        ];

        for sample in samples {
            let dir = TempDir::new().unwrap();
            let path = write_ini(&dir, sample);

            assert!(ini::is_configured(&path, "http://x:8385/", KEYS));
            let result = ini::patch(&path, "http://x:8385/", KEYS).unwrap();
            assert!(result.is_noop());
            assert_eq!(read(&path), *sample);
        }
    }

    #[test]
    fn test_missing_file_fails_closed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.ini");

        assert!(!ini::is_configured(&path, "http://x/", KEYS));
        assert!(matches!(
            ini::patch(&path, "http://x/", KEYS),
            Err(PatchError::Read { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=old\n");

        assert!(matches!(
            ini::patch(&path, "http://x/", &["Base=Url"]),
            Err(PatchError::InvalidKey(_))
        ));
        assert!(!ini::is_configured(&path, "http://x/", &["Base=Url"]));
        assert_eq!(read(&path), b"BaseUrl=old\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_directory_reports_write_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=old\n");
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o500)).unwrap();

        // root ignores directory permissions
        let probe = dir.path().join("probe");
        if fs::write(&probe, b"").is_ok() {
            let _ = fs::remove_file(&probe);
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o700)).unwrap();
            return;
        }

        let result = ini::patch(&path, "http://x/", KEYS);
        let applied = ini::apply(&path, "http://x/", KEYS, true);
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o700)).unwrap();

        assert!(matches!(result, Err(PatchError::Write { .. })));
        let err = applied.unwrap_err();
        assert!(matches!(err, PatchError::Write { .. }));
        assert_eq!(err.exit_code(), EXIT_WRITE_FAILED);
        assert_eq!(read(&path), b"BaseUrl=old\n");
    }

    #[test]
    fn test_empty_address_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=http://old/\n");

        for address in ["", " \t\r\n", "http://"] {
            let err = ini::patch(&path, address, KEYS).unwrap_err();
            assert!(matches!(err, PatchError::InvalidAddress(_)));
            assert_eq!(err.exit_code(), EXIT_SETUP);
            assert!(!ini::is_configured(&path, address, KEYS));
        }
        assert_eq!(read(&path), b"BaseUrl=http://old/\n");
    }

    #[test]
    fn test_empty_key_list_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=http://old/\n");
        let no_keys: [&str; 0] = [];

        assert!(matches!(
            ini::patch(&path, "http://x/", &no_keys),
            Err(PatchError::NoKeys)
        ));
        assert!(!ini::is_configured(&path, "http://x/", &no_keys));
        assert_eq!(read(&path), b"BaseUrl=http://old/\n");
    }

    #[test]
    fn test_apply_backs_up_then_patches() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=http://old/\r\n");

        let outcome =
            ini::apply_with_stamp(&path, "http://x/", KEYS, Some("20261019_101500")).unwrap();

        let backup = timestamped_backup_path(&path, "20261019_101500");
        match outcome {
            ApplyOutcome::Patched { result, backup: status } => {
                assert_eq!(status, BackupStatus::Written(backup.clone()));
                assert_eq!(result.changed, vec!["BaseUrl"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(read(&backup), b"BaseUrl=http://old/\r\n");
        assert_eq!(read(&path), b"BaseUrl=\"http://x/\"\r\n");
    }

    #[test]
    fn test_apply_patches_when_backup_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=http://old/\n");
        // directories in the way of both backup names
        fs::create_dir(timestamped_backup_path(&path, "20261019_101500")).unwrap();
        fs::create_dir(static_backup_path(&path)).unwrap();

        let outcome =
            ini::apply_with_stamp(&path, "http://x/", KEYS, Some("20261019_101500")).unwrap();

        match outcome {
            ApplyOutcome::Patched { result, backup } => {
                assert_eq!(backup, BackupStatus::Failed);
                assert!(result.written);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(read(&path), b"BaseUrl=\"http://x/\"\n");
    }

    #[test]
    fn test_apply_leaves_configured_file_and_skips_backup() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"BaseUrl=\"http://x/\"\n");

        let outcome = ini::apply(&path, "x", KEYS, true).unwrap();

        assert_eq!(outcome, ApplyOutcome::AlreadyConfigured);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_apply_without_backup() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(&dir, b"Other=1\n");

        let outcome = ini::apply(&path, "http://x/", KEYS, false).unwrap();

        match outcome {
            ApplyOutcome::Patched { result, backup } => {
                assert_eq!(backup, BackupStatus::Skipped);
                assert_eq!(result.added, vec!["BaseUrl"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
