use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use ao_patcher::constants::{EXIT_ABORTED, EXIT_SETUP, EXIT_WRITE_FAILED};
use ao_patcher::ini::{self, restore_backup};
use ao_patcher::locator::{existing_ini_path, locate_game_dir, LocateError};
use ao_patcher::utils::file::dir_exists;
use ao_patcher::utils::http::probe_server;
use ao_patcher::utils::url::{join_url, normalize_base_url};
use ao_patcher::utils::trim;
use ao_patcher::{ApplyOutcome, BackupStatus, PatchResult, Settings};

const PROBE_FAILED_QUESTION: &str =
    "Warning: The server did not respond with 2xx/3xx. Continue patch? [y/N]:";

/// Point a Batman: Arkham Origins install at a community online server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address, e.g. http://your-domain:8385/ or your-domain:8385
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Game folder, e.g. "C:\...\Batman Arkham Origins"
    #[arg(short, long, value_name = "DIR")]
    game: Option<PathBuf>,

    /// Path to the settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Key to point at the server, repeatable; overrides the settings file
    #[arg(short, long = "key", value_name = "KEY")]
    keys: Vec<String>,

    /// Only report server reachability and whether a patch is needed
    #[arg(long)]
    test: bool,

    /// Do not contact the server before patching
    #[arg(long)]
    skip_probe: bool,

    /// Patch even if the server does not respond
    #[arg(short, long)]
    yes: bool,

    /// Restore the configuration file from its latest backup
    #[arg(long, conflicts_with_all = ["server", "test"])]
    restore: bool,

    /// Exit immediately instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    let code = run(&args);

    if cfg!(windows) && !args.no_pause && io::stdin().is_terminal() {
        pause_on_exit();
    }
    code
}

fn run(args: &Args) -> ExitCode {
    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };
    let keys: &[String] = if args.keys.is_empty() {
        &settings.patch.keys
    } else {
        &args.keys
    };

    let game_dir = match locate_game_dir(&settings.locators(args.game.as_deref())) {
        Ok(dir) => dir,
        Err(LocateError::NotFound) => match prompt_game_dir(&settings.game.folder_name) {
            Ok(dir) => dir,
            Err(e) => {
                println!("{}", e);
                return ExitCode::from(EXIT_SETUP);
            }
        },
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };

    let ini_path = match existing_ini_path(&game_dir, &settings.game.ini_relative_path) {
        Ok(path) => path,
        Err(e) => {
            println!("{}", e);
            println!("Expected: {}", settings.game.ini_relative_path);
            return ExitCode::from(EXIT_SETUP);
        }
    };

    if args.restore {
        return match restore_backup(&ini_path) {
            Ok(backup) => {
                println!("Restored {} from {}", ini_path.display(), backup.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("{}", e);
                ExitCode::from(EXIT_SETUP)
            }
        };
    }

    let raw_server = match args.server.clone() {
        Some(server) => server,
        None if !settings.server.default.is_empty() => settings.server.default.clone(),
        None => prompt(
            "Enter the server address (example: http://your-domain:8385/ or your-domain:8385):",
        )
        .unwrap_or_default(),
    };
    let server = normalize_base_url(&raw_server);
    if server.is_empty() {
        println!("Empty address.");
        return ExitCode::from(EXIT_SETUP);
    }

    if settings.probe.enabled && !args.skip_probe {
        println!("Server check: {} ...", join_url(&server, &settings.probe.path));
        if probe_server(&server, &settings.probe.path, &settings.probe_options()) {
            println!("OK: The server is responding.");
            print_banner();
        } else if args.test {
            println!("Warning: The server did not respond with 2xx/3xx.");
        } else if !args.yes && !confirm(PROBE_FAILED_QUESTION) {
            return ExitCode::from(EXIT_ABORTED);
        }
    }

    if args.test {
        if ini::is_configured(&ini_path, &server, keys) {
            report_configured(&server, &ini_path);
        } else {
            println!("Patch needed for -> {}", server);
            println!("INI: {}", ini_path.display());
        }
        return ExitCode::SUCCESS;
    }

    match ini::apply(&ini_path, &server, keys, settings.patch.backup) {
        Ok(ApplyOutcome::AlreadyConfigured) => report_configured(&server, &ini_path),
        Ok(ApplyOutcome::Patched { result, backup }) => {
            if backup == BackupStatus::Failed {
                println!("Warning: Failed to create backup INI.");
            }
            report_patched(&server, &ini_path, &result);
        }
        Err(e) if e.exit_code() == EXIT_WRITE_FAILED => {
            error!("{}", e);
            println!("Error: Failed to write INI.");
            return ExitCode::from(EXIT_WRITE_FAILED);
        }
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    }
    ExitCode::SUCCESS
}

fn report_configured(server: &str, ini_path: &Path) {
    println!("Already configured for -> {}", server);
    println!("INI: {}", ini_path.display());
    println!("Nothing to change. Launch the game.");
}

fn report_patched(server: &str, ini_path: &Path, result: &PatchResult) {
    info!(
        "Patched {} ({} changed, {} added)",
        ini_path.display(),
        result.changed.len(),
        result.added.len()
    );

    println!("Done! Updated values -> {}", server);
    println!("INI: {}", ini_path.display());
    for line in result.summary_lines() {
        println!("{}", line);
    }
    println!(
        "Launch the game. To restore, replace the INI with the .bak file created next to it \
         or run again with --restore."
    );
}

fn prompt_game_dir(folder_name: &str) -> Result<PathBuf, LocateError> {
    let answer = prompt(&format!(
        "Unable to find game folder. Please enter the path to \"{}\":",
        folder_name
    ))
    .ok_or(LocateError::NotFound)?;

    let dir = PathBuf::from(answer);
    if dir_exists(&dir) {
        Ok(dir)
    } else {
        Err(LocateError::NoSuchDir(dir))
    }
}

/// Prints `question` and reads one trimmed line, `None` on end of input
fn prompt(question: &str) -> Option<String> {
    println!("{}", question);
    print!("> ");
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(trim(&line).to_string()),
    }
}

fn confirm(question: &str) -> bool {
    print!("{} ", question);
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
        .map(|answer| answer.starts_with(&['y', 'Y'][..]))
        .unwrap_or(false)
}

fn pause_on_exit() {
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let _ = read_answer(&mut io::stdin().lock());
}

fn print_banner() {
    println!();
    println!("        _.-/\\    /\\-._");
    println!("      ./  /  \\__/  \\  \\.");
    println!("     /___/          \\___\\");
    println!();
    println!("  C O N N E C T E D    T O    B A T C O M P U T E R");
    println!();
}
