//! Defaults matching the stock Batman: Arkham Origins install.

/// Folder the game is installed into below a Steam library
pub const GAME_FOLDER_NAME: &str = "Batman Arkham Origins";

/// Location of the online services configuration, relative to the game folder
pub const INI_RELATIVE_PATH: &str = "Online/BmGame/Config/DefaultWBIDVars.ini";

/// Keys pointing the client at its online backend
pub const DEFAULT_KEYS: &[&str] = &["BaseUrl"];

/// Endpoint requested by the reachability probe
pub const PROBE_PATH: &str = "/store/catalog/general";

/// Steam library locations tried when the registry has nothing useful
pub const FALLBACK_STEAM_LIBRARIES: &[&str] = &[
    "C:\\Program Files (x86)\\Steam",
    "D:\\Steam",
    "E:\\Steam",
];

/// Steam registry values, tried in order
pub const STEAM_REGISTRY_VALUES: &[(crate::utils::system::RegistryRoot, &str, &str)] = &[
    (
        crate::utils::system::RegistryRoot::LocalMachine,
        "SOFTWARE\\WOW6432Node\\Valve\\Steam",
        "InstallPath",
    ),
    (
        crate::utils::system::RegistryRoot::CurrentUser,
        "SOFTWARE\\Valve\\Steam",
        "SteamPath",
    ),
];

/// Process exit code for setup problems: no game folder, no INI, empty
/// address, bad settings
pub const EXIT_SETUP: u8 = 1;

/// Process exit code when the user declines to patch after a failed probe
pub const EXIT_ABORTED: u8 = 2;

/// Process exit code when the patched file could not be written
pub const EXIT_WRITE_FAILED: u8 = 3;
