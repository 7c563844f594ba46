pub mod constants;
pub mod ini;
pub mod locator;
pub mod models;
pub mod settings;
pub mod utils;

// Re-export the engine entry points for easier access
pub use ini::{apply, backup, is_configured, patch, PatchError};
pub use models::{ApplyOutcome, BackupStatus, KeyTarget, PatchResult};

// Re-export configuration types
pub use settings::{Settings, SettingsError};
