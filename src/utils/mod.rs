pub mod file;
pub mod http;
pub mod string;
pub mod system;
pub mod url;

// Re-export common utilities
pub use string::{starts_with_insensitive, trim};
pub use url::{normalize_base_url, normalize_url_for_compare};
