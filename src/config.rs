use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Medsafe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "info,medsafe=debug"
}

/// Get the application data directory
/// ~/Medsafe/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Medsafe")
}

/// Get the path of the patient record database
pub fn record_db_path() -> PathBuf {
    app_data_dir().join("record.db")
}
