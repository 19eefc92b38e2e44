//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Get default database path help text for current platform
fn default_database_help() -> String {
    #[cfg(target_os = "linux")]
    return "Database file path (default: ~/.local/share/scribed/scribe.db)".to_string();

    #[cfg(target_os = "macos")]
    return "Database file path (default: ~/Library/Application Support/scribed/scribe.db)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "Database file path (default: %APPDATA%\\scribed\\scribe.db)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Database file path (overrides platform default)".to_string();
}

/// Scribe persistence service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Database file path (overrides platform default)
    #[arg(short, long, help = default_database_help())]
    pub database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Create an admin account and exit (requires --admin-password)
    #[arg(long, value_name = "USERNAME")]
    pub create_admin: Option<String>,

    /// Password for the account created with --create-admin
    #[arg(long, value_name = "PASSWORD", requires = "create_admin")]
    pub admin_password: Option<String>,

    /// Print all accounts as JSON
    #[arg(long, default_value = "false")]
    pub list_users: bool,
}
