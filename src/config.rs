use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Process-wide configuration, resolved once at startup and passed
/// explicitly into each component.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub qr_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "employees.db".to_string())
                .into(),
            qr_dir: env::var("QR_DIR")
                .unwrap_or_else(|_| "static/qr_codes".to_string())
                .into(),
            export_dir: env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "exports".to_string())
                .into(),
        }
    }
}
