//! Employee management core: directory CRUD, attendance ledger, leave
//! tracking, and derived report artifacts (CSV/XLSX exports, PDF payslips,
//! QR identification images) over a local SQLite store.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod model;
pub mod payslip;
pub mod qr;
pub mod service;

pub use config::Config;
pub use db::DbPool;
pub use error::{Error, Result};
