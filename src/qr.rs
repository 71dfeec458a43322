use image::Luma;
use qrcode::QrCode;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::employee::Employee;

/// Encodes the identification payload for one employee into a PNG under
/// the configured QR directory. Regenerated on every add/update; files
/// from a prior name are left behind.
pub fn generate_qr(config: &Config, employee: &Employee) -> Result<PathBuf> {
    let payload = format!(
        "ID: {}\nName: {}\nDept: {}\nDesig: {}",
        employee.id, employee.name, employee.department, employee.designation
    );

    let code = QrCode::new(payload.as_bytes())?;
    let image = code.render::<Luma<u8>>().build();

    fs::create_dir_all(&config.qr_dir)?;
    let path = config.qr_dir.join(format!("{}_{}.png", employee.id, employee.name));
    image.save(&path)?;

    debug!(path = %path.display(), "QR artifact written");
    Ok(path)
}
