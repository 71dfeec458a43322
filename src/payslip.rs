use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::db::DbPool;
use crate::error::{Error, Result};
use crate::model::attendance::AttendanceStatus;
use crate::service::attendance::{month_bounds, query_attendance};
use crate::service::employee::get_employee;
use crate::service::report::round2;

#[derive(Debug, Clone, Serialize)]
pub struct Payslip {
    pub emp_id: i64,
    pub name: String,
    pub present_days: u32,
    pub days_in_month: u32,
    pub payable: f64,
}

/// Renders a one-page payslip PDF. Payable salary divides by the TRUE
/// calendar length of the month, not the marked-day count the percentage
/// report uses.
pub async fn generate_payslip(
    pool: &DbPool,
    emp_id: i64,
    year: i32,
    month: u32,
    out: &Path,
) -> Result<Payslip> {
    let employee = get_employee(pool, emp_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("employee {emp_id}")))?;

    let rows = query_attendance(pool, Some(emp_id), Some(year), Some(month)).await?;
    let present_days = rows
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present.to_string())
        .count() as u32;

    let (_, last) = month_bounds(year, month)?;
    let days_in_month = chrono::Datelike::day(&last);

    let payslip = Payslip {
        emp_id,
        name: employee.name,
        present_days,
        days_in_month,
        payable: round2(employee.salary * f64::from(present_days) / f64::from(days_in_month)),
    };

    render_pdf(&payslip, out)?;
    info!(emp_id, year, month, payable = payslip.payable, "Payslip generated");
    Ok(payslip)
}

fn render_pdf(payslip: &Payslip, out: &Path) -> Result<()> {
    // US Letter
    let (doc, page, layer) = PdfDocument::new(
        format!("Payslip for {}", payslip.name),
        Mm(215.9),
        Mm(279.4),
        "payslip",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Pdf(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);
    layer.use_text(
        format!("Payslip for {}", payslip.name),
        14.0,
        Mm(18.0),
        Mm(260.0),
        &font,
    );
    layer.use_text(
        format!("Present Days: {}/{}", payslip.present_days, payslip.days_in_month),
        12.0,
        Mm(18.0),
        Mm(250.0),
        &font,
    );
    layer.use_text(
        format!("Payable Salary: {:.2}", payslip.payable),
        12.0,
        Mm(18.0),
        Mm(243.0),
        &font,
    );

    let file = File::create(out)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| Error::Pdf(e.to_string()))?;
    Ok(())
}
