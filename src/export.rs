use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::info;

use crate::db::DbPool;
use crate::error::Result;
use crate::service::attendance::query_attendance;

const ATTENDANCE_HEADERS: [&str; 3] = ["emp_id", "date", "status"];

/// Writes the filtered attendance history as CSV. Returns the number of
/// data rows written.
pub async fn export_attendance_csv(
    pool: &DbPool,
    emp_id: Option<i64>,
    year: Option<i32>,
    month: Option<u32>,
    out: &Path,
) -> Result<usize> {
    let rows = query_attendance(pool, emp_id, year, month).await?;

    let mut writer = csv::Writer::from_path(out)?;
    writer.write_record(ATTENDANCE_HEADERS)?;
    for row in &rows {
        writer.write_record([
            row.emp_id.to_string(),
            row.att_date.to_string(),
            row.status.clone(),
        ])?;
    }
    writer.flush()?;

    info!(path = %out.display(), rows = rows.len(), "Attendance exported to CSV");
    Ok(rows.len())
}

/// Same table as the CSV export, written as a single-sheet workbook.
pub async fn export_attendance_xlsx(
    pool: &DbPool,
    emp_id: Option<i64>,
    year: Option<i32>,
    month: Option<u32>,
    out: &Path,
) -> Result<usize> {
    let rows = query_attendance(pool, emp_id, year, month).await?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in ATTENDANCE_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let excel_row = (i + 1) as u32;
        worksheet.write_number(excel_row, 0, row.emp_id as f64)?;
        worksheet.write_string(excel_row, 1, row.att_date.to_string())?;
        worksheet.write_string(excel_row, 2, &row.status)?;
    }
    workbook.save(out)?;

    info!(path = %out.display(), rows = rows.len(), "Attendance exported to XLSX");
    Ok(rows.len())
}
