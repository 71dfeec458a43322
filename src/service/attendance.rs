use chrono::NaiveDate;
use tracing::info;

use crate::db::DbPool;
use crate::error::{Error, Result};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, MarkTarget};

/// Upserts one attendance row per targeted employee. The `All` fan-out
/// runs inside a single transaction, so a mid-write fault leaves no
/// partially marked day.
pub async fn mark_attendance(
    pool: &DbPool,
    target: MarkTarget,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<u64> {
    let marked = match target {
        MarkTarget::One(emp_id) => {
            sqlx::query(
                "INSERT OR REPLACE INTO attendance (emp_id, att_date, status) VALUES (?, ?, ?)",
            )
            .bind(emp_id)
            .bind(date)
            .bind(status.to_string())
            .execute(pool)
            .await?;
            1
        }
        MarkTarget::All => {
            let mut tx = pool.begin().await?;

            let emp_ids = sqlx::query_scalar::<_, i64>("SELECT id FROM employees")
                .fetch_all(&mut *tx)
                .await?;

            for emp_id in &emp_ids {
                sqlx::query(
                    "INSERT OR REPLACE INTO attendance (emp_id, att_date, status) VALUES (?, ?, ?)",
                )
                .bind(emp_id)
                .bind(date)
                .bind(status.to_string())
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            emp_ids.len() as u64
        }
    };

    info!(%date, %status, marked, "Attendance marked");
    Ok(marked)
}

/// Conjunctive filter: the employee clause applies only for a concrete
/// id, the date clause only when BOTH year and month are given (one
/// without the other means no date filter). Rows come back in store
/// order.
pub async fn query_attendance(
    pool: &DbPool,
    emp_id: Option<i64>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Vec<AttendanceRecord>> {
    // Helper enum for typed SQLx binding
    enum FilterValue {
        Id(i64),
        Date(NaiveDate),
    }

    let mut sql = String::from("SELECT emp_id, att_date, status FROM attendance WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(id) = emp_id {
        sql.push_str(" AND emp_id = ?");
        args.push(FilterValue::Id(id));
    }

    if let (Some(year), Some(month)) = (year, month) {
        let (first, last) = month_bounds(year, month)?;
        sql.push_str(" AND att_date BETWEEN ? AND ?");
        args.push(FilterValue::Date(first));
        args.push(FilterValue::Date(last));
    }

    let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
    for arg in args {
        query = match arg {
            FilterValue::Id(v) => query.bind(v),
            FilterValue::Date(d) => query.bind(d),
        };
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// First and last true calendar day of a month (leap-aware).
pub(crate) fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Validation(format!("invalid month {year}-{month}")))?;

    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::Validation(format!("invalid month {year}-{month}")))?;

    Ok((first, last))
}
