use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::DbPool;
use crate::error::Result;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Inserts a request in `Applied` state with `applied_on` set to today.
/// Start/end ordering and overlaps are not checked.
pub async fn apply_leave(
    pool: &DbPool,
    emp_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
) -> Result<LeaveRequest> {
    let applied_on = Local::now().date_naive();

    let result = sqlx::query(
        r#"
        INSERT INTO leaves (emp_id, start_date, end_date, reason, status, applied_on)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(emp_id)
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(LeaveStatus::Applied.to_string())
    .bind(applied_on)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!(id, emp_id, %start_date, %end_date, "Leave applied");

    Ok(LeaveRequest {
        id,
        emp_id,
        start_date,
        end_date,
        reason: reason.to_string(),
        status: LeaveStatus::Applied.to_string(),
        applied_on,
    })
}

/// Unconditional status overwrite; any status is reachable from any
/// status.
pub async fn set_leave_status(pool: &DbPool, leave_id: i64, status: LeaveStatus) -> Result<()> {
    sqlx::query("UPDATE leaves SET status = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(leave_id)
        .execute(pool)
        .await?;
    info!(leave_id, %status, "Leave status set");
    Ok(())
}

pub async fn list_leaves(pool: &DbPool) -> Result<Vec<LeaveRequest>> {
    let leaves = sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, emp_id, start_date, end_date, reason, status, applied_on FROM leaves ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(leaves)
}
