use serde::Serialize;

use crate::db::DbPool;
use crate::error::Result;
use crate::service::attendance::month_bounds;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub emp_id: i64,
    pub name: String,
    pub present: i64,
    pub total_marked: i64,
    pub percentage: f64,
}

/// Per-employee attendance percentage for one month. Every employee
/// appears, including those with no marked days. The divisor is the
/// number of MARKED days in the month, not the calendar length; zero
/// marked days yields percentage 0.
pub async fn monthly_attendance_percentage(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<AttendanceSummary>> {
    let (first, last) = month_bounds(year, month)?;

    let rows: Vec<(i64, String, i64, i64)> = sqlx::query_as(
        r#"
        SELECT e.id, e.name,
               COALESCE(SUM(CASE WHEN a.status = 'Present' THEN 1 ELSE 0 END), 0),
               COUNT(a.id)
        FROM employees e
        LEFT JOIN attendance a ON e.id = a.emp_id AND a.att_date BETWEEN ? AND ?
        GROUP BY e.id, e.name
        ORDER BY e.id
        "#,
    )
    .bind(first)
    .bind(last)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .into_iter()
        .map(|(emp_id, name, present, total_marked)| {
            let percentage = if total_marked > 0 {
                round2(present as f64 / total_marked as f64 * 100.0)
            } else {
                0.0
            };
            AttendanceSummary {
                emp_id,
                name,
                present,
                total_marked,
                percentage,
            }
        })
        .collect();

    Ok(summaries)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::attendance::{AttendanceStatus, MarkTarget};
    use crate::service::attendance::mark_attendance;
    use chrono::NaiveDate;

    async fn seed_employee(pool: &DbPool, name: &str) -> i64 {
        sqlx::query(
            r#"
            INSERT INTO employees (name, age, department, designation, salary, email, phone, status, photo)
            VALUES (?, 30, 'IT', 'Engineer', 50000, '', '', 'Active', '')
            "#,
        )
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn zero_marked_days_yields_zero_percent() {
        let pool = db::init_memory().await.unwrap();
        let id = seed_employee(&pool, "Alice").await;

        let report = monthly_attendance_percentage(&pool, 2024, 6).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].emp_id, id);
        assert_eq!(report[0].present, 0);
        assert_eq!(report[0].total_marked, 0);
        assert_eq!(report[0].percentage, 0.0);
    }

    #[tokio::test]
    async fn percentage_divides_by_marked_days_only() {
        let pool = db::init_memory().await.unwrap();
        let id = seed_employee(&pool, "Alice").await;

        // 20 marked days in a 30-day month: 18 present, 2 absent
        for d in 1..=20 {
            let status = if d <= 18 {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            mark_attendance(&pool, MarkTarget::One(id), day(2024, 6, d), status)
                .await
                .unwrap();
        }

        let report = monthly_attendance_percentage(&pool, 2024, 6).await.unwrap();
        assert_eq!(report[0].present, 18);
        assert_eq!(report[0].total_marked, 20);
        assert_eq!(report[0].percentage, 90.0);
    }

    #[tokio::test]
    async fn marks_outside_the_month_are_ignored() {
        let pool = db::init_memory().await.unwrap();
        let id = seed_employee(&pool, "Alice").await;

        mark_attendance(&pool, MarkTarget::One(id), day(2024, 5, 31), AttendanceStatus::Present)
            .await
            .unwrap();
        mark_attendance(&pool, MarkTarget::One(id), day(2024, 6, 3), AttendanceStatus::Present)
            .await
            .unwrap();

        let report = monthly_attendance_percentage(&pool, 2024, 6).await.unwrap();
        assert_eq!(report[0].total_marked, 1);
        assert_eq!(report[0].percentage, 100.0);
    }

    #[test]
    fn rounding_is_two_decimal_places() {
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
    }
}
