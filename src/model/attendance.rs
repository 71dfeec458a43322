use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub emp_id: i64,
    pub att_date: NaiveDate,
    pub status: String,
}

/// Which employees a mark operation applies to. `All` fans out over every
/// id currently in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkTarget {
    All,
    One(i64),
}
