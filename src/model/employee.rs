use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub photo: String,
}

/// Validated input for an insert or full-row overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub age: i64,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    pub email: String,
    pub phone: String,
    pub status: EmployeeStatus,
    pub photo: String,
}
