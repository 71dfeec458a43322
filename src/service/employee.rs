use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::db::DbPool;
use crate::error::{Error, Result};
use crate::model::employee::{Employee, EmployeeStatus, NewEmployee};
use crate::qr;

/// Raw form fields as the dispatch layer posts them. Coerced into a
/// `NewEmployee` before touching the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeForm {
    pub name: String,
    pub age: String,
    pub department: String,
    pub designation: String,
    pub salary: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    #[serde(default)]
    pub photo: String,
}

impl EmployeeForm {
    pub fn parse(self) -> Result<NewEmployee> {
        let age: i64 = self
            .age
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("age must be a whole number, got {:?}", self.age)))?;
        let salary: f64 = self
            .salary
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("salary must be a number, got {:?}", self.salary)))?;
        let status: EmployeeStatus = self
            .status
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("unknown employee status {:?}", self.status)))?;

        Ok(NewEmployee {
            name: self.name,
            age,
            department: self.department,
            designation: self.designation,
            salary,
            email: self.email,
            phone: self.phone,
            status,
            photo: self.photo,
        })
    }
}

/// Inserts a new employee and emits the QR identification artifact for
/// the assigned id.
pub async fn add_employee(pool: &DbPool, config: &Config, emp: NewEmployee) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, age, department, designation, salary, email, phone, status, photo)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&emp.name)
    .bind(emp.age)
    .bind(&emp.department)
    .bind(&emp.designation)
    .bind(emp.salary)
    .bind(&emp.email)
    .bind(&emp.phone)
    .bind(emp.status.to_string())
    .bind(&emp.photo)
    .execute(pool)
    .await?;

    let emp_id = result.last_insert_rowid();
    info!(emp_id, name = %emp.name, "Employee added");

    regenerate_qr(pool, config, emp_id).await?;
    Ok(emp_id)
}

/// Full-row overwrite. Matches zero rows without error when the id does
/// not exist.
pub async fn update_employee(pool: &DbPool, config: &Config, emp_id: i64, emp: NewEmployee) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, age = ?, department = ?, designation = ?, salary = ?,
            email = ?, phone = ?, status = ?, photo = ?
        WHERE id = ?
        "#,
    )
    .bind(&emp.name)
    .bind(emp.age)
    .bind(&emp.department)
    .bind(&emp.designation)
    .bind(emp.salary)
    .bind(&emp.email)
    .bind(&emp.phone)
    .bind(emp.status.to_string())
    .bind(&emp.photo)
    .bind(emp_id)
    .execute(pool)
    .await?;

    debug!(emp_id, rows = result.rows_affected(), "Employee updated");

    regenerate_qr(pool, config, emp_id).await?;
    Ok(())
}

/// Removes the directory row. Attendance and leave history referencing
/// the id is retained.
pub async fn delete_employee(pool: &DbPool, emp_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(emp_id)
        .execute(pool)
        .await?;
    info!(emp_id, "Employee deleted");
    Ok(())
}

pub async fn get_employee(pool: &DbPool, emp_id: i64) -> Result<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(emp_id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn list_employees(pool: &DbPool) -> Result<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(employees)
}

/// Department names in insertion order, for selection inputs.
pub async fn list_departments(pool: &DbPool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM departments ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(names)
}

async fn regenerate_qr(pool: &DbPool, config: &Config, emp_id: i64) -> Result<()> {
    if let Some(employee) = get_employee(pool, emp_id).await? {
        qr::generate_qr(config, &employee)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::TempDir;

    fn sample_form(name: &str) -> EmployeeForm {
        EmployeeForm {
            name: name.to_string(),
            age: "30".to_string(),
            department: "IT".to_string(),
            designation: "Engineer".to_string(),
            salary: "50000".to_string(),
            email: format!("{}@company.com", name.to_lowercase()),
            phone: "0170000000".to_string(),
            status: "Active".to_string(),
            photo: String::new(),
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        Config {
            database_path: dir.path().join("employees.db"),
            qr_dir: dir.path().join("qr_codes"),
            export_dir: dir.path().join("exports"),
        }
    }

    #[tokio::test]
    async fn add_then_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let pool = db::init_memory().await.unwrap();

        let id = add_employee(&pool, &config, sample_form("Alice").parse().unwrap())
            .await
            .unwrap();

        let emp = get_employee(&pool, id).await.unwrap().unwrap();
        assert_eq!(emp.name, "Alice");
        assert_eq!(emp.age, 30);
        assert_eq!(emp.salary, 50000.0);
        assert_eq!(emp.status, "Active");

        // QR artifact emitted as a side effect of the add
        assert!(config.qr_dir.join(format!("{id}_Alice.png")).exists());
    }

    #[tokio::test]
    async fn update_is_a_full_overwrite() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let pool = db::init_memory().await.unwrap();

        let id = add_employee(&pool, &config, sample_form("Bob").parse().unwrap())
            .await
            .unwrap();

        let mut changed = sample_form("Bobby").parse().unwrap();
        changed.salary = 60000.0;
        changed.designation = "Senior Engineer".to_string();
        changed.status = EmployeeStatus::Inactive;
        update_employee(&pool, &config, id, changed).await.unwrap();

        let emp = get_employee(&pool, id).await.unwrap().unwrap();
        assert_eq!(emp.name, "Bobby");
        assert_eq!(emp.salary, 60000.0);
        assert_eq!(emp.designation, "Senior Engineer");
        assert_eq!(emp.status, "Inactive");
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let pool = db::init_memory().await.unwrap();

        update_employee(&pool, &config, 999, sample_form("Ghost").parse().unwrap())
            .await
            .unwrap();

        assert!(get_employee(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn departments_are_seeded_in_insertion_order() {
        let pool = db::init_memory().await.unwrap();
        let departments = list_departments(&pool).await.unwrap();
        assert_eq!(departments, ["HR", "IT", "Sales", "Finance"]);
    }

    #[tokio::test]
    async fn delete_retains_attendance_and_leave_history() {
        use crate::model::attendance::{AttendanceStatus, MarkTarget};
        use crate::service::{attendance, leave};
        use chrono::NaiveDate;

        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let pool = db::init_memory().await.unwrap();

        let id = add_employee(&pool, &config, sample_form("Dave").parse().unwrap())
            .await
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        attendance::mark_attendance(&pool, MarkTarget::One(id), date, AttendanceStatus::Present)
            .await
            .unwrap();
        leave::apply_leave(&pool, id, date, date, "errand").await.unwrap();

        delete_employee(&pool, id).await.unwrap();
        assert!(get_employee(&pool, id).await.unwrap().is_none());

        // History rows are orphaned, not removed
        let rows = attendance::query_attendance(&pool, Some(id), None, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(leave::list_leaves(&pool).await.unwrap().len(), 1);
    }

    #[test]
    fn form_rejects_non_numeric_age() {
        let mut form = sample_form("Carol");
        form.age = "thirty".to_string();
        assert!(matches!(form.parse(), Err(Error::Validation(_))));
    }

    #[test]
    fn form_rejects_unknown_status() {
        let mut form = sample_form("Carol");
        form.status = "OnLeave".to_string();
        assert!(matches!(form.parse(), Err(Error::Validation(_))));
    }
}
