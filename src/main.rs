use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::rolling;

use staffbook::config::Config;
use staffbook::db::{self, DbPool};
use staffbook::error::Error;
use staffbook::model::attendance::{AttendanceStatus, MarkTarget};
use staffbook::model::leave_request::LeaveStatus;
use staffbook::service::{attendance, employee, leave, report};
use staffbook::{export, payslip};

#[derive(Parser)]
#[command(name = "staffbook", about = "Employee directory, attendance and payroll reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add an employee and emit their QR badge
    AddEmployee(EmployeeArgs),
    /// Overwrite an employee record in full
    UpdateEmployee {
        id: i64,
        #[command(flatten)]
        fields: EmployeeArgs,
    },
    /// Delete an employee (attendance/leave history is retained)
    DeleteEmployee { id: i64 },
    /// List all employees
    ListEmployees,
    /// List department names
    Departments,
    /// Mark attendance for one employee or for "All"
    Mark {
        #[arg(long, default_value = "All")]
        employee: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        status: String,
    },
    /// Query attendance history
    Attendance {
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Apply for leave
    ApplyLeave {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        reason: String,
    },
    /// Overwrite a leave request status
    SetLeaveStatus { id: i64, status: String },
    /// List all leave requests
    Leaves,
    /// Monthly attendance percentage per employee
    Report {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Export attendance history to CSV or XLSX
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a payslip PDF for one employee and month
    Payslip {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct EmployeeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    designation: String,
    #[arg(long)]
    salary: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "Active")]
    status: String,
    #[arg(long, default_value = "")]
    photo: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
}

impl From<EmployeeArgs> for employee::EmployeeForm {
    fn from(args: EmployeeArgs) -> Self {
        employee::EmployeeForm {
            name: args.name,
            age: args.age,
            department: args.department,
            designation: args.designation,
            salary: args.salary,
            email: args.email,
            phone: args.phone,
            status: args.status,
            photo: args.photo,
        }
    }
}

fn parse_target(value: &str) -> Result<MarkTarget, Error> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(MarkTarget::All);
    }
    value
        .parse()
        .map(MarkTarget::One)
        .map_err(|_| Error::Validation(format!("employee must be an id or \"All\", got {value:?}")))
}

fn parse_employee_filter(value: Option<&str>) -> Result<Option<i64>, Error> {
    match value {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| Error::Validation(format!("employee must be an id or \"All\", got {v:?}"))),
    }
}

fn parse_attendance_status(value: &str) -> Result<AttendanceStatus, Error> {
    value
        .parse()
        .map_err(|_| Error::Validation(format!("unknown attendance status {value:?}")))
}

fn parse_leave_status(value: &str) -> Result<LeaveStatus, Error> {
    value
        .parse()
        .map_err(|_| Error::Validation(format!("unknown leave status {value:?}")))
}

async fn run(cli: Cli, config: &Config, pool: &DbPool) -> anyhow::Result<()> {
    match cli.command {
        Command::AddEmployee(args) => {
            let form: employee::EmployeeForm = args.into();
            let id = employee::add_employee(pool, config, form.parse()?).await?;
            println!("{id}");
        }
        Command::UpdateEmployee { id, fields } => {
            let form: employee::EmployeeForm = fields.into();
            employee::update_employee(pool, config, id, form.parse()?).await?;
        }
        Command::DeleteEmployee { id } => {
            employee::delete_employee(pool, id).await?;
        }
        Command::ListEmployees => {
            let employees = employee::list_employees(pool).await?;
            println!("{}", serde_json::to_string_pretty(&employees)?);
        }
        Command::Departments => {
            for name in employee::list_departments(pool).await? {
                println!("{name}");
            }
        }
        Command::Mark { employee, date, status } => {
            let marked = attendance::mark_attendance(
                pool,
                parse_target(&employee)?,
                date,
                parse_attendance_status(&status)?,
            )
            .await?;
            println!("marked {marked}");
        }
        Command::Attendance { employee, year, month } => {
            let emp_id = parse_employee_filter(employee.as_deref())?;
            let rows = attendance::query_attendance(pool, emp_id, year, month).await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::ApplyLeave { employee, start, end, reason } => {
            let request = leave::apply_leave(pool, employee, start, end, &reason).await?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::SetLeaveStatus { id, status } => {
            leave::set_leave_status(pool, id, parse_leave_status(&status)?).await?;
        }
        Command::Leaves => {
            let leaves = leave::list_leaves(pool).await?;
            println!("{}", serde_json::to_string_pretty(&leaves)?);
        }
        Command::Report { year, month } => {
            let summaries = report::monthly_attendance_percentage(pool, year, month).await?;
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        Command::Export { format, employee, year, month, out } => {
            let emp_id = parse_employee_filter(employee.as_deref())?;
            std::fs::create_dir_all(&config.export_dir)?;
            let written = match format {
                ExportFormat::Csv => {
                    let out = out.unwrap_or_else(|| config.export_dir.join("attendance.csv"));
                    export::export_attendance_csv(pool, emp_id, year, month, &out).await?
                }
                ExportFormat::Xlsx => {
                    let out = out.unwrap_or_else(|| config.export_dir.join("attendance.xlsx"));
                    export::export_attendance_xlsx(pool, emp_id, year, month, &out).await?
                }
            };
            println!("exported {written} rows");
        }
        Command::Payslip { employee, year, month, out } => {
            std::fs::create_dir_all(&config.export_dir)?;
            let out = out.unwrap_or_else(|| {
                config.export_dir.join(format!("payslip_{employee}_{year}_{month:02}.pdf"))
            });
            let slip = payslip::generate_payslip(pool, employee, year, month, &out).await?;
            println!("{}", serde_json::to_string_pretty(&slip)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .init();

    info!("staffbook starting");

    let pool = db::init_db(&config.database_path).await?;
    run(cli, &config, &pool).await
}
