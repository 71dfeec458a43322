pub mod attendance;
pub mod employee;
pub mod leave;
pub mod report;
