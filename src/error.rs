use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced employee or leave id does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness or not-null constraint was violated on write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Malformed input rejected at the boundary before reaching the store.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Qr(#[from] qrcode::types::QrError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            use sqlx::error::ErrorKind;
            match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::CheckViolation => {
                    return Error::Constraint(db.message().to_string());
                }
                _ => {}
            }
        }
        Error::Database(e)
    }
}
