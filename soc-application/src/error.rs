use soc_domain::RiskTableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RiskTableError> for AppError {
    fn from(err: RiskTableError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
