use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::pricing::PricingError;

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("Invalid country selected: {0}")]
    InvalidCountry(String),

    #[error("Invalid fence type: {0}")]
    InvalidFenceType(String),

    #[error("Meters must be a finite number greater than zero, got {0}")]
    InvalidMeters(f64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Calculation {0} is already archived")]
    DuplicateId(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type CalculationResult<T> = Result<T, CalculationError>;

impl From<PricingError> for CalculationError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidCountry(country) => CalculationError::InvalidCountry(country),
            PricingError::InvalidFenceType(code) => CalculationError::InvalidFenceType(code),
            PricingError::InvalidMeters(meters) => CalculationError::InvalidMeters(meters),
        }
    }
}

impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::InvalidCountry(_)
            | CalculationError::InvalidFenceType(_)
            | CalculationError::InvalidMeters(_)
            | CalculationError::Validation(_) => AppError::BadRequest(err.to_string()),
            CalculationError::DuplicateId(_) => AppError::Conflict(err.to_string()),
            CalculationError::Storage(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CalculationError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CalculationError {
    fn from(err: mongodb::error::Error) -> Self {
        CalculationError::Storage(err.to_string())
    }
}
