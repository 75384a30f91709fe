//! Error responses.
//!
//! Every engine error becomes an [`AppError`] and is rendered as
//! `{"error": CODE, "message": text}` with the status of its kind. Server-side
//! failures are logged and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use budgetops_core::allocation::AllocationError;
use budgetops_core::budget::BudgetError;
use budgetops_core::catalog::CatalogError;
use budgetops_core::fiscal::YearError;
use budgetops_core::forecast::ForecastError;
use budgetops_core::procurement::ProcurementError;
use budgetops_core::rollup::RollupError;
use budgetops_shared::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A malformed request detected before reaching the engine.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// HTTP status of the error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

macro_rules! from_engine_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

from_engine_error!(
    AllocationError,
    BudgetError,
    CatalogError,
    ForecastError,
    ProcurementError,
    RollupError,
    YearError,
);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "request failed");
            "An error occurred".to_string()
        };
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
