//! Mapping of domain and repository errors onto the response envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brilink_core::auth::{CredentialError, PasswordError};
use brilink_core::cashflow::InvalidCashFlowType;
use brilink_core::posting::PostingError;
use brilink_core::reports::{PeriodError, ReportRenderError};
use brilink_db::repositories::{
    AgentError, BankFeeError, EdcMachineError, PostingRepoError, ServiceError, UserError,
};
use brilink_shared::jwt::JwtError;
use brilink_shared::{AppError, ErrorBody};
use sea_orm::DbErr;
use tracing::error;

/// Handler error. Renders `AppError` as an error envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from(&err))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<PostingError> for ApiError {
    fn from(err: PostingError) -> Self {
        let app = match err {
            PostingError::InsufficientEdcBalance {
                available,
                required,
            }
            | PostingError::InsufficientCash {
                available,
                required,
            } => AppError::insufficient_balance(err.to_string(), available, required),
            _ => AppError::validation(err.code(), err.to_string()),
        };
        Self(app)
    }
}

impl From<PostingRepoError> for ApiError {
    fn from(err: PostingRepoError) -> Self {
        match err {
            PostingRepoError::Posting(e) => e.into(),
            PostingRepoError::Database(e) => e.into(),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        Self(AppError::validation(err.code(), err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::internal(err))
    }
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::UnknownTimezone(_) => Self(AppError::internal(err)),
            _ => Self(AppError::validation(err.code(), err.to_string())),
        }
    }
}

impl From<InvalidCashFlowType> for ApiError {
    fn from(err: InvalidCashFlowType) -> Self {
        Self(AppError::invalid_input(err.to_string()))
    }
}

impl From<ReportRenderError> for ApiError {
    fn from(err: ReportRenderError) -> Self {
        Self(AppError::internal(err))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        let app = match err {
            JwtError::Expired => AppError::unauthorized("INVALID_TOKEN", "Token sudah expired"),
            JwtError::DecodingError(_) => {
                AppError::unauthorized("INVALID_TOKEN", "Token tidak valid")
            }
            JwtError::EncodingError(_) => AppError::internal(err),
        };
        Self(app)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailExists => Self(AppError::conflict(
                "EMAIL_ALREADY_EXISTS",
                "Email sudah terdaftar",
            )),
            UserError::NotFound(_) => Self(AppError::not_found("User tidak ditemukan")),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::NotFound(_) => Self(AppError::not_found("Agent tidak ditemukan")),
            AgentError::Database(e) => e.into(),
        }
    }
}

impl From<EdcMachineError> for ApiError {
    fn from(err: EdcMachineError) -> Self {
        match err {
            EdcMachineError::NotFound(_) => Self(AppError::not_found("EDC Machine tidak ditemukan")),
            EdcMachineError::Database(e) => e.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NameExists => Self(AppError::conflict(
                "SERVICE_ALREADY_EXISTS",
                "Nama service sudah ada",
            )),
            ServiceError::NotFound(_) => Self(AppError::not_found("Service tidak ditemukan")),
            ServiceError::Database(e) => e.into(),
        }
    }
}

impl From<BankFeeError> for ApiError {
    fn from(err: BankFeeError) -> Self {
        match err {
            BankFeeError::AlreadyExists => Self(AppError::conflict(
                "BANK_FEE_ALREADY_EXISTS",
                "Bank fee untuk EDC dan service ini sudah ada",
            )),
            BankFeeError::Database(e) => e.into(),
        }
    }
}
