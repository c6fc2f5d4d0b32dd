use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fee_payment_engine::{PaymentRequestError, TransactionQueryError, WebhookError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    /// A request field broke a validation rule. The message is returned to the caller as is.
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("{0}")]
    PaymentRequestFailed(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentRequestFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer token was supplied.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
}

impl From<PaymentRequestError> for ServerError {
    fn from(e: PaymentRequestError) -> Self {
        match e {
            PaymentRequestError::ValidationError(msg) => Self::ValidationError(msg),
            PaymentRequestError::DatabaseError(e) => {
                error!("💻️ Payment request could not be stored. {e}");
                Self::PaymentRequestFailed("Failed to create payment request.".to_string())
            },
            PaymentRequestError::GatewayError(_) => Self::PaymentRequestFailed(e.to_string()),
        }
    }
}

impl From<WebhookError> for ServerError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::LogWriteFailed(_) => Self::BackendError("Webhook processing failed.".to_string()),
        }
    }
}

impl From<TransactionQueryError> for ServerError {
    fn from(e: TransactionQueryError) -> Self {
        match e {
            TransactionQueryError::NotFound => Self::NoRecordFound(e.to_string()),
            TransactionQueryError::QueryError(msg) => Self::InvalidQuery(msg),
            TransactionQueryError::DatabaseError(e) => {
                error!("💻️ Could not fetch transactions. {e}");
                Self::BackendError("Error fetching transactions.".to_string())
            },
        }
    }
}
