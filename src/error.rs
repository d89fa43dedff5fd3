use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors produced while sealing or opening a session token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The key is not exactly 32 bytes.
    #[error("session key must be exactly 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The operating system random source failed.
    #[error("secure random source unavailable")]
    RandomnessUnavailable,

    /// The subject identifier cannot be carried by a token.
    #[error("subject identifier must be non-empty and must not contain '|'")]
    InvalidSubject,

    /// No key in the ring is valid yet.
    #[error("no active session key")]
    NoActiveKey,

    /// The cipher rejected an operation that should not fail.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// The token is not valid base64.
    #[error("token is not valid base64")]
    MalformedToken,

    /// The token is shorter than a nonce.
    #[error("token too short")]
    TokenTooShort,

    /// The ciphertext did not authenticate under any key.
    #[error("token authentication failed")]
    AuthenticationFailed,

    /// The plaintext is not `<subject>|<expiry>`.
    #[error("invalid token format")]
    InvalidTokenFormat,

    /// The expiry is not a base-10 integer.
    #[error("invalid token expiry")]
    InvalidExpiry,

    /// The token decoded but its expiry has passed.
    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Whether the failure lies with the server rather than the presented token.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidKeyLength(_)
                | TokenError::RandomnessUnavailable
                | TokenError::NoActiveKey
                | TokenError::Cipher(_)
        )
    }
}

/// Errors produced while redeeming a password-reset ticket.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    #[error("invalid reset ticket id")]
    InvalidTicketId,

    #[error("reset ticket expired")]
    TicketExpired,

    #[error("reset ticket not found")]
    TicketNotFound,

    #[error("account for reset ticket not found")]
    AccountNotFound,
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A pool construction error.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// A stored document could not be (de)serialized.
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    /// The email collaborator failed.
    #[error("Email delivery error: {0}")]
    Email(String),

    /// A session token error.
    #[error("Session token error: {0}")]
    Token(#[from] TokenError),

    /// A password-reset ticket error.
    #[error("Reset ticket error: {0}")]
    Ticket(#[from] TicketError),

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        AppError::Validation(report.to_string().trim().to_string())
    }
}

/// The shared body for every failed redemption; which check failed stays hidden.
const RESET_LINK_UNUSABLE: &str = "Reset link is invalid or has expired";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::CreatePool(ref e) => {
                tracing::error!("Pool creation error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Document(ref e) => {
                tracing::error!("Document error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }

            AppError::Email(ref msg) => {
                tracing::error!("Email delivery error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email".to_string())
            }

            AppError::Token(ref e) if e.is_internal() => {
                tracing::error!("Session token error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Token(ref e) => {
                tracing::warn!("Rejected session token: {}", e);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }

            AppError::Ticket(TicketError::InvalidTicketId) => {
                tracing::debug!("Malformed reset ticket id");
                (StatusCode::BAD_REQUEST, "Invalid reset password ID".to_string())
            }

            AppError::Ticket(ref e) => {
                tracing::warn!("Reset ticket rejected: {}", e);
                (StatusCode::NOT_FOUND, RESET_LINK_UNUSABLE.to_string())
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Encryption(ref msg) => {
                tracing::error!("Encryption error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Encryption error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
