use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    BadCredentials,

    #[error("no bearer token presented")]
    MissingToken,

    #[error("token rejected")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token issuance failed: {0}")]
    TokenIssuance(String),

    #[error(transparent)]
    Store(#[from] store::StoreError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
