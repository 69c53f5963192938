//! Error handling for the application

use thiserror::Error;

/// Field extraction errors at a single catalog slot
#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    #[error("field {field} not found at slot {slot}")]
    NotFound { field: &'static str, slot: u32 },

    #[error("malformed {field} text: {raw:?}")]
    Malformed { field: &'static str, raw: String },
}

/// Pagination errors
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("no more result pages")]
    NoMoreResults,

    #[error("page navigation failed: {0}")]
    Failed(String),
}

/// Errors while retrieving a page or a single product
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("unexpected response status: {0}")]
    Status(u16),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Scan query validation errors
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("page count must be at least 1")]
    PageCount,

    #[error("invalid price range: min {min} > max {max}")]
    PriceRange { min: u64, max: u64 },

    #[error("rating {0} outside 0..=5")]
    Rating(f64),
}

/// Operator command errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Delivery error: {0}")]
    DeliveryError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::FetchError(err.to_string())
    }
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        AppError::FetchError(err.to_string())
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        AppError::Unknown(err.to_string())
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Unknown(err.to_string())
    }
}
