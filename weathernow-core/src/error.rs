use thiserror::Error;

/// Errors surfaced by a weather query.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoder returned no candidates for a place name.
    #[error("No location found for '{0}'. Try a different name.")]
    NotFound(String),

    /// Transport failure, timeout, bad status or unexpected response shape.
    #[error("Network issue: {0}. Please try again.")]
    Network(String),

    #[error("Please enter a city name")]
    EmptyQuery,

    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// A newer query started before this one finished; its result was dropped.
    #[error("Query was superseded by a newer request")]
    Superseded,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the account and session boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Account storage error: {0}")]
    Storage(String),
}
