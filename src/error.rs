//! Error taxonomy for the fetch path.
//!
//! Nothing here is fatal: the caller logs the failure, leaves the weather
//! snapshot untouched, and waits for the next fetch window.

use std::fmt;

/// The HTTP transport failed before a usable body was delivered.
#[derive(Debug)]
pub enum TransportError {
    /// Connect/send/receive failed at the transport level.
    Connection(String),
    /// The server answered with a non-200 status.
    Status(u16),
    /// The streamed body exceeded the response buffer cap.
    ResponseTooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connection(msg) => write!(f, "transport error: {}", msg),
            TransportError::Status(code) => write!(f, "HTTP error: status {}", code),
            TransportError::ResponseTooLarge => write!(f, "response too large (>32KB)"),
        }
    }
}

impl std::error::Error for TransportError {}

/// The response body could not be turned into a weather snapshot.
#[derive(Debug)]
pub enum ParseError {
    /// Body was not valid UTF-8.
    InvalidUtf8,
    /// Body was not valid JSON.
    InvalidJson(serde_json::Error),
    /// A field the snapshot needs was absent from the payload.
    MissingField(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUtf8 => write!(f, "response body is not UTF-8"),
            ParseError::InvalidJson(e) => write!(f, "response body is not JSON: {}", e),
            ParseError::MissingField(field) => write!(f, "missing field {:?} in response", field),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::InvalidJson(e)
    }
}

/// Union of the two failure classes a fetch attempt can end in.
#[derive(Debug)]
pub enum FetchError {
    Transport(TransportError),
    Parse(ParseError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "{}", e),
            FetchError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::Transport(e)
    }
}

impl From<ParseError> for FetchError {
    fn from(e: ParseError) -> Self {
        FetchError::Parse(e)
    }
}
