//! Error types for rangeweb-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Unexpected status code: {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response body: {message}")]
    InvalidBody { message: String },
}
