mod error;

pub use error::{ErrorBody, ErrorDetails, HttpError};
