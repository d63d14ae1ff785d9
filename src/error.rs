//! Error types for procedure compilation and text emission.
//!
//! ## Error Categories
//!
//! - **Unsupported types**: the classifier reached a type it has no strategy for
//! - **Type mismatches**: a value was handed to a procedure compiled for another type
//! - **Sink failures**: the character sink or an I/O writer rejected output
//! - **Custom errors**: raised by user hooks and propagated unchanged
//!
//! Output is not transactional. When a nested write fails, the text emitted
//! before the failure stays in the sink.
//!
//! ## Examples
//!
//! ```rust
//! use typetext::Error;
//!
//! let err = Error::unsupported_type("Handle");
//! assert!(err.to_string().contains("Handle"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while compiling or running a write procedure.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while copying output to a writer
    #[error("IO error: {0}")]
    Io(String),

    /// The classifier has no strategy for this type
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A value did not match the descriptor of the procedure it was given
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The character sink rejected output
    #[error("Write error: {0}")]
    Write(#[from] fmt::Error),

    /// The process-wide engine was configured after first use
    #[error("The global engine is already initialized")]
    AlreadyInitialized,

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported type error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typetext::Error;
    ///
    /// let err = Error::unsupported_type("RawPointer");
    /// assert!(matches!(err, Error::UnsupportedType(_)));
    /// ```
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typetext::Error;
    ///
    /// let err = Error::type_mismatch("i32", "alloc::string::String");
    /// assert!(err.to_string().contains("expected i32"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typetext::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
