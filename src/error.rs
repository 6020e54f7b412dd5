//! Error types for the fallible edges of the ribbon: attribute inflation,
//! state restore, font loading and the window backend.
//!
//! Visibility coordination itself never fails; see [`crate::ui::coordinator`].

use thiserror::Error;
#[cfg(feature = "x11")]
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "x11")]
    #[error("X11: {0}")]
    X11(#[from] X11Error),

    /// A declarative attribute carried a value that could not be parsed.
    #[error("invalid value {value:?} for attribute `{name}`: expected {expected}")]
    Attribute {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// A saved state record is missing a key or stores the wrong type under it.
    #[error("saved state key `{key}`: {problem}")]
    State {
        key: String,
        problem: &'static str,
    },

    #[error("no usable font found")]
    NoFont,

    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("no display server available")]
    NoDisplay,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "x11")]
#[derive(Debug, Error)]
pub enum X11Error {
    #[error("cannot connect to the X server: {0}")]
    Connect(#[from] ConnectError),
    #[error("X connection failed: {0}")]
    Connection(#[from] ConnectionError),
    #[error("request failed: {0}")]
    Reply(#[from] ReplyError),
    #[error("ran out of X resource ids")]
    IdsExhausted,
    #[error("no 24-bit TrueColor visual on this screen")]
    NoVisual,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn attribute(name: &str, value: &str, expected: &'static str) -> Self {
        Error::Attribute {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    pub(crate) fn state(key: &str, problem: &'static str) -> Self {
        Error::State {
            key: key.to_string(),
            problem,
        }
    }
}

#[cfg(feature = "x11")]
impl From<ReplyOrIdError> for X11Error {
    fn from(e: ReplyOrIdError) -> Self {
        match e {
            ReplyOrIdError::ConnectionError(e) => X11Error::Connection(e),
            ReplyOrIdError::X11Error(e) => X11Error::Reply(e.into()),
            ReplyOrIdError::IdsExhausted => X11Error::IdsExhausted,
        }
    }
}

/// Lets `?` lift every x11rb error straight into [`Error`].
#[cfg(feature = "x11")]
macro_rules! lift_x11_errors {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(e: $ty) -> Self {
                    Error::X11(e.into())
                }
            }
        )*
    };
}

#[cfg(feature = "x11")]
lift_x11_errors!(ConnectError, ConnectionError, ReplyError, ReplyOrIdError);
