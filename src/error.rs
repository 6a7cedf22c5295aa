use std::fmt;
use std::io;

use thiserror::Error;

/// Which deadline setter was called on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineKind {
    ReadWrite,
    Read,
    Write,
}

impl fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadWrite => write!(f, "SetDeadline"),
            Self::Read => write!(f, "SetReadDeadline"),
            Self::Write => write!(f, "SetWriteDeadline"),
        }
    }
}

/// Errors that can occur when dialing or using an AX.25 connection.
#[derive(Debug, Error)]
pub enum Error {
    /// No dial strategy exists for the requested scheme. Nothing was dialed.
    #[error("unsupported scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    /// AX.25 links cannot abort in-flight I/O on a deadline. This is permanent.
    #[error("{0} not implemented")]
    DeadlineNotImplemented(DeadlineKind),

    /// Reported by the underlying AX.25 or TNC transport, unchanged.
    #[error(transparent)]
    Transport(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
