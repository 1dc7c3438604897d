//! Unified error handling for Strata.
//!
//! This module defines [`StrataError`], the single error type propagated
//! throughout every layer of the index — from the file and paging layer,
//! through the tree algorithms, up to the public API surface.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, StrataError>`.

use std::fmt;
use std::io;

/// The canonical error type for all Strata operations.
///
/// Every fallible function in the codebase returns this type (via the
/// [`Result`] alias). The taxonomy is closed: callers can match on the
/// variant without inspecting free-form strings.
#[derive(Debug)]
pub enum StrataError {
    /// An I/O error originating from the backing file.
    Io(io::Error),

    /// The key is not present in the tree, or the tree is empty.
    KeyNotFound,

    /// An insert would create a duplicate key.
    KeyAlreadyExists,

    /// The key is empty.
    InvalidKey,

    /// A key or value payload is empty where content is required, or a
    /// value is too large for its node to fit in a page.
    InvalidData,

    /// The key length exceeds the largest encodable size (`u16::MAX`).
    KeySizeTooLarge,

    /// The key length differs from the key size the tree was created with.
    InvalidKeySize,

    /// A key expected to be present in a node was not found during a
    /// removal. Indicates an internal consistency violation.
    InvalidKeyIndex,

    /// A child reference expected to be present in a node was not found
    /// during a removal. Indicates an internal consistency violation.
    InvalidPointerIndex,

    /// A page read or write transferred the wrong number of bytes.
    UnexpectedSize,

    /// A page offset points past the live region of the file.
    InvalidReadIndex,

    /// A page read was attempted on an empty tree.
    TreeEmpty,
}

impl fmt::Display for StrataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataError::Io(err) => write!(f, "I/O error: {err}"),
            StrataError::KeyNotFound => write!(f, "key not found"),
            StrataError::KeyAlreadyExists => write!(f, "key already exists"),
            StrataError::InvalidKey => write!(f, "invalid key: keys must be non-empty"),
            StrataError::InvalidData => {
                write!(f, "invalid data: payloads must be non-empty and fit in a page")
            }
            StrataError::KeySizeTooLarge => write!(f, "key size exceeds the encodable maximum"),
            StrataError::InvalidKeySize => {
                write!(f, "invalid key size: all keys must have the same length")
            }
            StrataError::InvalidKeyIndex => write!(f, "invalid key index"),
            StrataError::InvalidPointerIndex => write!(f, "invalid pointer index"),
            StrataError::UnexpectedSize => {
                write!(f, "unexpected number of bytes transferred")
            }
            StrataError::InvalidReadIndex => {
                write!(f, "read offset is outside the live page region")
            }
            StrataError::TreeEmpty => write!(f, "tree is empty"),
        }
    }
}

impl std::error::Error for StrataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StrataError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StrataError {
    fn from(err: io::Error) -> Self {
        StrataError::Io(err)
    }
}

/// A specialised [`Result`] type for Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;
