// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! Errors which may occur when handing byte slices to the key exchange API.

// rustc seems to think the typenames in match statements (e.g. in
// Display) should be snake cased, for some reason.
#![allow(non_snake_case)]

use core::fmt;
use core::fmt::Display;

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum InternalError {
    /// An error in the length of bytes handed to a constructor.
    ///
    /// To use this, pass a string specifying the `name` of the type which is
    /// returning the error, and the `length` in bytes which its constructor
    /// expects.
    BytesLengthError {
        name: &'static str,
        length: usize,
    },
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InternalError::BytesLengthError{ name: n, length: l}
                => write!(f, "{} must be {} bytes in length", n, l),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InternalError {}

/// Errors which may occur while parsing keys from byte slices.
///
/// The Diffie-Hellman function itself is total and never fails; this error
/// only arises from being given a slice whose length is not 32 bytes.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Error(pub(crate) InternalError);

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Error {
        Error(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::string::ToString;

    #[test]
    fn bytes_length_error_display() {
        let err: Error = InternalError::BytesLengthError {
            name: "PublicKey",
            length: 32,
        }
        .into();

        assert_eq!(err.to_string(), "PublicKey must be 32 bytes in length");
    }
}
