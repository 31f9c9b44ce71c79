// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(docsrs)))]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//------------------------------------------------------------------------
// External dependencies:
//------------------------------------------------------------------------

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

//------------------------------------------------------------------------
// curve25519-ladder public modules
//------------------------------------------------------------------------

// Point operations on the Montgomery form of Curve25519
pub mod montgomery;

// Useful constants, like the basepoint
pub mod constants;

// Errors which may occur when parsing keys
pub mod errors;

//------------------------------------------------------------------------
// curve25519-ladder internal modules
//------------------------------------------------------------------------

// Arithmetic on GF(2^255 - 19) in radix 2^25.5
pub(crate) mod field;

// The Diffie-Hellman function and its key types
mod x25519;

pub use crate::constants::X25519_BASEPOINT_BYTES;
pub use crate::errors::Error;
pub use crate::x25519::*;
