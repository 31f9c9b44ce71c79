// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! The Curve25519 Diffie-Hellman function.
//!
//! [`curve25519`] computes \\(u([n]P)\\) from a 32-byte scalar \\(n\\) and the
//! 32-byte \\(u\\)-coordinate of \\(P\\), as described by Bernstein in
//! [_Curve25519: new Diffie-Hellman speed records_][curve25519].  The
//! scalar is used as-is: unlike RFC 7748's `X25519`, no bits are cleared or
//! set, so keys must be clamped by the caller if that is wanted.
//!
//! [curve25519]: https://cr.yp.to/ecdh/curve25519-20060209.pdf

use crate::constants::X25519_BASEPOINT;
use crate::errors::{Error, InternalError};
use crate::montgomery::MontgomeryPoint;

use rand_core::CryptoRng;
#[cfg(feature = "os_rng")]
use rand_core::TryRngCore;

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The bare, byte-oriented Curve25519 function.
///
/// Returns the canonical encoding of \\(u([n]P)\\), where \\(n\\) is `secret`
/// read as a little-endian 256-bit integer and \\(u(P)\\) is `basepoint`
/// with its top bit ignored, reduced mod \\(p\\).  Every input pair is
/// accepted, including points on the twist and low-order points.
///
/// # Example
///
/// ```
/// use curve25519_ladder::{curve25519, X25519_BASEPOINT_BYTES};
///
/// let alice_secret = [0x11u8; 32];
/// let bob_secret = [0x22u8; 32];
///
/// let alice_public = curve25519(alice_secret, X25519_BASEPOINT_BYTES);
/// let bob_public = curve25519(bob_secret, X25519_BASEPOINT_BYTES);
///
/// assert_eq!(
///     curve25519(alice_secret, bob_public),
///     curve25519(bob_secret, alice_public),
/// );
/// ```
pub fn curve25519(secret: [u8; 32], basepoint: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint(basepoint).mul_scalar_bytes(&secret).to_bytes()
}

/// Compute the public value for `secret`, i.e. `curve25519(secret, 9)`.
///
/// Fails if `secret` is not exactly 32 bytes long.
pub fn derive_public_key(secret: &[u8]) -> Result<[u8; 32], Error> {
    let secret = bytes_32(secret, "secret key")?;
    Ok(curve25519(secret, X25519_BASEPOINT.to_bytes()))
}

/// Compute the shared value `curve25519(secret, their_public)`.
///
/// Fails if either slice is not exactly 32 bytes long.
pub fn derive_shared_secret(secret: &[u8], their_public: &[u8]) -> Result<[u8; 32], Error> {
    let secret = bytes_32(secret, "secret key")?;
    let their_public = bytes_32(their_public, "public key")?;
    Ok(curve25519(secret, their_public))
}

fn bytes_32(bytes: &[u8], name: &'static str) -> Result<[u8; 32], Error> {
    <[u8; 32]>::try_from(bytes)
        .map_err(|_| InternalError::BytesLengthError { name, length: 32 }.into())
}

/// A Diffie-Hellman public key
///
/// We implement `Zeroize` so that downstream consumers may derive it for `Drop`
/// should they wish to erase public keys from memory.  Note that this erasure
/// (in this crate) does *not* automatically happen, but either must be derived
/// for Drop or explicitly called.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct PublicKey(pub(crate) MontgomeryPoint);

impl From<[u8; 32]> for PublicKey {
    /// Given a byte array, construct a `PublicKey`.
    fn from(bytes: [u8; 32]) -> PublicKey {
        PublicKey(MontgomeryPoint(bytes))
    }
}

impl<'a> TryFrom<&'a [u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &'a [u8]) -> Result<PublicKey, Error> {
        bytes_32(bytes, "PublicKey").map(PublicKey::from)
    }
}

impl PublicKey {
    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// View this public key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl AsRef<[u8]> for PublicKey {
    /// View this public key as a byte array.
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for PublicKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// A Diffie-Hellman secret key that can be used to compute multiple
/// [`SharedSecret`]s.
///
/// The 32 bytes are used unmodified as the scalar.  Keys produced by
/// [`StaticSecret::random_from_rng`] are uniformly random 256-bit integers
/// and are not clamped.
#[derive(Clone)]
pub struct StaticSecret([u8; 32]);

impl StaticSecret {
    /// Perform a Diffie-Hellman key agreement between `self` and
    /// `their_public` key to produce a `SharedSecret`.
    pub fn diffie_hellman(&self, their_public: &PublicKey) -> SharedSecret {
        SharedSecret(their_public.0.mul_scalar_bytes(&self.0))
    }

    /// Generate a new [`StaticSecret`] with the supplied RNG.
    pub fn random_from_rng<R: CryptoRng + ?Sized>(csprng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        StaticSecret(bytes)
    }

    /// Generate a new [`StaticSecret`] from the operating system's RNG.
    #[cfg(feature = "os_rng")]
    pub fn random() -> Self {
        Self::random_from_rng(&mut rand_core::OsRng.unwrap_err())
    }

    /// Extract this key's bytes for serialization.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// View this key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for StaticSecret {
    /// Load a secret key from a byte array.
    fn from(bytes: [u8; 32]) -> StaticSecret {
        StaticSecret(bytes)
    }
}

impl<'a> TryFrom<&'a [u8]> for StaticSecret {
    type Error = Error;

    fn try_from(bytes: &'a [u8]) -> Result<StaticSecret, Error> {
        bytes_32(bytes, "StaticSecret").map(StaticSecret)
    }
}

impl<'a> From<&'a StaticSecret> for PublicKey {
    /// Given a [`StaticSecret`] key, compute its corresponding [`PublicKey`].
    fn from(secret: &'a StaticSecret) -> PublicKey {
        PublicKey(X25519_BASEPOINT.mul_scalar_bytes(&secret.0))
    }
}

impl AsRef<[u8]> for StaticSecret {
    /// View this key as a byte array.
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for StaticSecret {
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        self.0.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for StaticSecret {}

/// The result of a Diffie-Hellman key exchange.
///
/// Each party computes this using their [`StaticSecret`] and their
/// counterparty's [`PublicKey`].
pub struct SharedSecret(pub(crate) MontgomeryPoint);

impl SharedSecret {
    /// Convert this shared secret to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// View this shared secret key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Check in constant time that this shared secret is not the encoding
    /// of zero.
    ///
    /// A peer that sends a low-order point (or \\(0\\) itself) forces the
    /// output to zero regardless of our secret.  Whether that matters is up
    /// to the protocol; see [RFC 7748 §6.1](https://tools.ietf.org/html/rfc7748#section-6.1).
    ///
    /// # Returns
    ///
    /// Returns `true` if the key exchange was contributory (good), and `false`
    /// otherwise (can be bad for some protocols).
    #[must_use]
    pub fn was_contributory(&self) -> bool {
        !self.0.is_identity()
    }
}

impl AsRef<[u8]> for SharedSecret {
    /// View this shared secret key as a byte array.
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        self.0.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for SharedSecret {}
