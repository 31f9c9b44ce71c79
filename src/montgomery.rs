// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! Scalar multiplication on the Montgomery form of Curve25519.
//!
//! Points on the curve
//! $$
//!     v\^2 = u\^3 + 486662 u\^2 + u
//! $$
//! are handled through their \\(u\\)-coordinate alone.  The \\(u\\)-coordinate
//! of \\([n]P\\) is a function of \\(n\\) and \\(u(P)\\), and the \\(v\\)
//! coordinate is never needed, so the same code also works on the
//! quadratic twist.  The map \\(u\\) sends the point at infinity to \\(0\\).
//!
//! Scalar multiplication uses the Montgomery ladder over projective
//! \\((X : Z)\\) coordinates, with a single division at the very end.  See
//! [_Montgomery curves and their arithmetic_][costello-smith] by Costello
//! and Smith.
//!
//! [costello-smith]: https://eprint.iacr.org/2017/212.pdf

// We allow non snake_case names because coordinates in projective space are
// traditionally denoted by the capitalisation of their respective
// counterparts in affine space.
#![allow(non_snake_case)]

use core::hash::{Hash, Hasher};

use crate::constants::AMINUS2_OVER_FOUR;
use crate::field::FieldElement;

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Holds the \\(u\\)-coordinate of a point on the Montgomery form of
/// Curve25519 or its twist, as 32 little-endian bytes.
///
/// The encoding need not be canonical.  Equality and hashing are defined
/// on the value mod \\(p\\), ignoring the high bit of the last byte.
#[derive(Copy, Clone, Debug, Default)]
pub struct MontgomeryPoint(pub [u8; 32]);

impl ConstantTimeEq for MontgomeryPoint {
    fn ct_eq(&self, other: &MontgomeryPoint) -> Choice {
        let self_fe = FieldElement::from_bytes(&self.0);
        let other_fe = FieldElement::from_bytes(&other.0);

        self_fe.ct_eq(&other_fe)
    }
}

impl PartialEq for MontgomeryPoint {
    fn eq(&self, other: &MontgomeryPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for MontgomeryPoint {}

impl Hash for MontgomeryPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Do a round trip through a `FieldElement`. `as_bytes` is
        // guaranteed to give a canonical 32-byte encoding
        let canonical_bytes = FieldElement::from_bytes(&self.0).to_bytes();
        canonical_bytes.hash(state);
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for MontgomeryPoint {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl MontgomeryPoint {
    /// The encoding of the point at infinity, \\(u = 0\\).
    pub const fn identity() -> MontgomeryPoint {
        MontgomeryPoint([0u8; 32])
    }

    /// Whether this is the point at infinity or the 2-torsion point
    /// \\((0, 0)\\), i.e. whether \\(u \equiv 0 \pmod p\\).
    pub fn is_identity(&self) -> bool {
        FieldElement::from_bytes(&self.0).is_zero().into()
    }

    /// View this `MontgomeryPoint` as an array of bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert this `MontgomeryPoint` to an array of bytes.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Given `self` \\( = u\_0(P) \\) and a little-endian 32-byte integer
    /// \\(n\\), return \\( u\_0(\[n\]P) \\) in canonical form.
    ///
    /// All 256 bits of `scalar` are used, most significant first, and no
    /// clamping is applied: callers wanting RFC 7748 X25519 must clear bits
    /// 0, 1, 2 and 255 and set bit 254 themselves.  The ladder always runs
    /// exactly 256 steps.
    pub fn mul_scalar_bytes(&self, scalar: &[u8; 32]) -> MontgomeryPoint {
        self.mul_bits_be(scalar_bits_be(scalar))
    }

    /// Given `self` \\( = u\_0(P) \\), and a big-endian bit representation of
    /// an integer \\(n\\), return \\( u\_0(\[n\]P) \\).  This is constant time
    /// in the length of `bits`.
    pub fn mul_bits_be(&self, bits: impl Iterator<Item = bool>) -> MontgomeryPoint {
        let affine_u = FieldElement::from_bytes(&self.0);
        let mut x0 = montgomery_ladder(bits, &affine_u);
        let result = x0.as_affine();

        #[cfg(feature = "zeroize")]
        x0.zeroize();

        result
    }
}

/// The bits of a little-endian 32-byte integer, most significant first.
fn scalar_bits_be(scalar: &[u8; 32]) -> impl Iterator<Item = bool> + '_ {
    (0..256)
        .rev()
        .map(move |i| ((scalar[i >> 3] >> (i & 7)) & 1u8) == 1)
}

/// A point \\((X : Z)\\) on the \\(\mathbb P\^1\\), standing for the affine
/// \\(u\\)-coordinate \\(X / Z\\).  \\(Z = 0\\) is the point at infinity.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ProjectivePoint {
    pub X: FieldElement,
    pub Z: FieldElement,
}

impl ProjectivePoint {
    /// The point at infinity, \\((1 : 0)\\).
    pub(crate) const fn identity() -> ProjectivePoint {
        ProjectivePoint {
            X: FieldElement::ONE,
            Z: FieldElement::ZERO,
        }
    }

    /// The point \\((u : 1)\\).
    pub(crate) fn from_affine(u: &FieldElement) -> ProjectivePoint {
        ProjectivePoint {
            X: *u,
            Z: FieldElement::ONE,
        }
    }

    /// Dehomogenize this point to affine coordinates, \\(X \cdot Z\^{-1}\\).
    ///
    /// The point at infinity maps to \\(u = 0\\), since the inverse of zero
    /// is zero.
    pub(crate) fn as_affine(&self) -> MontgomeryPoint {
        let u = &self.X * &self.Z.invert();
        MontgomeryPoint(u.to_bytes())
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(
        a: &ProjectivePoint,
        b: &ProjectivePoint,
        choice: Choice,
    ) -> ProjectivePoint {
        ProjectivePoint {
            X: FieldElement::conditional_select(&a.X, &b.X, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
        }
    }

    fn conditional_swap(a: &mut ProjectivePoint, b: &mut ProjectivePoint, choice: Choice) {
        FieldElement::conditional_swap(&mut a.X, &mut b.X, choice);
        FieldElement::conditional_swap(&mut a.Z, &mut b.Z, choice);
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for ProjectivePoint {
    fn zeroize(&mut self) {
        self.X.zeroize();
        self.Z.zeroize();
    }
}

/// Run the Montgomery ladder for the integer whose bits are `bits`, most
/// significant first, on the point with affine \\(u\\)-coordinate
/// `affine_u`.  Returns \\([n]P\\) in projective form.
///
/// The ladder keeps \\(x\_0 = [k]P\\) and \\(x\_1 = [k+1]P\\) for the prefix
/// \\(k\\) of \\(n\\) read so far, so their difference is always \\(P\\).
/// Each bit costs exactly one [`differential_add_and_double`]; the bit only
/// decides, through a constant-time swap, which accumulator gets doubled.
/// Consecutive swaps are merged by swapping on the XOR of adjacent bits.
pub(crate) fn montgomery_ladder(
    bits: impl Iterator<Item = bool>,
    affine_u: &FieldElement,
) -> ProjectivePoint {
    let mut x0 = ProjectivePoint::identity();
    let mut x1 = ProjectivePoint::from_affine(affine_u);

    let mut prev_bit = false;
    for cur_bit in bits {
        let choice: u8 = (prev_bit ^ cur_bit) as u8;

        debug_assert!(choice == 0 || choice == 1);

        ProjectivePoint::conditional_swap(&mut x0, &mut x1, choice.into());
        differential_add_and_double(&mut x0, &mut x1, affine_u);

        prev_bit = cur_bit;
    }
    // The final value of prev_bit above is the least significant bit.
    ProjectivePoint::conditional_swap(&mut x0, &mut x1, Choice::from(prev_bit as u8));

    // Don't leave the bit or the other accumulator on the stack
    #[cfg(feature = "zeroize")]
    {
        prev_bit.zeroize();
        x1.zeroize();
    }

    x0
}

/// Perform the double-and-add step of the Montgomery ladder.
///
/// Given projective points
/// \\( (X\_P : Z\_P) \\), \\( (X\_Q : Z\_Q) \\) on the \\(\mathbb P\^1\\)
/// and the affine difference
/// \\(      u\_{P-Q} = u(P-Q) \\), set
/// $$
///     (X\_P : Z\_P) \gets [2]P, \quad (X\_Q : Z\_Q) \gets P + Q.
/// $$
/// Every product and square is fully reduced before it is used again.
#[rustfmt::skip] // keep alignment of explanatory comments
pub(crate) fn differential_add_and_double(
    P: &mut ProjectivePoint,
    Q: &mut ProjectivePoint,
    affine_PmQ: &FieldElement,
) {
    let t0 = &P.X + &P.Z;              // A  = X_P + Z_P
    let t1 = &P.X - &P.Z;              // B  = X_P - Z_P
    let t2 = &Q.X + &Q.Z;              // A' = X_Q + Z_Q
    let t3 = &Q.X - &Q.Z;              // B' = X_Q - Z_Q

    let t4 = &t2 * &t1;                // C  = A' B
    let t5 = &t0 * &t3;                // D  = A B'

    let t6 = &t4 + &t5;                // C + D
    let t7 = &t4 - &t5;                // C - D

    let t8 = t6.square();              // X_{P+Q} = (C + D)^2
    let t9 = t7.square();              // (C - D)^2
    let t10 = affine_PmQ * &t9;        // Z_{P+Q} = u(P-Q) (C - D)^2

    let t11 = t0.square();             // AA
    let t12 = t1.square();             // BB
    let t13 = &t11 * &t12;             // X_{2P} = AA BB
    let t14 = &t11 - &t12;             // E = AA - BB

    let t15 = t14.mul_small(AMINUS2_OVER_FOUR);    // 121665 E
    let t16 = &t11 + &t15;             // AA + 121665 E
    let t17 = &t14 * &t16;             // Z_{2P} = E (AA + 121665 E)

    P.X = t13;
    P.Z = t17;
    Q.X = t8;
    Q.Z = t10;
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
