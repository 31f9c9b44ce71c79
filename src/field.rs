// -*- mode: rust; coding: utf-8; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{255} - 19\\), using signed \\(64\\)-bit
//! limbs in radix \\(2\^{25.5}\\).
//!
//! A [`FieldElement`] holds ten limbs whose widths alternate between
//! \\(26\\) and \\(25\\) bits, so that limbs \\(t\_0, \ldots, t\_9\\) represent
//! $$
//! t = t\_0 + t\_1 2\^{26} + t\_2 2\^{51} + t\_3 2\^{77} + \cdots + t\_9 2\^{230}.
//! $$
//! Limbs are signed and are allowed to grow between multiplications.
//!
//! Multiplication and squaring first produce a 19-limb
//! [`UnreducedFieldElement`] (the "long form"), which is then folded back
//! into ten limbs in two stages:
//!
//! * degree reduction, which uses \\(2\^{255} \equiv 19 \pmod p\\) to fold
//!   limbs \\(10 \ldots 18\\) onto limbs \\(0 \ldots 8\\);
//! * coefficient reduction, which carries every limb back into roughly
//!   \\(\pm 2\^{25}\\), wrapping the carry out of the top limb back into the
//!   bottom one, until no carry leaves the top limb.

use core::fmt::Debug;
use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;
use subtle::ConstantTimeGreater;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// A single limb of a field element.
pub(crate) type Limb = i64;

/// Byte offset and right shift locating each limb inside a little-endian
/// 32-byte encoding.  Every limb after the first starts a few bits into a
/// byte whose low bits belong to the previous limb.
const LIMB_WINDOWS: [(usize, u32); 10] = [
    (0, 0),
    (3, 2),
    (6, 3),
    (9, 5),
    (12, 6),
    (16, 0),
    (19, 1),
    (22, 3),
    (25, 4),
    (28, 6),
];

/// Width in bits of each limb.
const LIMB_BITS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

const LOW_26_BITS: Limb = (1 << 26) - 1;
const LOW_25_BITS: Limb = (1 << 25) - 1;

/// Largest value of each limb of a normalized element.
const LIMB_MASKS: [Limb; 10] = [
    LOW_26_BITS,
    LOW_25_BITS,
    LOW_26_BITS,
    LOW_25_BITS,
    LOW_26_BITS,
    LOW_25_BITS,
    LOW_26_BITS,
    LOW_25_BITS,
    LOW_26_BITS,
    LOW_25_BITS,
];

/// Read four little-endian bytes.
#[inline]
fn load4(input: &[u8]) -> Limb {
    (input[0] as Limb)
        | ((input[1] as Limb) << 8)
        | ((input[2] as Limb) << 16)
        | ((input[3] as Limb) << 24)
}

/// An element of the field \\( \mathbb Z / (2\^{255} - 19)\\) in short form.
///
/// The value of an element is congruent mod \\(p\\) to
/// \\(\sum\_i t\_i 2\^{\lceil 25.5 i \rceil}\\), but the limbs are only
/// loosely bounded: a freshly multiplied or squared element has every limb
/// within about \\(\pm 2\^{25}\\), and sums or differences of two such
/// elements may be fed straight back into a multiplication.  The unique
/// representative in \\([0, p)\\) only exists after [`FieldElement::to_bytes`].
#[derive(Copy, Clone)]
pub(crate) struct FieldElement(pub(crate) [Limb; 10]);

/// A 19-limb product of two [`FieldElement`]s, before reduction.
///
/// Limb \\(k\\) sits at bit position \\(\lceil 25.5 k \rceil\\), as in the
/// short form.  Slot 10 doubles as the carry out of the top limb while
/// coefficients are being reduced.
#[derive(Copy, Clone)]
pub(crate) struct UnreducedFieldElement(pub(crate) [Limb; 19]);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({:?})", &self.0[..])
    }
}

impl Debug for UnreducedFieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "UnreducedFieldElement({:?})", &self.0[..])
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s.  Since the
    /// internal representation is not canonical, the field elements
    /// are normalized to wire format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        let mut output = *a;
        for i in 0..10 {
            output.0[i] = Limb::conditional_select(&a.0[i], &b.0[i], choice);
        }
        output
    }

    fn conditional_swap(a: &mut FieldElement, b: &mut FieldElement, choice: Choice) {
        for i in 0..10 {
            Limb::conditional_swap(&mut a.0[i], &mut b.0[i], choice);
        }
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<'b> AddAssign<&'b FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &'b FieldElement) {
        for i in 0..10 {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    /// Limb-wise sum.  No carries are propagated.
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = *self;
        output += rhs;
        output
    }
}

impl<'b> SubAssign<&'b FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &'b FieldElement) {
        for i in 0..10 {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    /// Limb-wise difference.  No borrows are propagated.
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        let mut output = *self;
        output -= rhs;
        output
    }
}

impl<'b> MulAssign<&'b FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &'b FieldElement) {
        let result = (self as &FieldElement) * rhs;
        self.0 = result.0;
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    /// Product, reduced in degree and in coefficients.  The output is
    /// always a fresh element, so either input may be reused freely.
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        self.product(rhs).reduce()
    }
}

impl From<&FieldElement> for UnreducedFieldElement {
    /// Widen a short-form element, leaving the upper limbs zero.
    fn from(fe: &FieldElement) -> UnreducedFieldElement {
        let mut limbs = [0; 19];
        limbs[..10].copy_from_slice(&fe.0);
        UnreducedFieldElement(limbs)
    }
}

impl UnreducedFieldElement {
    /// Fold limbs \\(10 \ldots 18\\) onto limbs \\(0 \ldots 8\\), using
    /// \\(2\^{255} \equiv 19 \pmod p\\).
    ///
    /// The upper limbs are left in place; only the low ten are meaningful
    /// afterwards.
    pub(crate) fn reduce_degree(&mut self) {
        let h = &mut self.0;
        h[8] += 19 * h[18];
        h[7] += 19 * h[17];
        h[6] += 19 * h[16];
        h[5] += 19 * h[15];
        h[4] += 19 * h[14];
        h[3] += 19 * h[13];
        h[2] += 19 * h[12];
        h[1] += 19 * h[11];
        h[0] += 19 * h[10];
    }

    /// Bring every one of the low ten limbs into \\([-2\^{25}, 2\^{25}]\\).
    ///
    /// Each pass moves the rounded overflow of each limb into its upper
    /// neighbour; the overflow of limb 9 lands in slot 10 and is folded
    /// back into limb 0 times 19.  Passes repeat until nothing leaves limb
    /// 9, which happens after at most a few passes since each one shrinks
    /// the outstanding carry by about \\(2\^{25}\\).
    pub(crate) fn reduce_coefficients(&mut self) {
        let h = &mut self.0;
        loop {
            h[10] = 0;

            for i in (0..10).step_by(2) {
                // Even limbs are 26 bits wide.  `over` is truncated toward
                // zero, so round the half-carry away from zero instead.
                let over = h[i] / (1 << 25);
                let over2 = (over + ((over >> 63) * 2) + 1) / 2;
                h[i + 1] += over2;
                h[i] -= over2 * (1 << 26);

                let over = h[i + 1] / (1 << 25);
                h[i + 2] += over;
                h[i + 1] -= over * (1 << 25);
            }
            h[0] += 19 * h[10];

            if h[10] == 0 {
                break;
            }
        }
    }

    /// Degree reduction followed by coefficient reduction, truncated to
    /// short form.
    pub(crate) fn reduce(mut self) -> FieldElement {
        self.reduce_degree();
        self.reduce_coefficients();

        let mut output = FieldElement::ZERO;
        output.0.copy_from_slice(&self.0[..10]);
        output
    }
}

impl FieldElement {
    /// The additive identity.
    pub(crate) const ZERO: FieldElement = FieldElement([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// The multiplicative identity.
    pub(crate) const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Unpack a little-endian 32-byte encoding into ten limbs.
    ///
    /// The high bit of the last byte is ignored, and the input is not
    /// required to be canonical: an encoding of \\(p + 9\\) decodes to a
    /// representative of \\(9\\).
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let mut limbs = [0; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let (start, shift) = LIMB_WINDOWS[i];
            *limb = (load4(&bytes[start..]) >> shift) & LIMB_MASKS[i];
        }
        FieldElement(limbs)
    }

    /// Serialize this element to its canonical little-endian encoding, the
    /// unique representative in \\([0, p)\\).
    ///
    /// Any limb pattern is accepted, provided the limbs are not so large
    /// that the carries below overflow.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let mut h = self.0;

        // Carry each limb into its upper neighbour, rounding down, so that
        // negative limbs borrow from above.  Whatever leaves limb 9 is a
        // multiple of 2^255 and re-enters limb 0 times 19.  Repeat until
        // nothing leaves limb 9; then every limb is in [0, 2^width).
        loop {
            for i in 0..9 {
                let carry = h[i] >> LIMB_BITS[i];
                h[i] -= carry << LIMB_BITS[i];
                h[i + 1] += carry;
            }
            let carry = h[9] >> 25;
            h[9] -= carry << 25;
            h[0] += 19 * carry;

            if carry == 0 {
                break;
            }
        }

        // The value is now in [0, 2^255).  It is at least p exactly when
        // limbs 1..9 are all ones and limb 0 is at least 2^26 - 19; in that
        // case subtracting p clears limbs 1..9.
        let mut is_at_least_p = (h[0] as u64).ct_gt(&((1u64 << 26) - 20));
        for i in 1..10 {
            is_at_least_p &= h[i].ct_eq(&LIMB_MASKS[i]);
        }
        h[0] = Limb::conditional_select(&h[0], &(h[0] - ((1 << 26) - 19)), is_at_least_p);
        for limb in h.iter_mut().skip(1) {
            *limb = Limb::conditional_select(limb, &0, is_at_least_p);
        }

        let mut s = [0u8; 32];
        for (i, &limb) in h.iter().enumerate() {
            let (start, shift) = LIMB_WINDOWS[i];
            let word = (limb as u64) << shift;
            s[start] |= word as u8;
            s[start + 1] |= (word >> 8) as u8;
            s[start + 2] |= (word >> 16) as u8;
            s[start + 3] |= (word >> 24) as u8;
        }

        // Check that high bit is cleared
        debug_assert!((s[31] & 0b1000_0000u8) == 0u8);

        s
    }

    /// Determine if this `FieldElement` is zero.
    pub(crate) fn is_zero(&self) -> Choice {
        let zero = [0u8; 32];
        let bytes = self.to_bytes();

        bytes.ct_eq(&zero)
    }

    /// Multiply every limb by a small constant.  No reduction happens here.
    pub(crate) fn scalar_product(&self, scalar: Limb) -> UnreducedFieldElement {
        let mut output = UnreducedFieldElement::from(self);
        for limb in output.0[..10].iter_mut() {
            *limb *= scalar;
        }
        output
    }

    /// Multiply by a small constant and reduce.
    pub(crate) fn mul_small(&self, scalar: Limb) -> FieldElement {
        self.scalar_product(scalar).reduce()
    }

    /// Schoolbook product of `self` and `rhs`, in long form.
    ///
    /// A term \\(f\_i g\_j\\) lives at bit \\(\lceil 25.5 i \rceil +
    /// \lceil 25.5 j \rceil\\), which is one bit above the start of limb
    /// \\(i + j\\) exactly when both \\(i\\) and \\(j\\) are odd.  Those terms
    /// are doubled.
    #[rustfmt::skip] // keep the terms of each coefficient aligned
    pub(crate) fn product(&self, rhs: &FieldElement) -> UnreducedFieldElement {
        let [f0, f1, f2, f3, f4, f5, f6, f7, f8, f9] = self.0;
        let [g0, g1, g2, g3, g4, g5, g6, g7, g8, g9] = rhs.0;

        let mut h = [0; 19];
        h[0]  =      f0*g0;
        h[1]  =      f0*g1 + f1*g0;
        h[2]  =  2 * f1*g1
                   + f0*g2 + f2*g0;
        h[3]  =      f1*g2 + f2*g1 + f0*g3 + f3*g0;
        h[4]  =      f2*g2
              + 2 * (f1*g3 + f3*g1)
                   + f0*g4 + f4*g0;
        h[5]  =      f2*g3 + f3*g2 + f1*g4 + f4*g1 + f0*g5 + f5*g0;
        h[6]  = 2 * (f3*g3 + f1*g5 + f5*g1)
                   + f2*g4 + f4*g2 + f0*g6 + f6*g0;
        h[7]  =      f3*g4 + f4*g3 + f2*g5 + f5*g2 + f1*g6 + f6*g1 + f0*g7 + f7*g0;
        h[8]  =      f4*g4
              + 2 * (f3*g5 + f5*g3 + f1*g7 + f7*g1)
                   + f2*g6 + f6*g2 + f0*g8 + f8*g0;
        h[9]  =      f4*g5 + f5*g4 + f3*g6 + f6*g3 + f2*g7 + f7*g2 + f1*g8 + f8*g1
                   + f0*g9 + f9*g0;
        h[10] = 2 * (f5*g5 + f3*g7 + f7*g3 + f1*g9 + f9*g1)
                   + f4*g6 + f6*g4 + f2*g8 + f8*g2;
        h[11] =      f5*g6 + f6*g5 + f4*g7 + f7*g4 + f3*g8 + f8*g3 + f2*g9 + f9*g2;
        h[12] =      f6*g6
              + 2 * (f5*g7 + f7*g5 + f3*g9 + f9*g3)
                   + f4*g8 + f8*g4;
        h[13] =      f6*g7 + f7*g6 + f5*g8 + f8*g5 + f4*g9 + f9*g4;
        h[14] = 2 * (f7*g7 + f5*g9 + f9*g5)
                   + f6*g8 + f8*g6;
        h[15] =      f7*g8 + f8*g7 + f6*g9 + f9*g6;
        h[16] =      f8*g8
              + 2 * (f7*g9 + f9*g7);
        h[17] =      f8*g9 + f9*g8;
        h[18] =  2 * f9*g9;

        UnreducedFieldElement(h)
    }

    /// The square of `self`, in long form.
    ///
    /// Same coefficients as [`FieldElement::product`] with both inputs
    /// equal, folding each symmetric pair \\(f\_i f\_j + f\_j f\_i\\) into
    /// \\(2 f\_i f\_j\\).
    #[rustfmt::skip] // keep the terms of each coefficient aligned
    pub(crate) fn square_inner(&self) -> UnreducedFieldElement {
        let [f0, f1, f2, f3, f4, f5, f6, f7, f8, f9] = self.0;

        let mut h = [0; 19];
        h[0]  =      f0*f0;
        h[1]  =  2 * f0*f1;
        h[2]  =  2 * (f1*f1 + f0*f2);
        h[3]  =  2 * (f1*f2 + f0*f3);
        h[4]  =      f2*f2
              +  4 * f1*f3
              +  2 * f0*f4;
        h[5]  =  2 * (f2*f3 + f1*f4 + f0*f5);
        h[6]  =  2 * (f3*f3 + f2*f4 + f0*f6
                      + 2 * f1*f5);
        h[7]  =  2 * (f3*f4 + f2*f5 + f1*f6 + f0*f7);
        h[8]  =      f4*f4
              +  2 * (f2*f6 + f0*f8
                      + 2 * (f1*f7 + f3*f5));
        h[9]  =  2 * (f4*f5 + f3*f6 + f2*f7 + f1*f8 + f0*f9);
        h[10] =  2 * (f5*f5 + f4*f6 + f2*f8
                      + 2 * (f3*f7 + f1*f9));
        h[11] =  2 * (f5*f6 + f4*f7 + f3*f8 + f2*f9);
        h[12] =      f6*f6
              +  2 * (f4*f8
                      + 2 * (f5*f7 + f3*f9));
        h[13] =  2 * (f6*f7 + f5*f8 + f4*f9);
        h[14] =  2 * (f7*f7 + f6*f8
                      + 2 * f5*f9);
        h[15] =  2 * (f7*f8 + f6*f9);
        h[16] =      f8*f8
              +  4 * f7*f9;
        h[17] =  2 * f8*f9;
        h[18] =  2 * f9*f9;

        UnreducedFieldElement(h)
    }

    /// Square this field element.
    pub(crate) fn square(&self) -> FieldElement {
        self.square_inner().reduce()
    }

    /// Given `k > 0`, return `self^(2^k)`.
    pub(crate) fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);

        let mut z = self.square();
        for _ in 1..k {
            z = z.square();
        }
        z
    }

    /// Compute `self^(p-2)` by walking [`INVERSION_CHAIN`].
    ///
    /// For nonzero `self` this is the multiplicative inverse; zero maps to
    /// zero.  The sequence of operations does not depend on `self`.
    pub(crate) fn invert(&self) -> FieldElement {
        let mut registers = [FieldElement::ZERO; Register::COUNT];
        registers[Register::Z as usize] = *self;

        for step in INVERSION_CHAIN.iter() {
            match *step {
                ChainStep::Square { dst, src, k } => {
                    registers[dst as usize] = registers[src as usize].pow2k(k);
                }
                ChainStep::Mul { dst, a, b } => {
                    registers[dst as usize] = &registers[a as usize] * &registers[b as usize];
                }
            }
        }

        let inverse = registers[INVERSION_RESULT as usize];

        #[cfg(feature = "zeroize")]
        registers.zeroize();

        inverse
    }
}

// ------------------------------------------------------------------------
// Inversion addition chain
// ------------------------------------------------------------------------

/// Working registers of [`INVERSION_CHAIN`].
///
/// `Pn` holds \\(z\^{2\^n - 1}\\) once it has been written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Register {
    /// The input \\(z\\).
    Z,
    Z2,
    Z9,
    Z11,
    P5,
    P10,
    P20,
    P50,
    P100,
    /// Scratch.
    T,
}

impl Register {
    pub(crate) const COUNT: usize = 10;
}

/// One step of an addition chain over [`Register`]s.
#[derive(Copy, Clone, Debug)]
pub(crate) enum ChainStep {
    /// `dst = src^(2^k)`.
    Square { dst: Register, src: Register, k: u32 },
    /// `dst = a * b`.
    Mul { dst: Register, a: Register, b: Register },
}

use self::ChainStep::{Mul as M, Square as S};
use self::Register::*;

/// Raises \\(z\\) to \\(p - 2 = 2\^{255} - 21\\) with 254 squarings and 11
/// multiplications.  The comment on each step is the exponent of \\(z\\)
/// held by its destination afterwards.
#[rustfmt::skip]
pub(crate) const INVERSION_CHAIN: [ChainStep; 22] = [
    S { dst: Z2,   src: Z,    k: 1   }, // 2
    S { dst: T,    src: Z2,   k: 2   }, // 8
    M { dst: Z9,   a: T,      b: Z    }, // 9
    M { dst: Z11,  a: Z9,     b: Z2   }, // 11
    S { dst: T,    src: Z11,  k: 1   }, // 22
    M { dst: P5,   a: T,      b: Z9   }, // 2^5 - 1
    S { dst: T,    src: P5,   k: 5   }, // 2^10 - 2^5
    M { dst: P10,  a: T,      b: P5   }, // 2^10 - 1
    S { dst: T,    src: P10,  k: 10  }, // 2^20 - 2^10
    M { dst: P20,  a: T,      b: P10  }, // 2^20 - 1
    S { dst: T,    src: P20,  k: 20  }, // 2^40 - 2^20
    M { dst: T,    a: T,      b: P20  }, // 2^40 - 1
    S { dst: T,    src: T,    k: 10  }, // 2^50 - 2^10
    M { dst: P50,  a: T,      b: P10  }, // 2^50 - 1
    S { dst: T,    src: P50,  k: 50  }, // 2^100 - 2^50
    M { dst: P100, a: T,      b: P50  }, // 2^100 - 1
    S { dst: T,    src: P100, k: 100 }, // 2^200 - 2^100
    M { dst: T,    a: T,      b: P100 }, // 2^200 - 1
    S { dst: T,    src: T,    k: 50  }, // 2^250 - 2^50
    M { dst: T,    a: T,      b: P50  }, // 2^250 - 1
    S { dst: T,    src: T,    k: 5   }, // 2^255 - 2^5
    M { dst: T,    a: T,      b: Z11  }, // 2^255 - 21
];

/// The register holding \\(z\^{p-2}\\) once the chain has run.
pub(crate) const INVERSION_RESULT: Register = T;

#[cfg(test)]
mod test {
    use super::*;

    use rand::RngCore;

    /// p = 2^255 - 19, little-endian.
    static P_BYTES: [u8; 32] = [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ];

    /// Random bytes encoding a value below 2^254, hence canonical.
    fn random_canonical_bytes() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        bytes[31] &= 0x3f;
        bytes
    }

    fn small(n: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        bytes
    }

    #[test]
    fn from_bytes_splits_limbs_at_alternating_widths() {
        // Setting bit ceil(25.5 i) alone should set limb i to 1.
        let positions = [0, 26, 51, 77, 102, 128, 153, 179, 204, 230];
        for (i, &bit) in positions.iter().enumerate() {
            let mut bytes = [0u8; 32];
            bytes[bit / 8] = 1 << (bit % 8);
            let fe = FieldElement::from_bytes(&bytes);
            let mut expected = [0; 10];
            expected[i] = 1;
            assert_eq!(fe.0, expected, "bit {}", bit);
        }
    }

    #[test]
    fn from_bytes_ignores_high_bit() {
        let mut bytes = small(9);
        bytes[31] |= 0x80;
        assert_eq!(FieldElement::from_bytes(&bytes).0, FieldElement::from_bytes(&small(9)).0);
    }

    #[test]
    fn from_bytes_to_bytes_on_canonical_input() {
        for _ in 0..100 {
            let bytes = random_canonical_bytes();
            let fe = FieldElement::from_bytes(&bytes);
            assert_eq!(fe.to_bytes(), bytes);
            assert_eq!(FieldElement::from_bytes(&fe.to_bytes()).0, fe.0);
        }
    }

    #[test]
    fn to_bytes_reduces_non_canonical_encodings() {
        // p encodes 0.
        assert_eq!(FieldElement::from_bytes(&P_BYTES).to_bytes(), [0u8; 32]);

        // p + 9 encodes 9.
        let mut p_plus_nine = P_BYTES;
        p_plus_nine[0] += 9;
        assert_eq!(FieldElement::from_bytes(&p_plus_nine).to_bytes(), small(9));

        // 2^255 - 1 encodes 18.
        assert_eq!(FieldElement::from_bytes(&[0xff; 32]).to_bytes(), small(18));
    }

    #[test]
    fn to_bytes_normalizes_negative_limbs() {
        let minus_one = FieldElement([-1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut expected = P_BYTES;
        expected[0] -= 1;
        assert_eq!(minus_one.to_bytes(), expected);

        // -2^26 + 2^26 = 0, spread over two limbs.
        let zero = FieldElement([1 << 26, -1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(zero.to_bytes(), [0u8; 32]);

        // A negative top limb wraps around through 19.
        let wrapped = FieldElement([0, 0, 0, 0, 0, 0, 0, 0, 0, -(1 << 25)]);
        let minus_nineteen = &FieldElement::ZERO - &FieldElement::ONE.mul_small(19);
        assert_eq!(wrapped.to_bytes(), minus_nineteen.to_bytes());
    }

    #[test]
    fn reduce_coefficients_is_idempotent() {
        for _ in 0..100 {
            let a = FieldElement::from_bytes(&random_canonical_bytes());
            let b = FieldElement::from_bytes(&random_canonical_bytes());

            let mut once = a.product(&b);
            once.reduce_degree();
            once.reduce_coefficients();

            let mut twice = once;
            twice.reduce_coefficients();

            assert_eq!(once.0[..10], twice.0[..10]);
            for limb in once.0[..10].iter() {
                assert!(limb.abs() <= 1 << 25);
            }
        }
    }

    #[test]
    fn reduce_degree_folds_by_nineteen() {
        // 2^255 sits at limb 10 and is congruent to 19.
        let mut long = UnreducedFieldElement([0; 19]);
        long.0[10] = 1;
        assert_eq!(long.reduce(), FieldElement::ONE.mul_small(19));
    }

    #[test]
    fn square_matches_mul() {
        for _ in 0..100 {
            let a = FieldElement::from_bytes(&random_canonical_bytes());
            assert_eq!(a.square().0, (&a * &a).0);
        }
    }

    #[test]
    fn product_is_commutative() {
        let a = FieldElement::from_bytes(&random_canonical_bytes());
        let b = FieldElement::from_bytes(&random_canonical_bytes());
        assert_eq!(a.product(&b).0, b.product(&a).0);
    }

    #[test]
    fn mul_small_matches_mul() {
        let a = FieldElement::from_bytes(&random_canonical_bytes());
        let mut k = [0u8; 32];
        k[..4].copy_from_slice(&121665u32.to_le_bytes());
        assert_eq!(a.mul_small(121665), &a * &FieldElement::from_bytes(&k));
    }

    #[test]
    fn minus_one_squared_is_one() {
        let minus_one = &FieldElement::ZERO - &FieldElement::ONE;
        assert_eq!(minus_one.square(), FieldElement::ONE);
    }

    #[test]
    fn a_mul_a_inv_is_one() {
        for _ in 0..20 {
            let a = FieldElement::from_bytes(&random_canonical_bytes());
            if bool::from(a.is_zero()) {
                continue;
            }
            let ainv = a.invert();
            assert_eq!((&a * &ainv).to_bytes(), small(1));
        }
    }

    #[test]
    fn invert_two() {
        // 1/2 = (p + 1) / 2 = 2^254 - 9
        let mut expected = [0xffu8; 32];
        expected[0] = 0xf7;
        expected[31] = 0x3f;
        assert_eq!(FieldElement::from_bytes(&small(2)).invert().to_bytes(), expected);
    }

    #[test]
    fn invert_zero_is_zero() {
        assert_eq!(FieldElement::ZERO.invert().to_bytes(), [0u8; 32]);
        assert!(bool::from(FieldElement::from_bytes(&P_BYTES).invert().is_zero()));
    }

    #[test]
    fn equality() {
        let one = FieldElement::ONE;
        let also_one = &FieldElement([1 << 26, -1, 0, 0, 0, 0, 0, 0, 0, 0]) + &one;
        assert_eq!(one, &also_one - &FieldElement::ZERO);
        assert!(one != FieldElement::ZERO);
    }

    #[test]
    fn conditional_swap() {
        let mut a = FieldElement::ONE;
        let mut b = FieldElement::ZERO;
        FieldElement::conditional_swap(&mut a, &mut b, Choice::from(0));
        assert_eq!(a.0, FieldElement::ONE.0);
        FieldElement::conditional_swap(&mut a, &mut b, Choice::from(1));
        assert_eq!(a.0, FieldElement::ZERO.0);
        assert_eq!(b.0, FieldElement::ONE.0);
    }

    /// A 256-bit exponent, little-endian words.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Exponent([u64; 4]);

    impl Exponent {
        fn double(&mut self) {
            let mut carry = 0;
            for word in self.0.iter_mut() {
                let next = *word >> 63;
                *word = (*word << 1) | carry;
                carry = next;
            }
            assert_eq!(carry, 0);
        }

        fn add(&self, other: &Exponent) -> Exponent {
            let mut out = [0u64; 4];
            let mut carry = 0u64;
            for i in 0..4 {
                let (s, c1) = self.0[i].overflowing_add(other.0[i]);
                let (s, c2) = s.overflowing_add(carry);
                out[i] = s;
                carry = (c1 | c2) as u64;
            }
            assert_eq!(carry, 0);
            Exponent(out)
        }
    }

    #[test]
    fn inversion_chain_computes_p_minus_two() {
        let mut exponents = [Exponent([0; 4]); Register::COUNT];
        exponents[Z as usize] = Exponent([1, 0, 0, 0]);

        let mut squarings = 0;
        let mut multiplications = 0;
        for step in INVERSION_CHAIN.iter() {
            match *step {
                ChainStep::Square { dst, src, k } => {
                    let mut e = exponents[src as usize];
                    for _ in 0..k {
                        e.double();
                    }
                    exponents[dst as usize] = e;
                    squarings += k;
                }
                ChainStep::Mul { dst, a, b } => {
                    exponents[dst as usize] = exponents[a as usize].add(&exponents[b as usize]);
                    multiplications += 1;
                }
            }
        }

        let p_minus_two = Exponent([
            0xffff_ffff_ffff_ffeb,
            0xffff_ffff_ffff_ffff,
            0xffff_ffff_ffff_ffff,
            0x7fff_ffff_ffff_ffff,
        ]);
        assert_eq!(exponents[INVERSION_RESULT as usize], p_minus_two);
        assert_eq!(squarings, 254);
        assert_eq!(multiplications, 11);
    }

    #[test]
    fn inversion_chain_annotations() {
        // Spot-check intermediate registers against the exponents noted on
        // the chain.
        let z = FieldElement::from_bytes(&random_canonical_bytes());
        let z9 = &z.pow2k(3) * &z;
        let z11 = &z9 * &z.square();
        assert_eq!(z11, &z.pow2k(3) * &(&z.square() * &z));
        let p5 = &z11.square() * &z9;
        assert_eq!(&p5 * &z, z.pow2k(5));
    }
}
