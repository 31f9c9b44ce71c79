// -*- mode: rust; -*-
//
// This file is part of curve25519-ladder.
// See LICENSE for licensing information.

//! Curve parameters and the standard basepoint.

use crate::field::Limb;
use crate::montgomery::MontgomeryPoint;

/// The X25519 basepoint, \\(u = 9\\), in `MontgomeryPoint` format.
pub const X25519_BASEPOINT: MontgomeryPoint = MontgomeryPoint(X25519_BASEPOINT_BYTES);

/// The X25519 basepoint, \\(u = 9\\), as little-endian bytes.
pub const X25519_BASEPOINT_BYTES: [u8; 32] = [
    0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The coefficient \\(A = 486662\\) of the Montgomery curve
/// \\(v\^2 = u\^3 + A u\^2 + u\\).
pub(crate) const MONTGOMERY_A: Limb = 486662;

/// \\((A - 2) / 4 = 121665\\), the constant of the ladder's doubling step.
pub(crate) const AMINUS2_OVER_FOUR: Limb = 121665;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn aminus2_over_four() {
        assert_eq!((MONTGOMERY_A - 2) / 4, AMINUS2_OVER_FOUR);
        assert_eq!((MONTGOMERY_A - 2) % 4, 0);
    }
}
