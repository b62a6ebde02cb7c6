// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Arithmetic in the prime field Z/pZ used by every matrix and subspace.
//!
//! Residues are stored as `i64` in `[0, MODULUS)`. Since `MODULUS < 2^30`, a
//! product of two residues fits comfortably in an `i64`.

/// The working prime, 2^30 - 35.
pub const MODULUS: i64 = 1_073_741_789;

/// Reduce any signed integer to its residue in `[0, MODULUS)`.
#[inline]
pub fn reduce(x: i64) -> i64 {
    x.rem_euclid(MODULUS)
}

#[inline]
pub fn add(a: i64, b: i64) -> i64 {
    let s = a + b;
    if s >= MODULUS {
        s - MODULUS
    } else {
        s
    }
}

#[inline]
pub fn sub(a: i64, b: i64) -> i64 {
    let d = a - b;
    if d < 0 {
        d + MODULUS
    } else {
        d
    }
}

#[inline]
pub fn mul(a: i64, b: i64) -> i64 {
    (a * b) % MODULUS
}

#[inline]
pub fn neg(a: i64) -> i64 {
    if a == 0 {
        0
    } else {
        MODULUS - a
    }
}

/// Multiplicative inverse of a nonzero residue (Fermat).
///
/// # Panics
///
/// Panics if `a` is zero mod p; callers only invert pivots.
pub fn inv(a: i64) -> i64 {
    assert!(reduce(a) != 0, "zero has no inverse mod {}", MODULUS);
    pow(reduce(a), MODULUS - 2)
}

/// `base^exp` mod p by square-and-multiply.
pub fn pow(base: i64, mut exp: i64) -> i64 {
    let mut result = 1;
    let mut b = reduce(base);
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul(result, b);
        }
        b = mul(b, b);
        exp >>= 1;
    }
    result
}

/// The representative of `a` in `(-p/2, p/2]`.
pub fn symmetric(a: i64) -> i64 {
    let a = reduce(a);
    if a > MODULUS / 2 {
        a - MODULUS
    } else {
        a
    }
}
