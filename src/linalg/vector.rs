// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lifting eigenvectors from Z/pZ to primitive integer vectors.

use super::field::{self, MODULUS};
use num_integer::{Integer, Roots};

/// Recover `n / d` from a residue `x` by rational reconstruction.
///
/// Returns `Some((n, d))` with `d > 0`, `|n|, d <= sqrt(p / 2)` and `n ≡ d * x`,
/// or `None` if no such fraction exists.
pub fn rational_lift(x: i64) -> Option<(i64, i64)> {
    let bound = (MODULUS / 2).sqrt();
    let (mut r0, mut r1) = (MODULUS, field::reduce(x));
    let (mut t0, mut t1) = (0i64, 1i64);
    while r1 > bound {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }
    if t1 == 0 || t1.abs() > bound || r1.gcd(&t1) != 1 {
        return None;
    }
    if t1 < 0 {
        Some((-r1, -t1))
    } else {
        Some((r1, t1))
    }
}

/// Canonical primitive integer representative of a vector given mod p.
///
/// Entries are lifted to fractions, denominators cleared, the content divided
/// out, and the sign fixed so that the first nonzero entry is positive. Entries
/// that cannot be lifted fall back to their symmetric residue, and so does the
/// whole vector if clearing denominators would overflow `i64`.
pub fn make_primitive(residues: &[i64]) -> Vec<i64> {
    let mut fractions = Vec::with_capacity(residues.len());
    let mut unlifted = 0;
    for &x in residues {
        match rational_lift(x) {
            Some(frac) => fractions.push(frac),
            None => {
                unlifted += 1;
                fractions.push((field::symmetric(x), 1));
            }
        }
    }
    if unlifted > 0 {
        log::warn!(
            "Unable to lift {} eigenvector entries from mod {}",
            unlifted,
            MODULUS
        );
    }

    let mut v = match clear_denominators(&fractions) {
        Some(v) => v,
        None => {
            log::warn!(
                "Unable to lift eigenvector from mod {}: denominators too large",
                MODULUS
            );
            residues.iter().map(|&x| field::symmetric(x)).collect()
        }
    };

    let content = v.iter().fold(0i64, |acc, x| acc.gcd(x));
    if content > 1 {
        for x in &mut v {
            *x /= content;
        }
    }
    if v.iter().find(|&&x| x != 0).is_some_and(|&x| x < 0) {
        for x in &mut v {
            *x = -*x;
        }
    }
    v
}

/// Scale fractions `n / d` by the lcm of their denominators; `None` on overflow.
fn clear_denominators(fractions: &[(i64, i64)]) -> Option<Vec<i64>> {
    let common = fractions
        .iter()
        .try_fold(1i64, |acc, &(_, d)| (acc / acc.gcd(&d)).checked_mul(d))?;
    fractions
        .iter()
        .map(|&(n, d)| n.checked_mul(common / d))
        .collect()
}

/// The `i`-th standard basis vector of length `n`.
pub fn unit_vector(n: usize, i: usize) -> Vec<i64> {
    let mut v = vec![0; n];
    v[i] = 1;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lift_small_integers() {
        assert_eq!(rational_lift(0), Some((0, 1)));
        assert_eq!(rational_lift(5), Some((5, 1)));
        assert_eq!(rational_lift(-7), Some((-7, 1)));
    }

    #[test]
    fn test_lift_fraction() {
        let third = field::inv(3);
        assert_eq!(rational_lift(field::mul(2, third)), Some((2, 3)));
        assert_eq!(rational_lift(field::neg(third)), Some((-1, 3)));
    }

    #[test]
    fn test_make_primitive_clears_denominators() {
        let half = field::inv(2);
        let v = make_primitive(&[half, 1, 0]);
        assert_eq!(v, vec![1, 2, 0]);
    }

    #[test]
    fn test_make_primitive_divides_content_and_fixes_sign() {
        let v = make_primitive(&[0, field::reduce(-4), 6]);
        assert_eq!(v, vec![0, 2, -3]);
    }

    #[test]
    fn test_make_primitive_zero_vector() {
        assert_eq!(make_primitive(&[0, 0]), vec![0, 0]);
    }

    #[test]
    fn test_make_primitive_falls_back_when_denominators_overflow() {
        let primes = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61];
        let residues: Vec<i64> = primes.iter().map(|&p| field::inv(p)).collect();
        assert!(clear_denominators(
            &residues.iter().map(|&x| rational_lift(x).unwrap()).collect::<Vec<_>>()
        )
        .is_none());

        let v = make_primitive(&residues);
        assert_eq!(v.len(), primes.len());
        assert!(v[0] > 0);
        // Still a multiple of the input mod p.
        for i in 1..v.len() {
            assert_eq!(
                field::mul(field::reduce(v[i]), residues[0]),
                field::mul(field::reduce(v[0]), residues[i])
            );
        }
    }

    #[test]
    fn test_clear_denominators_small() {
        assert_eq!(
            clear_denominators(&[(1, 2), (1, 3), (-1, 1)]),
            Some(vec![3, 2, -6])
        );
    }

    #[test]
    fn test_unit_vector() {
        assert_eq!(unit_vector(3, 0), vec![1, 0, 0]);
    }
}
