// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Arbitrary-precision helpers for pointer counts.
//!
//! Lattice counts grow like `2^cardinality` and pointer totals like its
//! square, so all counting is done on [`BigUint`] and probabilities are kept
//! exact as [`BigRational`] until they are reported.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

/// `2^exp`.
pub fn pow2(exp: usize) -> BigUint {
    BigUint::one() << exp
}

/// The binomial coefficient `n choose k`, zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    // each partial product is itself a binomial coefficient, so the division is exact
    (0..k).fold(BigUint::one(), |acc, i| acc * (n - i) / (i + 1))
}

/// `num / den` as an exact fraction; zero when `den` is zero.
pub fn ratio(num: &BigUint, den: &BigUint) -> BigRational {
    if den.is_zero() {
        return BigRational::zero();
    }
    BigRational::new(BigInt::from(num.clone()), BigInt::from(den.clone()))
}

/// The nearest `f64` to `value`.
pub fn to_f64(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
