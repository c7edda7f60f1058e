//! Stateless math over [`Fx32`].
//!
//! Every function here is built from `Fx32`'s public operations and inherits
//! its saturation policy.

use crate::{FixedError, Fx32};

// ============================================================================
// Constants
// ============================================================================

/// π (3.141593)
pub const PI: Fx32 = literal("3.141593");

/// 2π (6.283185)
pub const TWO_PI: Fx32 = literal("6.283185");

/// π/2 (1.570796)
pub const HALF_PI: Fx32 = literal("1.570796");

/// 1/π (0.318310)
pub const INV_PI: Fx32 = literal("0.318310");

/// Euler's number (2.718282)
pub const E: Fx32 = literal("2.718282");

/// ln 2 (0.693147)
pub const LN_2: Fx32 = literal("0.693147");

/// ln 10 (2.302585)
pub const LN_10: Fx32 = literal("2.302585");

/// Newton rounds `sqrt` may run. Changing it changes results.
pub const SQRT_ITERATIONS: usize = 6;

const fn literal(text: &str) -> Fx32 {
    match Fx32::from_decimal_str(text) {
        Ok(value) => value,
        Err(_) => panic!("invalid decimal constant"),
    }
}

// ============================================================================
// Comparison Utilities
// ============================================================================

/// Returns the absolute value of `a`. `abs(MIN)` saturates to `MAX`.
#[inline]
pub const fn abs(a: Fx32) -> Fx32 {
    if a.is_negative() {
        a.saturating_neg()
    } else {
        a
    }
}

/// Returns the smaller of two values.
#[inline]
pub const fn min(a: Fx32, b: Fx32) -> Fx32 {
    if a.to_raw() < b.to_raw() { a } else { b }
}

/// Returns the larger of two values.
#[inline]
pub const fn max(a: Fx32, b: Fx32) -> Fx32 {
    if a.to_raw() > b.to_raw() { a } else { b }
}

/// Restricts `a` to `lo..=hi`.
///
/// Callers must pass `lo <= hi`. Otherwise the bounds are checked in order:
/// `lo` when `a < lo`, then `hi` when `a > hi`.
#[inline]
pub const fn clamp(a: Fx32, lo: Fx32, hi: Fx32) -> Fx32 {
    if a.to_raw() < lo.to_raw() {
        lo
    } else if a.to_raw() > hi.to_raw() {
        hi
    } else {
        a
    }
}

/// Restricts `a` to `0..=1`.
#[inline]
pub const fn clamp01(a: Fx32) -> Fx32 {
    clamp(a, Fx32::ZERO, Fx32::ONE)
}

// ============================================================================
// Interpolation
// ============================================================================

/// Linear interpolation with `t` clamped to `0..=1`, so the result stays
/// between `a` and `b`.
#[inline]
pub fn lerp(a: Fx32, b: Fx32, t: Fx32) -> Fx32 {
    lerp_unclamped(a, b, clamp01(t))
}

/// Linear interpolation that extrapolates when `t` is outside `0..=1`.
#[inline]
pub fn lerp_unclamped(a: Fx32, b: Fx32, t: Fx32) -> Fx32 {
    a + (b - a) * t
}

// ============================================================================
// Power and Roots
// ============================================================================

/// Raises `base` to an integer power, see [`Fx32::pow`].
///
/// # Errors
/// Returns `FixedError::DivideByZero` for a negative exponent whose positive
/// power is zero.
#[inline]
pub fn pow(base: Fx32, exponent: i32) -> crate::Result<Fx32> {
    base.pow(exponent)
}

/// Square root by Newton-Raphson.
///
/// Seeds the estimate with `a` and runs at most [`SQRT_ITERATIONS`] rounds of
/// `e = (e + a / e) / 2`, stopping as soon as a round leaves the bits
/// unchanged. The budget is fixed: large inputs that have not settled by then
/// return the last estimate.
///
/// # Errors
/// Returns `FixedError::DomainError` if `a` is negative.
pub fn sqrt(a: Fx32) -> crate::Result<Fx32> {
    if a.is_negative() {
        return Err(FixedError::DomainError);
    }

    if a.is_zero() {
        return Ok(Fx32::ZERO);
    }

    let mut estimate = a;
    for _ in 0..SQRT_ITERATIONS {
        let previous = estimate;
        // estimate stays positive, the divisions cannot see zero
        estimate = (estimate + a.try_div(estimate)?).try_div(Fx32::TWO)?;
        if estimate == previous {
            return Ok(estimate);
        }
    }

    log::trace!(
        "sqrt({}) stopped after {} rounds at {}",
        a.exact(),
        SQRT_ITERATIONS,
        estimate.exact()
    );
    Ok(estimate)
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_lerp_stays_between_endpoints(
            a in -(1i32 << 28)..(1i32 << 28),
            b in -(1i32 << 28)..(1i32 << 28),
            t in any::<i32>(),
        ) {
            let (a, b, t) = (Fx32::from_raw(a), Fx32::from_raw(b), Fx32::from_raw(t));
            let result = lerp(a, b, t);
            prop_assert!(result >= min(a, b) && result <= max(a, b));
        }

        #[test]
        fn prop_clamp01_in_unit_range(a in any::<i32>()) {
            let result = clamp01(Fx32::from_raw(a));
            prop_assert!(result >= Fx32::ZERO && result <= Fx32::ONE);
        }

        #[test]
        fn prop_abs_is_never_negative(a in any::<i32>()) {
            prop_assert!(!abs(Fx32::from_raw(a)).is_negative());
        }

        #[test]
        fn prop_sqrt_fails_only_on_negative(a in any::<i32>()) {
            let result = sqrt(Fx32::from_raw(a));
            if a < 0 {
                prop_assert_eq!(result, Err(FixedError::DomainError));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn prop_sqrt_of_small_squares_is_exact(n in 1i32..=9) {
            let square = Fx32::from_int(n * n);
            prop_assert_eq!(sqrt(square), Ok(Fx32::from_int(n)));
        }
    }
}
