//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Wrap an angle into the range [-pi, pi].
///
/// This matches the convention used for robot heading, where the sign of the
/// heading changes as it passes through pi.
pub fn wrap_to_pi<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    rem_euclid(angle + T::PI(), T::PI() + T::PI()) - T::PI()
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}
