//! Scalar helpers shared by the control stages.
//!
//! All functions are branch-light and allocation-free; they run inside the
//! per-cycle update.

/// Positive floating-point modulo: result lies in `[0, y)` for `y > 0`.
#[inline]
pub fn fmod_pos(x: f32, y: f32) -> f32 {
    let r = x % y;
    if r < 0.0 {
        // r + y can round up to exactly y for tiny negative r
        let wrapped = r + y;
        if wrapped >= y { 0.0 } else { wrapped }
    } else {
        r
    }
}

/// Wrap `x` into `[-half_range, half_range)`.
///
/// Used for shortest-path circular errors: with `half_range = cpr / 2`,
/// a raw difference of `cpr - 142` wraps to `-142`.
#[inline]
pub fn wrap_pm(x: f32, half_range: f32) -> f32 {
    let full = 2.0 * half_range;
    fmod_pos(x + half_range, full) - half_range
}

/// Clamp `x` symmetrically to `[-bound, bound]`.
///
/// Never panics; a negative `bound` is checked upper-first.
#[inline]
pub fn clamp_bidir(x: f32, bound: f32) -> f32 {
    if x > bound {
        bound
    } else if x < -bound {
        -bound
    } else {
        x
    }
}

/// Sign with zero mapped to `+1`.
#[inline]
pub fn sign_hard(x: f32) -> f32 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}
