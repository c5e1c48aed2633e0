/// Overshoot constant of the classic back easing.
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// Ease-out-back: overshoots past 1 before settling. `f(0) = 0`, `f(1) = 1`.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let s = BACK_OVERSHOOT;
    let p = t - 1.0;
    p * p * ((s + 1.0) * p + s) + 1.0
}

#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `min(1, step / total)`; a zero-length phase counts as complete.
#[inline]
pub fn progress(step: u32, total: u32) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (step as f32 / total as f32).clamp(0.0, 1.0)
}

/// `255 * fraction`, truncated.
#[inline]
pub fn opacity_from_fraction(fraction: f32) -> u8 {
    (255.0 * fraction).clamp(0.0, 255.0) as u8
}
