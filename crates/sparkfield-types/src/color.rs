//! Packed 4-channel colors.
//!
//! A color is a `u32` holding four 8-bit channels (BGRA in memory order on
//! little-endian targets). Channel bounds in a color range are not required
//! to be ordered: a channel may interpolate downward.

/// A packed 4x8-bit color value.
pub type PackedColor = u32;

/// Interpolate one 8-bit channel: `a + trunc((b - a) * k)`.
///
/// Truncation is toward zero, so a descending channel never undershoots `b`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(a: u8, b: u8, k: f32) -> u8 {
    let delta = ((f32::from(b) - f32::from(a)) * k).trunc();
    // Result lies between a and b for k in [0, 1]; the clamp keeps the cast
    // exact for out-of-range fractions too.
    (f32::from(a) + delta).clamp(0.0, 255.0) as u8
}

/// Blend every channel of `min` toward `max` using one shared fraction.
///
/// All four channels move along the same gradient position, so colors
/// blend between the two endpoints instead of wobbling per channel.
pub fn blend_channels(min: PackedColor, max: PackedColor, k: f32) -> PackedColor {
    let lo = min.to_le_bytes();
    let hi = max.to_le_bytes();
    let mut out = [0_u8; 4];
    for ((channel, a), b) in out.iter_mut().zip(lo).zip(hi) {
        *channel = blend_channel(a, b, k);
    }
    PackedColor::from_le_bytes(out)
}
