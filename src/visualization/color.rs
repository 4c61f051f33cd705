//! Velocity-to-color mapping.
//!
//! The color scale is fixed for the whole run: speeds are normalized through
//! the global range found by the bounds pass, then mapped onto a blue→red
//! gradient. Slow particles stay blue, fast ones turn red, and the mapping
//! never shifts frame to frame.

use bevy::prelude::Color;

use crate::playback::bounds::AxisRange;

/// Opacity of trail polylines, low enough that trails fade into the trace
/// instead of dominating it.
pub const TRAIL_ALPHA: f32 = 0.2;

/// Blue→red gradient over `t` in `[0, 1]`.
pub fn gradient(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::srgb(t, 0.0, 1.0 - t)
}

/// Color of a particle moving at `speed`, through the fixed normalization.
pub fn speed_color(speed: f64, range: &AxisRange) -> Color {
    gradient(range.normalize(speed) as f32)
}

/// Trail variant of [`speed_color`], at fixed low opacity.
pub fn trail_color(speed: f64, range: &AxisRange) -> Color {
    let t = range.normalize(speed) as f32;
    Color::srgba(t, 0.0, 1.0 - t, TRAIL_ALPHA)
}
