//! Keyframe curve sampling.
//!
//! Model:
//! - Keys are ordered by frame; before the first key the first value holds,
//!   after the last key the last value holds.
//! - A segment [K(i) -> K(i+1)] uses K(i)'s interpolation mode: Constant holds
//!   K(i), Linear blends, Bezier blends with the default ease timing.

use crate::data::{Interpolation, Keyframe};
use crate::interp::functions::{bezier_ease_t, lerp_f32, DEFAULT_EASE};

/// Sample an ordered key slice at `frame`. `None` for an empty slice.
pub fn sample_keys(keys: &[Keyframe], frame: f32) -> Option<f32> {
    let first = keys.first()?;
    if keys.len() == 1 || frame <= first.frame {
        return Some(first.value);
    }
    // index of the first key strictly after `frame`
    let next = keys.partition_point(|k| k.frame <= frame);
    if next >= keys.len() {
        return keys.last().map(|k| k.value);
    }
    let left = &keys[next - 1];
    let right = &keys[next];
    let span = right.frame - left.frame;
    let t = if span > f32::EPSILON {
        ((frame - left.frame) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let value = match left.interpolation {
        Interpolation::Constant => left.value,
        Interpolation::Linear => lerp_f32(left.value, right.value, t),
        Interpolation::Bezier => lerp_f32(left.value, right.value, bezier_ease_t(t, DEFAULT_EASE)),
    };
    Some(value)
}
