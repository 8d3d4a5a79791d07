//! Interpolation helpers:
//! - lerp_f32 (scalar linear blend)
//! - bezier_ease_t (cubic-bezier timing curve)
//! - normalize_quat / align_quat (quaternion hygiene for sampled rotations)

/// Default ease-in/ease-out control points (x1, y1, x2, y2) for Bezier keys.
pub const DEFAULT_EASE: [f32; 4] = [0.42, 0.0, 0.58, 1.0];

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion; a zero quaternion is returned unchanged.
#[inline]
pub fn normalize_quat(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in &mut q {
            *c *= inv_len;
        }
    }
    q
}

/// Flip `q` onto the same hemisphere as `reference` so consecutive samples
/// take the shortest arc instead of jumping between `q` and `-q`.
#[inline]
pub fn align_quat(reference: [f32; 4], q: [f32; 4]) -> [f32; 4] {
    if dot4(reference, q) < 0.0 {
        q.map(|c| -c)
    } else {
        q
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
pub fn bezier_ease_t(t: f32, ctrl: [f32; 4]) -> f32 {
    let [x1, y1, x2, y2] = ctrl;
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_is_symmetric_and_pinned() {
        assert_eq!(bezier_ease_t(0.0, DEFAULT_EASE), 0.0);
        assert!((bezier_ease_t(1.0, DEFAULT_EASE) - 1.0).abs() < 1e-5);
        assert!((bezier_ease_t(0.5, DEFAULT_EASE) - 0.5).abs() < 1e-4);
        assert!(bezier_ease_t(0.25, DEFAULT_EASE) < 0.25);
    }

    #[test]
    fn align_flips_opposite_hemisphere() {
        let q = align_quat([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0, -1.0]);
        assert_eq!(q[3], 1.0);
        let kept = align_quat([0.0, 0.0, 0.0, 1.0], [0.0, 0.6, 0.0, 0.8]);
        assert_eq!(kept, [0.0, 0.6, 0.0, 0.8]);
    }
}
