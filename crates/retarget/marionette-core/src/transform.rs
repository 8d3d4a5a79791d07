//! TRS transform with quaternion rotation (x, y, z, w).
//!
//! Composition follows the usual engine convention: `parent.compose(child)`
//! scales, rotates then translates the child into the parent's space. Scale is
//! carried component-wise, which is exact for uniform scale and the common
//! approximation for non-uniform scale.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default = "zero3")]
    pub translation: [f32; 3],
    /// Quaternion (x, y, z, w)
    #[serde(default = "identity_quat")]
    pub rotation: [f32; 4],
    #[serde(default = "one3")]
    pub scale: [f32; 3],
}

fn zero3() -> [f32; 3] {
    [0.0; 3]
}

fn one3() -> [f32; 3] {
    [1.0; 3]
}

fn identity_quat() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn safe_recip(v: f32) -> f32 {
    if v.abs() <= f32::EPSILON {
        0.0
    } else {
        v.recip()
    }
}

#[inline]
fn to_vector(v: [f32; 3]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}

#[inline]
fn from_vector(v: Vector3<f32>) -> [f32; 3] {
    [v.x, v.y, v.z]
}

#[inline]
fn from_unit_quat(q: &UnitQuaternion<f32>) -> [f32; 4] {
    [q.i, q.j, q.k, q.w]
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    };

    pub fn new(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: [f32; 4]) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Rotation about a unit axis, handy for building test poses.
    pub fn from_axis_angle(axis: [f32; 3], angle: f32) -> Self {
        let axis = nalgebra::Unit::new_normalize(to_vector(axis));
        let q = UnitQuaternion::from_axis_angle(&axis, angle);
        Self::from_rotation(from_unit_quat(&q))
    }

    /// Rotation as a unit quaternion. A zero quaternion reads as identity.
    pub fn rotation_quaternion(&self) -> UnitQuaternion<f32> {
        let [x, y, z, w] = self.rotation;
        let q = Quaternion::new(w, x, y, z);
        if q.norm_squared() <= f32::EPSILON {
            UnitQuaternion::identity()
        } else {
            UnitQuaternion::new_normalize(q)
        }
    }

    /// `self` as parent, `child` expressed in the parent's space.
    pub fn compose(&self, child: &Transform) -> Transform {
        let rot = self.rotation_quaternion();
        let scaled = to_vector(child.translation).component_mul(&to_vector(self.scale));
        let translation = to_vector(self.translation) + rot * scaled;
        let rotation = rot * child.rotation_quaternion();
        Transform {
            translation: from_vector(translation),
            rotation: from_unit_quat(&rotation),
            scale: from_vector(to_vector(self.scale).component_mul(&to_vector(child.scale))),
        }
    }

    /// Local transform `l` such that `parent.compose(&l) == *self`.
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv_rot = parent.rotation_quaternion().inverse();
        let inv_scale = Vector3::new(
            safe_recip(parent.scale[0]),
            safe_recip(parent.scale[1]),
            safe_recip(parent.scale[2]),
        );
        let delta = to_vector(self.translation) - to_vector(parent.translation);
        let translation = (inv_rot * delta).component_mul(&inv_scale);
        let rotation = inv_rot * self.rotation_quaternion();
        Transform {
            translation: from_vector(translation),
            rotation: from_unit_quat(&rotation),
            scale: from_vector(to_vector(self.scale).component_mul(&inv_scale)),
        }
    }

    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let scaled = to_vector(p).component_mul(&to_vector(self.scale));
        from_vector(to_vector(self.translation) + self.rotation_quaternion() * scaled)
    }

    /// Component-wise comparison; `q` and `-q` count as the same rotation.
    pub fn approx_eq(&self, other: &Transform, eps: f32) -> bool {
        let close = |a: &[f32], b: &[f32]| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps);
        let neg = other.rotation.map(|c| -c);
        close(&self.translation, &other.translation)
            && close(&self.scale, &other.scale)
            && (close(&self.rotation, &other.rotation) || close(&self.rotation, &neg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn compose_rotates_and_scales_child_offset() {
        let parent = Transform {
            translation: [1.0, 0.0, 0.0],
            scale: [2.0; 3],
            ..Transform::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2)
        };
        let child = Transform::from_translation([1.0, 0.0, 0.0]);
        let world = parent.compose(&child);
        assert!(world.approx_eq(
            &Transform {
                translation: [1.0, 2.0, 0.0],
                rotation: parent.rotation,
                scale: [2.0; 3],
            },
            1e-5
        ));
    }

    #[test]
    fn relative_to_inverts_compose() {
        let parent = Transform {
            translation: [0.5, -1.0, 3.0],
            scale: [1.0, 2.0, 0.5],
            ..Transform::from_axis_angle([1.0, 1.0, 0.0], 0.7)
        };
        let local = Transform {
            translation: [0.2, 0.4, -0.1],
            scale: [1.5, 1.0, 1.0],
            ..Transform::from_axis_angle([0.0, 1.0, 0.0], -0.3)
        };
        let world = parent.compose(&local);
        assert!(world.relative_to(&parent).approx_eq(&local, 1e-5));
    }

    #[test]
    fn zero_quaternion_reads_as_identity() {
        let t = Transform::from_rotation([0.0; 4]);
        assert_eq!(t.transform_point([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }
}
