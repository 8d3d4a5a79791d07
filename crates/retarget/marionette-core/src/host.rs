//! Seam to host time and pose evaluation.

use log::warn;

use crate::data::{Action, ChannelTarget, Property};
use crate::interp::functions::normalize_quat;
use crate::pose::Pose;
use crate::sampling::sample_keys;
use crate::skeleton::Skeleton;

/// Anything that can move to a frame and report the performer pose there.
///
/// `current_frame` may differ from the requested frame on hosts with
/// sub-frame timing. Bakers key at the requested frame and only log drift.
pub trait PoseSource {
    fn set_frame(&mut self, frame: i32);
    fn current_frame(&self) -> f32;
    fn current_pose(&mut self, performer: &Skeleton) -> Pose;
}

/// Plays one action on the performer, evaluated over its rest pose.
///
/// Channels naming bones the performer does not have, or components past
/// the property's arity, are ignored.
#[derive(Clone, Debug)]
pub struct ActionDriver {
    action: Action,
    frame: f32,
}

impl ActionDriver {
    pub fn new(action: Action) -> Self {
        Self { action, frame: 0.0 }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl PoseSource for ActionDriver {
    fn set_frame(&mut self, frame: i32) {
        self.frame = frame as f32;
    }

    fn current_frame(&self) -> f32 {
        self.frame
    }

    fn current_pose(&mut self, performer: &Skeleton) -> Pose {
        let mut pose = Pose::rest(performer);
        let mut rotated_root = false;
        for (channel, keys) in self.action.curves() {
            let Some(value) = sample_keys(keys, self.frame) else {
                continue;
            };
            let target = match &channel.target {
                ChannelTarget::Object => {
                    rotated_root |= channel.property == Property::Rotation;
                    &mut pose.root
                }
                ChannelTarget::Bone(name) => match pose.get_mut(name) {
                    Some(t) => t,
                    None => continue,
                },
            };
            if !channel.property.set_component(target, channel.index, value) {
                warn!("skipping {channel}: index out of range");
            }
        }

        if rotated_root {
            pose.root.rotation = normalize_quat(pose.root.rotation);
        }
        for bone in performer.bones() {
            if let Some(t) = pose.get_mut(&bone.name) {
                t.rotation = normalize_quat(t.rotation);
            }
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Channel, Interpolation, Keyframe};
    use crate::transform::Transform;

    #[test]
    fn evaluates_bone_and_object_channels() {
        let performer = Skeleton::builder("P")
            .bone("hip", None, Transform::from_translation([0.0, 1.0, 0.0]))
            .build()
            .unwrap();
        let mut walk = Action::new("Walk");
        let x = Channel::bone("hip", Property::Location, 0);
        walk.insert_keyframe(x.clone(), Keyframe::new(0.0, 0.0, Interpolation::Linear));
        walk.insert_keyframe(x, Keyframe::new(10.0, 10.0, Interpolation::Linear));
        walk.insert_keyframe(
            Channel::object(Property::Location, 2),
            Keyframe::new(0.0, 3.0, Interpolation::Constant),
        );
        walk.insert_keyframe(
            Channel::bone("missing", Property::Scale, 0),
            Keyframe::new(0.0, 9.0, Interpolation::Constant),
        );

        let mut driver = ActionDriver::new(walk);
        driver.set_frame(4);
        assert_eq!(driver.current_frame(), 4.0);
        let pose = driver.current_pose(&performer);
        let hip = pose.get("hip").unwrap();
        assert!((hip.translation[0] - 4.0).abs() < 1e-6);
        assert_eq!(hip.translation[1], 1.0);
        assert_eq!(pose.root.translation[2], 3.0);
        assert!(pose.get("missing").is_none());
    }

    #[test]
    fn out_of_range_channel_index_is_ignored() {
        let performer = Skeleton::builder("P")
            .bone("hip", None, Transform::IDENTITY)
            .build()
            .unwrap();
        let mut bad = Action::new("Bad");
        bad.insert_keyframe(
            Channel::bone("hip", Property::Location, 3),
            Keyframe::new(0.0, 5.0, Interpolation::Linear),
        );
        bad.insert_keyframe(
            Channel::object(Property::Scale, 7),
            Keyframe::new(0.0, 5.0, Interpolation::Linear),
        );
        let pose = ActionDriver::new(bad).current_pose(&performer);
        assert_eq!(*pose.get("hip").unwrap(), Transform::IDENTITY);
        assert_eq!(pose.root, Transform::IDENTITY);
    }

    #[test]
    fn partially_keyed_rotation_is_normalized() {
        let performer = Skeleton::builder("P")
            .bone("hip", None, Transform::IDENTITY)
            .build()
            .unwrap();
        let mut spin = Action::new("Spin");
        spin.insert_keyframe(
            Channel::bone("hip", Property::Rotation, 3),
            Keyframe::new(0.0, 1.0, Interpolation::Linear),
        );
        let pose = ActionDriver::new(spin).current_pose(&performer);
        let q = pose.get("hip").unwrap().rotation;
        let len = q.iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((len - 1.0).abs() < 1e-6);
    }
}
