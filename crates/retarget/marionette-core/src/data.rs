//! Keyframe action model: channels, keyframes and named actions.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::baking::FrameRange;
use crate::sampling::sample_keys;
use crate::transform::Transform;

/// What a channel animates: the skeleton object itself or one named bone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelTarget {
    Object,
    Bone(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Location,
    /// Quaternion components in (w, x, y, z) order.
    Rotation,
    Scale,
}

impl Property {
    pub const ALL: [Property; 3] = [Property::Location, Property::Rotation, Property::Scale];

    /// Number of scalar components.
    pub fn arity(self) -> u8 {
        match self {
            Property::Rotation => 4,
            Property::Location | Property::Scale => 3,
        }
    }

    pub fn data_path_name(self) -> &'static str {
        match self {
            Property::Location => "location",
            Property::Rotation => "rotation_quaternion",
            Property::Scale => "scale",
        }
    }

    pub fn from_data_path_name(s: &str) -> Option<Self> {
        match s {
            "location" => Some(Property::Location),
            "rotation_quaternion" | "rotation" => Some(Property::Rotation),
            "scale" => Some(Property::Scale),
            _ => None,
        }
    }

    /// Read one component from a transform. `None` when `index` is not
    /// below [`Property::arity`].
    pub fn component(self, t: &Transform, index: u8) -> Option<f32> {
        if index >= self.arity() {
            return None;
        }
        let i = index as usize;
        Some(match self {
            Property::Location => t.translation[i],
            Property::Scale => t.scale[i],
            // stored (x, y, z, w), channels are (w, x, y, z)
            Property::Rotation => t.rotation[(i + 3) % 4],
        })
    }

    /// Write one component into a transform. Out-of-range indices are
    /// ignored and reported as `false`.
    pub fn set_component(self, t: &mut Transform, index: u8, value: f32) -> bool {
        if index >= self.arity() {
            return false;
        }
        let i = index as usize;
        match self {
            Property::Location => t.translation[i] = value,
            Property::Scale => t.scale[i] = value,
            Property::Rotation => t.rotation[(i + 3) % 4] = value,
        }
        true
    }
}

/// One animated scalar, e.g. rotation W of bone "hip".
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Channel {
    pub target: ChannelTarget,
    pub property: Property,
    pub index: u8,
}

impl Channel {
    pub fn bone(bone: &str, property: Property, index: u8) -> Self {
        Self {
            target: ChannelTarget::Bone(bone.to_string()),
            property,
            index,
        }
    }

    pub fn object(property: Property, index: u8) -> Self {
        Self {
            target: ChannelTarget::Object,
            property,
            index,
        }
    }

    pub fn bone_name(&self) -> Option<&str> {
        match &self.target {
            ChannelTarget::Bone(name) => Some(name),
            ChannelTarget::Object => None,
        }
    }
}

impl fmt::Display for Channel {
    /// Host-style data path, e.g. `pose.bones["hip"].location[0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ChannelTarget::Object => {
                write!(f, "{}[{}]", self.property.data_path_name(), self.index)
            }
            ChannelTarget::Bone(name) => write!(
                f,
                "pose.bones[\"{}\"].{}[{}]",
                name,
                self.property.data_path_name(),
                self.index
            ),
        }
    }
}

/// Interpolation from a keyframe towards the next one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interpolation {
    /// Hold the left value until the next key.
    Constant,
    Linear,
    /// Eased ease-in/ease-out segment (default for hand-authored keys).
    #[default]
    Bezier,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl Keyframe {
    pub fn new(frame: f32, value: f32, interpolation: Interpolation) -> Self {
        Self {
            frame,
            value,
            interpolation,
        }
    }
}

/// Named container of keyframe channels.
///
/// Channels keep insertion order; keys within a channel are ordered by frame
/// and unique per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    name: String,
    curves: IndexMap<Channel, Vec<Keyframe>>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a key, replacing any key already sitting on the same frame.
    pub fn insert_keyframe(&mut self, channel: Channel, key: Keyframe) {
        let keys = self.curves.entry(channel).or_default();
        // Appending in frame order is the hot path while baking.
        if keys.last().map_or(true, |last| last.frame < key.frame) {
            keys.push(key);
            return;
        }
        match keys.binary_search_by(|k| k.frame.total_cmp(&key.frame)) {
            Ok(i) => keys[i] = key,
            Err(i) => keys.insert(i, key),
        }
    }

    pub fn keyframes(&self, channel: &Channel) -> Option<&[Keyframe]> {
        self.curves.get(channel).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.curves.keys()
    }

    pub fn curves(&self) -> impl Iterator<Item = (&Channel, &[Keyframe])> {
        self.curves.iter().map(|(c, k)| (c, k.as_slice()))
    }

    pub fn channel_count(&self) -> usize {
        self.curves.len()
    }

    pub fn keyframe_count(&self) -> usize {
        self.curves.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframe_count() == 0
    }

    /// Integer frame span covering every key, `None` when there are no keys.
    pub fn frame_range(&self) -> Option<FrameRange> {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for key in self.curves.values().flatten() {
            lo = lo.min(key.frame);
            hi = hi.max(key.frame);
        }
        if lo > hi {
            return None;
        }
        FrameRange::new(lo.floor() as i32, hi.ceil() as i32).ok()
    }

    /// Evaluate one channel at `frame`.
    pub fn sample(&self, channel: &Channel, frame: f32) -> Option<f32> {
        self.curves.get(channel).and_then(|keys| sample_keys(keys, frame))
    }

    /// Move every key to the nearest whole frame. Keys that collapse onto the
    /// same frame keep the later one.
    pub fn snap_to_nearest_frame(&mut self) {
        for keys in self.curves.values_mut() {
            for key in keys.iter_mut() {
                key.frame = key.frame.round();
            }
            keys.sort_by(|a, b| a.frame.total_cmp(&b.frame));
            let mut deduped: Vec<Keyframe> = Vec::with_capacity(keys.len());
            for key in keys.drain(..) {
                match deduped.last_mut() {
                    Some(prev) if prev.frame == key.frame => *prev = key,
                    _ => deduped.push(key),
                }
            }
            *keys = deduped;
        }
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        for key in self.curves.values_mut().flatten() {
            key.interpolation = interpolation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_renders_as_data_path() {
        assert_eq!(
            Channel::bone("hip", Property::Location, 0).to_string(),
            "pose.bones[\"hip\"].location[0]"
        );
        assert_eq!(
            Channel::object(Property::Rotation, 3).to_string(),
            "rotation_quaternion[3]"
        );
    }

    #[test]
    fn rotation_components_are_w_first() {
        let mut t = Transform::from_rotation([0.1, 0.2, 0.3, 0.9]);
        assert_eq!(Property::Rotation.component(&t, 0), Some(0.9));
        assert_eq!(Property::Rotation.component(&t, 1), Some(0.1));
        assert!(Property::Rotation.set_component(&mut t, 3, 0.5));
        assert_eq!(t.rotation[2], 0.5);
    }

    #[test]
    fn out_of_range_components_are_refused() {
        let mut t = Transform::IDENTITY;
        assert_eq!(Property::Location.component(&t, 3), None);
        assert!(!Property::Scale.set_component(&mut t, 3, 2.0));
        assert!(!Property::Rotation.set_component(&mut t, 4, 2.0));
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn insert_keeps_frame_order_and_replaces_same_frame() {
        let ch = Channel::bone("hip", Property::Location, 1);
        let mut a = Action::new("A");
        a.insert_keyframe(ch.clone(), Keyframe::new(5.0, 1.0, Interpolation::Linear));
        a.insert_keyframe(ch.clone(), Keyframe::new(1.0, 0.0, Interpolation::Linear));
        a.insert_keyframe(ch.clone(), Keyframe::new(5.0, 2.0, Interpolation::Linear));
        let keys = a.keyframes(&ch).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].frame, 1.0);
        assert_eq!(keys[1].value, 2.0);
    }

    #[test]
    fn snapping_merges_jittered_keys() {
        let ch = Channel::object(Property::Scale, 0);
        let mut a = Action::new("A");
        a.insert_keyframe(ch.clone(), Keyframe::new(0.98, 1.0, Interpolation::Bezier));
        a.insert_keyframe(ch.clone(), Keyframe::new(1.02, 2.0, Interpolation::Bezier));
        a.insert_keyframe(ch.clone(), Keyframe::new(2.4, 3.0, Interpolation::Bezier));
        a.snap_to_nearest_frame();
        a.set_interpolation(Interpolation::Linear);
        let keys = a.keyframes(&ch).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!((keys[0].frame, keys[0].value), (1.0, 2.0));
        assert_eq!(keys[1].frame, 2.0);
        assert!(keys.iter().all(|k| k.interpolation == Interpolation::Linear));
        assert_eq!(a.frame_range(), Some(FrameRange::new(1, 2).unwrap()));
    }
}
