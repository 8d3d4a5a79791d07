use serde::Deserialize;

use crate::data::{Action, Channel, ChannelTarget, Interpolation, Keyframe, Property};
use crate::error::{Result, RetargetError};
use crate::skeleton::{Skeleton, SkeletonBuilder};
use crate::transform::Transform;

/// Parse stored skeleton JSON (see fixtures/skeletons/*.json).
///
/// Notes:
/// - Bones list their parent by name; a parent must appear before its children.
/// - `translation`, `rotation` (x, y, z, w) and `scale` default to identity.
/// - An optional `root` object carries the skeleton object transform.
pub fn parse_stored_skeleton_json(s: &str) -> Result<Skeleton> {
    let stored: StoredSkeleton = serde_json::from_str(s).map_err(parse_error)?;
    let mut builder: SkeletonBuilder = Skeleton::builder(stored.name).root(stored.root);
    for bone in &stored.bones {
        builder = builder.bone(&bone.name, bone.parent.as_deref(), bone.bind);
    }
    builder.build()
}

/// Parse stored action JSON (see fixtures/actions/*.json).
///
/// Notes:
/// - `target` is a bone name, or null for the skeleton object.
/// - `property` uses host data path names: location, rotation_quaternion, scale.
/// - Keys are `[frame, value]` or `[frame, value, "LINEAR" | "CONSTANT" | "BEZIER"]`;
///   the mode defaults to BEZIER like hand-authored host keys.
pub fn parse_stored_action_json(s: &str) -> Result<Action> {
    let stored: StoredAction = serde_json::from_str(s).map_err(parse_error)?;
    let mut action = Action::new(stored.name);
    for ch in stored.channels {
        let property = Property::from_data_path_name(&ch.property).ok_or_else(|| {
            RetargetError::Parse(format!("unknown property '{}'", ch.property))
        })?;
        if ch.index >= property.arity() {
            return Err(RetargetError::Parse(format!(
                "index {} out of range for '{}'",
                ch.index, ch.property
            )));
        }
        let channel = Channel {
            target: ch.target.map_or(ChannelTarget::Object, ChannelTarget::Bone),
            property,
            index: ch.index,
        };
        for key in ch.keys {
            let (frame, value, interpolation) = match key {
                RawKey::Full(f, v, i) => (f, v, i),
                RawKey::Bare(f, v) => (f, v, Interpolation::default()),
            };
            if !frame.is_finite() || !value.is_finite() {
                return Err(RetargetError::Parse(format!(
                    "non-finite key on channel {channel}"
                )));
            }
            action.insert_keyframe(channel.clone(), Keyframe::new(frame, value, interpolation));
        }
    }
    Ok(action)
}

fn parse_error(e: serde_json::Error) -> RetargetError {
    RetargetError::Parse(e.to_string())
}

// ---------- Stored JSON schema ----------

#[derive(Debug, Deserialize)]
struct StoredSkeleton {
    name: String,
    #[serde(default)]
    root: Transform,
    #[serde(default)]
    bones: Vec<StoredBone>,
}

#[derive(Debug, Deserialize)]
struct StoredBone {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(flatten)]
    bind: Transform,
}

#[derive(Debug, Deserialize)]
struct StoredAction {
    name: String,
    #[serde(default)]
    channels: Vec<StoredChannel>,
}

#[derive(Debug, Deserialize)]
struct StoredChannel {
    #[serde(default)]
    target: Option<String>,
    property: String,
    index: u8,
    #[serde(default)]
    keys: Vec<RawKey>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKey {
    Full(f32, f32, Interpolation),
    Bare(f32, f32),
}
