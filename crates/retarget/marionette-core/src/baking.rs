//! Baking: sample the bound puppet once per frame into a keyframe action.

use std::ops::RangeInclusive;

use log::{debug, warn};
use serde::Serialize;

use crate::binding::Binding;
use crate::config::{BakeConfig, KeySpace};
use crate::data::{Action, Channel, Interpolation, Keyframe, Property};
use crate::error::{Result, RetargetError};
use crate::host::PoseSource;
use crate::interp::functions::align_quat;
use crate::library::ActionLibrary;
use crate::naming::baked_action_name;
use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// Inclusive integer frame range, `start <= end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FrameRange {
    start: i32,
    end: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(RetargetError::EmptyFrameRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn frames(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    /// Number of frames, both ends included.
    pub fn frame_count(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }
}

/// Channels of one keyed element plus the last rotation written, used to keep
/// consecutive quaternions on one hemisphere.
struct KeyedSlot {
    channels: Vec<(Property, u8, Channel)>,
    last_rotation: Option<[f32; 4]>,
}

impl KeyedSlot {
    fn new(bone: Option<&str>, cfg: &BakeConfig) -> Self {
        let mut channels = Vec::new();
        for property in Property::ALL {
            let enabled = match property {
                Property::Location => cfg.location,
                Property::Rotation => cfg.rotation,
                Property::Scale => cfg.scale,
            };
            if !enabled {
                continue;
            }
            for index in 0..property.arity() {
                let channel = match bone {
                    Some(name) => Channel::bone(name, property, index),
                    None => Channel::object(property, index),
                };
                channels.push((property, index, channel));
            }
        }
        Self {
            channels,
            last_rotation: None,
        }
    }

    fn key(&mut self, action: &mut Action, frame: f32, mut t: Transform) {
        if let Some(prev) = self.last_rotation {
            t.rotation = align_quat(prev, t.rotation);
        }
        self.last_rotation = Some(t.rotation);
        for (property, index, channel) in &self.channels {
            if let Some(value) = property.component(&t, *index) {
                action.insert_keyframe(
                    channel.clone(),
                    Keyframe::new(frame, value, Interpolation::Linear),
                );
            }
        }
    }
}

/// Samples a bound puppet into baked actions.
#[derive(Clone, Debug, Default)]
pub struct Baker {
    cfg: BakeConfig,
}

impl Baker {
    pub fn new(cfg: BakeConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &BakeConfig {
        &self.cfg
    }

    /// Bake `source_name` over `range` and store it as `<source_name>_Exp`,
    /// replacing any earlier bake of that name.
    ///
    /// Every frame is driven through `host`, solved through `binding`, and
    /// keyed for each driven bone (and the puppet object when the binding
    /// maps a root) at the requested frame, whatever sub-frame the host
    /// reports. Keys are then snapped to whole frames and made linear.
    /// The library is only touched once the action is complete.
    #[allow(clippy::too_many_arguments)]
    pub fn bake<'lib>(
        &self,
        source_name: &str,
        performer: &Skeleton,
        puppet: &Skeleton,
        binding: &Binding,
        range: FrameRange,
        host: &mut dyn PoseSource,
        library: &'lib mut ActionLibrary,
    ) -> Result<&'lib Action> {
        binding.ensure_matches(performer, puppet)?;

        let driven: Vec<usize> = binding.driven_bones().map(|id| id.index()).collect();
        let mut slots: Vec<KeyedSlot> = driven
            .iter()
            .map(|&i| KeyedSlot::new(Some(&puppet.bones()[i].name), &self.cfg))
            .collect();
        let mut root_slot = binding.root().map(|_| KeyedSlot::new(None, &self.cfg));

        let mut action = Action::new(baked_action_name(source_name));
        for frame in range.frames() {
            host.set_frame(frame);
            let reported = host.current_frame();
            if (reported - frame as f32).abs() >= 0.5 {
                warn!("host reports frame {reported} after seeking to {frame}; keying at {frame}");
            }
            let at = frame as f32;
            let performer_pose = host.current_pose(performer);
            let pose = binding.solve(performer, &performer_pose, puppet)?;

            let world = match self.cfg.space {
                KeySpace::World => Some(puppet.world_transforms(&pose)),
                KeySpace::Local => None,
            };
            for (slot, &i) in slots.iter_mut().zip(&driven) {
                let bone = &puppet.bones()[i];
                let t = match &world {
                    Some(world) => world[i],
                    None => pose.get(&bone.name).copied().unwrap_or(bone.bind),
                };
                slot.key(&mut action, at, t);
            }
            if let Some(slot) = root_slot.as_mut() {
                slot.key(&mut action, at, pose.root);
            }
        }

        action.snap_to_nearest_frame();
        action.set_interpolation(Interpolation::Linear);
        debug!(
            "bake: '{}' over [{}, {}] -> '{}' ({} channels, {} keys)",
            source_name,
            range.start(),
            range.end(),
            action.name(),
            action.channel_count(),
            action.keyframe_count()
        );
        Ok(library.commit(action))
    }
}
