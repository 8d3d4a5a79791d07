//! Marionette Core (host-agnostic)
//!
//! Skeletal retargeting pipeline: bind a puppet skeleton to a performer by
//! bone name, bake the driven puppet into `<name>_Exp` keyframe actions,
//! flag actions for export and rebuild the generated `AutoGen` timeline
//! track from those flags. Hosts plug in through [`PoseSource`].

pub mod baking;
pub mod binding;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod host;
pub mod ids;
pub mod interp;
pub mod library;
pub mod naming;
pub mod pose;
pub mod sampling;
pub mod session;
pub mod skeleton;
pub mod stored;
pub mod sync;
pub mod timeline;
pub mod transform;

// Re-exports for hosts
pub use baking::{Baker, FrameRange};
pub use binding::{Binding, BindingController, BindingKey, BonePair, RootPair};
pub use config::{BakeConfig, Config, KeySpace};
pub use data::{Action, Channel, ChannelTarget, Interpolation, Keyframe, Property};
pub use error::{Result, RetargetError};
pub use export::{ExportRegistry, ExportedNames};
pub use host::{ActionDriver, PoseSource};
pub use ids::BoneId;
pub use library::ActionLibrary;
pub use naming::{
    baked_action_name, is_baked_action_name, resolve_baked_name, BAKED_SUFFIX, GENERATED_TRACK,
};
pub use pose::Pose;
pub use sampling::sample_keys;
pub use session::{RecordReport, Session};
pub use skeleton::{Bone, Skeleton, SkeletonBuilder};
pub use stored::{parse_stored_action_json, parse_stored_skeleton_json};
pub use sync::{SkipReason, SyncReport, TrackSynchronizer};
pub use timeline::{Clip, Track, TrackStack};
pub use transform::Transform;
