//! Pose snapshot: root transform plus per-bone local transforms.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// One skeleton at one instant. Produced per frame while sampling and not
/// kept beyond that.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Object/root transform in world space.
    pub root: Transform,
    #[serde(default)]
    locals: HashMap<String, Transform>,
}

impl Pose {
    /// Pose holding only a root transform; every bone reads as bind pose.
    pub fn new(root: Transform) -> Self {
        Self {
            root,
            locals: HashMap::new(),
        }
    }

    /// Bind pose of `skeleton`, every bone listed explicitly.
    pub fn rest(skeleton: &Skeleton) -> Self {
        let locals = skeleton
            .bones()
            .iter()
            .map(|b| (b.name.clone(), b.bind))
            .collect();
        Self {
            root: *skeleton.root(),
            locals,
        }
    }

    pub fn get(&self, bone: &str) -> Option<&Transform> {
        self.locals.get(bone)
    }

    pub fn get_mut(&mut self, bone: &str) -> Option<&mut Transform> {
        self.locals.get_mut(bone)
    }

    pub fn set(&mut self, bone: impl Into<String>, local: Transform) {
        self.locals.insert(bone.into(), local);
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Transform)> {
        self.locals.iter().map(|(k, v)| (k.as_str(), v))
    }
}
