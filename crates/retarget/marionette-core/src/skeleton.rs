//! Skeleton model: ordered bones with a cached name index.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetargetError};
use crate::ids::BoneId;
use crate::pose::Pose;
use crate::transform::Transform;

/// One bone. Immutable once its skeleton is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    /// Bind-pose transform relative to the parent (or the skeleton root).
    pub bind: Transform,
}

/// Ordered bone collection plus the object/root transform.
///
/// Invariants enforced at construction:
/// - bone names are unique and non-empty
/// - every parent precedes its children, so a single forward pass visits
///   parents first
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    root: Transform,
    index: HashMap<String, BoneId>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>, bones: Vec<Bone>, root: Transform) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| RetargetError::InvalidSkeleton {
            name: name.clone(),
            reason,
        };

        let mut index = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            if bone.name.is_empty() {
                return Err(invalid(format!("bone #{i} has an empty name")));
            }
            if let Some(parent) = bone.parent {
                if parent.index() >= i {
                    return Err(invalid(format!(
                        "bone '{}' references parent #{} which does not precede it",
                        bone.name,
                        parent.index()
                    )));
                }
            }
            if index.insert(bone.name.clone(), BoneId::from_index(i)).is_some() {
                return Err(invalid(format!("duplicate bone name '{}'", bone.name)));
            }
        }

        Ok(Self {
            name,
            bones,
            root,
            index,
        })
    }

    pub fn builder(name: impl Into<String>) -> SkeletonBuilder {
        SkeletonBuilder {
            name: name.into(),
            root: Transform::IDENTITY,
            bones: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rest transform of the skeleton object itself.
    pub fn root(&self) -> &Transform {
        &self.root
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, b)| (BoneId::from_index(i), b))
    }

    /// World transform of every bone for `pose`, indexed by [`BoneId`].
    /// Bones the pose does not mention stay at their bind transform.
    pub fn world_transforms(&self, pose: &Pose) -> Vec<Transform> {
        let mut world: Vec<Transform> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let local = pose.get(&bone.name).copied().unwrap_or(bone.bind);
            let parent_world = match bone.parent {
                Some(p) => world[p.index()],
                None => pose.root,
            };
            world.push(parent_world.compose(&local));
        }
        world
    }
}

/// Name-based construction helper; parents are referenced by name and must
/// already have been added.
#[derive(Debug)]
pub struct SkeletonBuilder {
    name: String,
    root: Transform,
    bones: Vec<(String, Option<String>, Transform)>,
}

impl SkeletonBuilder {
    pub fn root(mut self, root: Transform) -> Self {
        self.root = root;
        self
    }

    pub fn bone(mut self, name: &str, parent: Option<&str>, bind: Transform) -> Self {
        self.bones
            .push((name.to_string(), parent.map(str::to_string), bind));
        self
    }

    pub fn build(self) -> Result<Skeleton> {
        let mut seen: HashMap<String, BoneId> = HashMap::with_capacity(self.bones.len());
        let mut bones = Vec::with_capacity(self.bones.len());
        for (i, (name, parent, bind)) in self.bones.into_iter().enumerate() {
            let parent = match parent {
                Some(p) => Some(seen.get(&p).copied().ok_or_else(|| {
                    RetargetError::InvalidSkeleton {
                        name: self.name.clone(),
                        reason: format!("bone '{name}' references unknown parent '{p}'"),
                    }
                })?),
                None => None,
            };
            seen.insert(name.clone(), BoneId::from_index(i));
            bones.push(Bone { name, parent, bind });
        }
        Skeleton::new(self.name, bones, self.root)
    }
}
