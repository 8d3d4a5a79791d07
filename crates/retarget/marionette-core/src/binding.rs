//! Performer -> puppet bone binding.
//!
//! Bones are matched by name once, at bind time, and the match is cached as
//! bone ids on the [`Binding`]. While active the binding carries evaluation
//! rules: every mapped puppet bone copies its performer bone's world
//! transform, and an optional root rule drives the puppet object itself.

use hashbrown::HashSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetargetError};
use crate::ids::BoneId;
use crate::pose::Pose;
use crate::skeleton::Skeleton;

/// One matched pair: puppet bone driven by performer bone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonePair {
    pub puppet_bone: String,
    pub performer_bone: String,
    pub puppet_id: BoneId,
    pub performer_id: BoneId,
}

/// Puppet root driven by a performer bone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootPair {
    pub performer_bone: String,
    pub performer_id: BoneId,
}

/// Identity of the skeleton pair a binding was built for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingKey {
    pub performer: String,
    pub puppet: String,
}

impl BindingKey {
    fn of(performer: &Skeleton, puppet: &Skeleton) -> Self {
        Self {
            performer: performer.name().to_string(),
            puppet: puppet.name().to_string(),
        }
    }
}

/// Installed evaluation rules, indexed by puppet bone.
#[derive(Debug)]
struct Rules {
    drivers: Vec<Option<BoneId>>,
    root: Option<BoneId>,
}

/// Name-matched mapping between a performer and a puppet.
///
/// Deliberately not `Clone`: the active rules live in exactly one place.
#[derive(Debug)]
pub struct Binding {
    key: BindingKey,
    pairs: Vec<BonePair>,
    root: Option<RootPair>,
    unmatched: Vec<String>,
    unresolved_root: Option<String>,
    rules: Option<Rules>,
}

impl Binding {
    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    pub fn is_active(&self) -> bool {
        self.rules.is_some()
    }

    /// Matched pairs in puppet bone order.
    pub fn pairs(&self) -> &[BonePair] {
        &self.pairs
    }

    pub fn root(&self) -> Option<&RootPair> {
        self.root.as_ref()
    }

    /// Puppet bones with no same-named performer bone.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Requested root target that the performer does not have.
    pub fn unresolved_root(&self) -> Option<&str> {
        self.unresolved_root.as_deref()
    }

    /// Puppet bones that the active rules drive, in puppet order.
    pub fn driven_bones(&self) -> impl Iterator<Item = BoneId> + '_ {
        self.pairs.iter().map(|p| p.puppet_id)
    }

    /// Fails unless the binding is active and was built for these skeletons.
    pub(crate) fn ensure_matches(&self, performer: &Skeleton, puppet: &Skeleton) -> Result<()> {
        self.check_skeletons(performer, puppet).map(|_| ())
    }

    fn check_skeletons(&self, performer: &Skeleton, puppet: &Skeleton) -> Result<&Rules> {
        let rules = self
            .rules
            .as_ref()
            .ok_or_else(|| RetargetError::UnboundPuppet {
                puppet: puppet.name().to_string(),
            })?;
        let found = BindingKey::of(performer, puppet);
        let names = |skeleton: &Skeleton, id: BoneId, name: &str| {
            skeleton.bone(id).is_some_and(|b| b.name == name)
        };
        let same_bones = self.pairs.iter().all(|p| {
            names(performer, p.performer_id, p.performer_bone.as_str())
                && names(puppet, p.puppet_id, p.puppet_bone.as_str())
        }) && self
            .root
            .as_ref()
            .map_or(true, |r| names(performer, r.performer_id, r.performer_bone.as_str()));
        if found != self.key || rules.drivers.len() != puppet.len() || !same_bones {
            return Err(RetargetError::BindingMismatch {
                expected: format!("'{}' -> '{}'", self.key.performer, self.key.puppet),
                found: format!("'{}' -> '{}'", found.performer, found.puppet),
            });
        }
        Ok(rules)
    }

    /// Puppet pose produced by the installed rules for one performer pose.
    ///
    /// Driven bones take the performer bone's world transform, converted back
    /// into the puppet parent's space; the rest keep their bind transform.
    pub fn solve(&self, performer: &Skeleton, performer_pose: &Pose, puppet: &Skeleton) -> Result<Pose> {
        let rules = self.check_skeletons(performer, puppet)?;
        let performer_world = performer.world_transforms(performer_pose);

        let root = match rules.root {
            Some(id) => performer_world[id.index()],
            None => *puppet.root(),
        };
        let mut pose = Pose::new(root);
        let mut puppet_world = Vec::with_capacity(puppet.len());
        for (bone, driver) in puppet.bones().iter().zip(&rules.drivers) {
            let parent_world = match bone.parent {
                Some(p) => puppet_world[p.index()],
                None => root,
            };
            let (local, world) = match driver {
                Some(src) => {
                    let world = performer_world[src.index()];
                    (world.relative_to(&parent_world), world)
                }
                None => (bone.bind, parent_world.compose(&bone.bind)),
            };
            pose.set(bone.name.clone(), local);
            puppet_world.push(world);
        }
        Ok(pose)
    }
}

/// Builds and tears down bindings; tracks which skeleton pairs are bound.
///
/// Re-entrancy policy: binding a pair that is already bound is rejected with
/// [`RetargetError::BindingAlreadyActive`]; unbind first.
#[derive(Debug, Default)]
pub struct BindingController {
    active: HashSet<BindingKey>,
}

impl BindingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, performer: &Skeleton, puppet: &Skeleton) -> bool {
        self.active.contains(&BindingKey::of(performer, puppet))
    }

    /// Match puppet bones to performer bones by name and activate the result.
    pub fn bind(
        &mut self,
        performer: &Skeleton,
        puppet: &Skeleton,
        root_target: Option<&str>,
    ) -> Result<Binding> {
        for skeleton in [performer, puppet] {
            if skeleton.is_empty() {
                return Err(RetargetError::InvalidSkeleton {
                    name: skeleton.name().to_string(),
                    reason: "skeleton has no bones".into(),
                });
            }
        }
        let key = BindingKey::of(performer, puppet);
        if self.active.contains(&key) {
            return Err(RetargetError::BindingAlreadyActive {
                performer: key.performer,
                puppet: key.puppet,
            });
        }

        let mut pairs = Vec::new();
        let mut unmatched = Vec::new();
        let mut drivers = Vec::with_capacity(puppet.len());
        for (puppet_id, bone) in puppet.iter() {
            match performer.find(&bone.name) {
                Some(performer_id) => {
                    pairs.push(BonePair {
                        puppet_bone: bone.name.clone(),
                        performer_bone: bone.name.clone(),
                        puppet_id,
                        performer_id,
                    });
                    drivers.push(Some(performer_id));
                }
                None => {
                    warn!(
                        "bone '{}' of puppet '{}' has no match in performer '{}'",
                        bone.name,
                        puppet.name(),
                        performer.name()
                    );
                    unmatched.push(bone.name.clone());
                    drivers.push(None);
                }
            }
        }

        let mut root = None;
        let mut unresolved_root = None;
        if let Some(target) = root_target.filter(|t| !t.is_empty()) {
            match performer.find(target) {
                Some(performer_id) => {
                    root = Some(RootPair {
                        performer_bone: target.to_string(),
                        performer_id,
                    })
                }
                None => {
                    warn!(
                        "root target '{}' not found in performer '{}'; root stays unbound",
                        target,
                        performer.name()
                    );
                    unresolved_root = Some(target.to_string());
                }
            }
        }

        debug!(
            "bind: '{}' -> '{}' mapped {} bones ({} unmatched, root {:?})",
            key.performer,
            key.puppet,
            pairs.len(),
            unmatched.len(),
            root.as_ref().map(|r| r.performer_bone.as_str())
        );

        self.active.insert(key.clone());
        Ok(Binding {
            key,
            rules: Some(Rules {
                drivers,
                root: root.as_ref().map(|r| r.performer_id),
            }),
            pairs,
            root,
            unmatched,
            unresolved_root,
        })
    }

    /// Remove the binding's rules and free its skeleton pair. Calling this on
    /// an inactive binding does nothing.
    pub fn unbind(&mut self, binding: &mut Binding) {
        if binding.rules.take().is_none() {
            return;
        }
        self.active.remove(&binding.key);
        debug!(
            "unbind: '{}' -> '{}'",
            binding.key.performer, binding.key.puppet
        );
    }
}
