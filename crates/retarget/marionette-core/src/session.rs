//! One performer/puppet pair with its stores: the operator-level API a host
//! UI drives (bind toggle, bake, record exported, sync).

use log::{debug, warn};
use serde::Serialize;

use crate::baking::{Baker, FrameRange};
use crate::binding::{Binding, BindingController};
use crate::config::Config;
use crate::data::Action;
use crate::error::{Result, RetargetError};
use crate::export::ExportRegistry;
use crate::host::{ActionDriver, PoseSource};
use crate::library::ActionLibrary;
use crate::naming::{baked_action_name, is_baked_action_name};
use crate::skeleton::Skeleton;
use crate::sync::{SyncReport, TrackSynchronizer};
use crate::timeline::TrackStack;

/// Outcome of [`Session::record_exported`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// Names of the baked actions written, in library order.
    pub baked: Vec<String>,
    /// Source actions left out because they have no keyframes.
    pub skipped: Vec<String>,
}

#[derive(Debug)]
pub struct Session {
    config: Config,
    performer: Skeleton,
    puppet: Skeleton,
    controller: BindingController,
    binding: Option<Binding>,
    baker: Baker,
    library: ActionLibrary,
    exports: ExportRegistry,
    tracks: TrackStack,
}

impl Session {
    pub fn new(config: Config, performer: Skeleton, puppet: Skeleton) -> Self {
        let baker = Baker::new(config.bake.clone());
        Self {
            config,
            performer,
            puppet,
            controller: BindingController::new(),
            binding: None,
            baker,
            library: ActionLibrary::new(),
            exports: ExportRegistry::new(),
            tracks: TrackStack::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn performer(&self) -> &Skeleton {
        &self.performer
    }

    pub fn puppet(&self) -> &Skeleton {
        &self.puppet
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref().filter(|b| b.is_active())
    }

    pub fn library(&self) -> &ActionLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut ActionLibrary {
        &mut self.library
    }

    pub fn exports(&self) -> &ExportRegistry {
        &self.exports
    }

    pub fn tracks(&self) -> &TrackStack {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut TrackStack {
        &mut self.tracks
    }

    pub fn is_bound(&self) -> bool {
        self.controller.is_bound(&self.performer, &self.puppet)
    }

    /// Bind the puppet to the performer. `root_target` only applies when
    /// root retargeting is enabled in the config.
    pub fn bind(&mut self, root_target: Option<&str>) -> Result<&Binding> {
        let root_target = root_target.filter(|_| self.config.use_root_retarget);
        let binding = self
            .controller
            .bind(&self.performer, &self.puppet, root_target)?;
        let binding: &Binding = self.binding.insert(binding);
        Ok(binding)
    }

    /// Returns whether a binding was removed.
    pub fn unbind(&mut self) -> bool {
        match self.binding.take() {
            Some(mut binding) => {
                let was_active = binding.is_active();
                self.controller.unbind(&mut binding);
                was_active
            }
            None => false,
        }
    }

    /// Bind when unbound, unbind otherwise. Returns the new bound state.
    pub fn toggle_bind(&mut self, root_target: Option<&str>) -> Result<bool> {
        if self.is_bound() {
            self.unbind();
            Ok(false)
        } else {
            self.bind(root_target)?;
            Ok(true)
        }
    }

    /// Bake `source` over `range`, driving the performer through `host`.
    pub fn bake(
        &mut self,
        source: &str,
        range: FrameRange,
        host: &mut dyn PoseSource,
    ) -> Result<&Action> {
        let binding = self
            .binding
            .as_ref()
            .ok_or_else(|| RetargetError::UnboundPuppet {
                puppet: self.puppet.name().to_string(),
            })?;
        self.baker.bake(
            source,
            &self.performer,
            &self.puppet,
            binding,
            range,
            host,
            &mut self.library,
        )
    }

    /// Bake every source action flagged for export (under its own name or
    /// its baked name) over the action's own frame range.
    ///
    /// Each bake commits on its own; an error stops the run but keeps the
    /// actions baked before it.
    pub fn record_exported(&mut self) -> Result<RecordReport> {
        let sources: Vec<Action> = self
            .library
            .iter()
            .filter(|a| !is_baked_action_name(a.name()))
            .filter(|a| {
                self.exports.is_marked(a.name())
                    || self.exports.is_marked(&baked_action_name(a.name()))
            })
            .cloned()
            .collect();

        let mut report = RecordReport::default();
        for action in sources {
            let Some(range) = action.frame_range() else {
                warn!("'{}' has no keyframes; nothing to record", action.name());
                report.skipped.push(action.name().to_string());
                continue;
            };
            let name = action.name().to_string();
            let mut driver = ActionDriver::new(action);
            let baked = self.bake(&name, range, &mut driver)?;
            report.baked.push(baked.name().to_string());
        }
        debug!(
            "record_exported: {} baked, {} skipped",
            report.baked.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    pub fn mark_export(&mut self, name: &str) -> bool {
        self.exports.mark(name)
    }

    pub fn unmark_export(&mut self, name: &str) -> bool {
        self.exports.unmark(name)
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.exports.is_marked(name)
    }

    /// Rebuild the `AutoGen` track from the current export flags.
    pub fn sync(&mut self) -> SyncReport {
        TrackSynchronizer.sync(&mut self.tracks, &self.exports, &self.library)
    }
}
