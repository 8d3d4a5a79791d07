//! Rebuilds the generated `AutoGen` track from the export flags.

use hashbrown::HashSet;
use log::{debug, warn};
use serde::Serialize;

use crate::export::ExportRegistry;
use crate::library::ActionLibrary;
use crate::naming::{resolve_baked_name, GENERATED_TRACK};
use crate::timeline::{Clip, Track, TrackStack};

/// Why an exported name produced no clip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No baked action of that name exists yet.
    NotBaked,
    /// The baked action has no keyframes.
    Empty,
}

/// Outcome of one sync.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Clips on the committed track, in order.
    pub clips: Vec<Clip>,
    /// Exported names (as flagged) that were left out.
    pub skipped: Vec<(String, SkipReason)>,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct TrackSynchronizer;

impl TrackSynchronizer {
    /// Full rebuild: a fresh track is filled from the exported names in
    /// order and then swapped in for every existing `AutoGen` track. The
    /// track is committed even when it ends up empty.
    pub fn sync(
        &self,
        tracks: &mut TrackStack,
        exports: &ExportRegistry,
        library: &ActionLibrary,
    ) -> SyncReport {
        let mut track = Track::new(GENERATED_TRACK);
        let mut skipped = Vec::new();
        let mut placed: HashSet<String> = HashSet::new();

        for exported in exports.exported_names() {
            let baked = resolve_baked_name(exported);
            if placed.contains(&baked) {
                debug!("'{exported}' resolves to '{baked}', already on {GENERATED_TRACK}");
                continue;
            }
            let Some(action) = library.get(&baked) else {
                warn!("'{exported}' is marked for export but '{baked}' has not been baked");
                skipped.push((exported.to_string(), SkipReason::NotBaked));
                continue;
            };
            if track.append_contiguous(action).is_none() {
                warn!("'{baked}' has no keyframes; not placed on {GENERATED_TRACK}");
                skipped.push((exported.to_string(), SkipReason::Empty));
                continue;
            }
            placed.insert(baked);
        }

        let clips = track.clips().to_vec();
        debug!(
            "sync: {} clips on {GENERATED_TRACK}, {} skipped",
            clips.len(),
            skipped.len()
        );
        tracks.replace_all(GENERATED_TRACK, track);
        SyncReport { clips, skipped }
    }
}
