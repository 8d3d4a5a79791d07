//! Timeline tracks and clips referencing baked actions.

use serde::{Deserialize, Serialize};

use crate::data::Action;
use crate::error::{Result, RetargetError};

/// One action placed on a track. Frames are inclusive integers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Name of the referenced action in the library.
    pub action: String,
    pub frame_start: i32,
    pub frame_end: i32,
    pub action_start: i32,
    pub action_end: i32,
}

impl Clip {
    pub fn duration(&self) -> i32 {
        self.frame_end - self.frame_start
    }
}

/// Named clip list. The name is fixed at construction so the generated
/// track cannot be renamed in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    name: String,
    clips: Vec<Clip>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Place a clip; it must start after the previous clip ends.
    pub fn push(&mut self, clip: Clip) -> Result<()> {
        if let Some(last) = self.clips.last() {
            if clip.frame_start <= last.frame_end {
                return Err(RetargetError::ClipOverlap {
                    track: self.name.clone(),
                    start: clip.frame_start,
                    previous_end: last.frame_end,
                });
            }
        }
        self.clips.push(clip);
        Ok(())
    }

    /// Place `action` right after the last clip, or at the action's own
    /// start frame on an empty track. `None` when the action has no keys.
    pub fn append_contiguous(&mut self, action: &Action) -> Option<&Clip> {
        let range = action.frame_range()?;
        let frame_start = self
            .clips
            .last()
            .map_or(range.start(), |last| last.frame_end + 1);
        let span = range.end() - range.start();
        self.clips.push(Clip {
            name: action.name().to_string(),
            action: action.name().to_string(),
            frame_start,
            frame_end: frame_start + span,
            action_start: range.start(),
            action_end: range.end(),
        });
        self.clips.last()
    }
}

/// Ordered track list of one timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackStack {
    tracks: Vec<Track>,
}

impl TrackStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// First track named `name`.
    pub fn find(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop every track named `name` and put `track` where the first of them
    /// was, or at the end when none existed.
    pub fn replace_all(&mut self, name: &str, track: Track) {
        let slot = self.tracks.iter().position(|t| t.name == name);
        self.tracks.retain(|t| t.name != name);
        match slot {
            Some(i) => self.tracks.insert(i, track),
            None => self.tracks.push(track),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Channel, Interpolation, Keyframe, Property};

    fn action(name: &str, start: f32, end: f32) -> Action {
        let mut a = Action::new(name);
        let ch = Channel::object(Property::Location, 0);
        a.insert_keyframe(ch.clone(), Keyframe::new(start, 0.0, Interpolation::Linear));
        a.insert_keyframe(ch, Keyframe::new(end, 1.0, Interpolation::Linear));
        a
    }

    #[test]
    fn appended_clips_are_contiguous() {
        let mut track = Track::new("AutoGen");
        track.append_contiguous(&action("A_Exp", 5.0, 14.0));
        track.append_contiguous(&action("B_Exp", 0.0, 3.0));
        let clips = track.clips();
        assert_eq!((clips[0].frame_start, clips[0].frame_end), (5, 14));
        assert_eq!((clips[1].frame_start, clips[1].frame_end), (15, 18));
        assert_eq!((clips[1].action_start, clips[1].action_end), (0, 3));
        assert!(track.append_contiguous(&Action::new("Empty")).is_none());
    }

    #[test]
    fn overlapping_push_is_rejected() {
        let mut track = Track::new("T");
        track.append_contiguous(&action("A", 1.0, 10.0));
        let mut clip = track.clips()[0].clone();
        clip.frame_start = 10;
        assert!(matches!(
            track.push(clip),
            Err(RetargetError::ClipOverlap { start: 10, previous_end: 10, .. })
        ));
    }

    #[test]
    fn replace_all_keeps_first_position() {
        let mut stack = TrackStack::new();
        for name in ["Base", "AutoGen", "Face", "AutoGen"] {
            stack.push(Track::new(name));
        }
        let mut fresh = Track::new("AutoGen");
        fresh.append_contiguous(&action("A", 0.0, 1.0));
        stack.replace_all("AutoGen", fresh.clone());
        let names: Vec<_> = stack.iter().map(Track::name).collect();
        assert_eq!(names, vec!["Base", "AutoGen", "Face"]);
        assert_eq!(stack.find("AutoGen"), Some(&fresh));

        let mut empty = TrackStack::new();
        empty.replace_all("AutoGen", Track::new("AutoGen"));
        assert_eq!(empty.len(), 1);
    }
}
