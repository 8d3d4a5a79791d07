use marionette_core::{
    parse_stored_action_json, parse_stored_skeleton_json, ActionDriver, Clip, Config, FrameRange,
    RetargetError, Session, SkipReason, Track, GENERATED_TRACK,
};

fn session() -> Session {
    let load = |name: &str| {
        let json = marionette_test_fixtures::skeletons::json(name).expect("load skeleton");
        parse_stored_skeleton_json(&json).expect("parse skeleton")
    };
    Session::new(Config::default(), load("performer"), load("puppet"))
}

fn bake(session: &mut Session, fixture: &str, start: i32, end: i32) {
    let json = marionette_test_fixtures::actions::json(fixture).expect("load action");
    let action = parse_stored_action_json(&json).expect("parse action");
    let name = action.name().to_string();
    let mut host = ActionDriver::new(action);
    session
        .bake(&name, FrameRange::new(start, end).unwrap(), &mut host)
        .expect("bake");
}

#[test]
fn marked_bake_becomes_single_clip_and_unmark_empties_track() {
    let mut s = session();
    s.bind(None).expect("bind");
    bake(&mut s, "walk", 1, 10);

    assert!(s.mark_export("Walk_Exp"));
    let report = s.sync();
    assert!(report.skipped.is_empty());
    assert_eq!(report.clips.len(), 1);
    let clip = &report.clips[0];
    assert_eq!(clip.action, "Walk_Exp");
    assert_eq!((clip.frame_start, clip.frame_end), (1, 10));

    assert!(s.unmark_export("Walk_Exp"));
    let report = s.sync();
    assert!(report.clips.is_empty());
    let track = s.tracks().find(GENERATED_TRACK).expect("AutoGen committed");
    assert!(track.is_empty());
    assert_eq!(s.tracks().len(), 1);
}

#[test]
fn sync_twice_is_identical_and_other_tracks_survive() {
    let mut s = session();
    s.bind(None).expect("bind");
    bake(&mut s, "walk", 1, 10);
    bake(&mut s, "wave", 0, 12);
    s.tracks_mut().push(Track::new("Base"));
    s.tracks_mut().push(Track::new(GENERATED_TRACK));
    s.tracks_mut().push(Track::new("Face"));
    s.tracks_mut().push(Track::new(GENERATED_TRACK));

    s.mark_export("Wave");
    s.mark_export("Walk_Exp");
    let first = s.sync();
    let snapshot = s.tracks().clone();
    let second = s.sync();
    assert_eq!(first, second);
    assert_eq!(s.tracks(), &snapshot);

    let names: Vec<_> = s.tracks().iter().map(Track::name).collect();
    assert_eq!(names, vec!["Base", GENERATED_TRACK, "Face"]);

    let spans: Vec<_> = first
        .clips
        .iter()
        .map(|c| (c.action.as_str(), c.frame_start, c.frame_end))
        .collect();
    assert_eq!(spans, vec![("Wave_Exp", 0, 12), ("Walk_Exp", 13, 22)]);
}

#[test]
fn host_tracks_reject_overlap_and_survive_sync() {
    let mut s = session();
    s.bind(None).expect("bind");
    bake(&mut s, "walk", 1, 10);
    let clip = Clip {
        name: "intro".into(),
        action: "Walk_Exp".into(),
        frame_start: 1,
        frame_end: 10,
        action_start: 1,
        action_end: 10,
    };
    let mut base = Track::new("Base");
    base.push(clip.clone()).expect("first clip");
    let err = base
        .push(Clip {
            frame_start: 10,
            frame_end: 19,
            ..clip.clone()
        })
        .unwrap_err();
    assert_eq!(
        err,
        RetargetError::ClipOverlap {
            track: "Base".into(),
            start: 10,
            previous_end: 10,
        }
    );
    s.tracks_mut().push(base.clone());

    s.mark_export("Walk");
    s.sync();
    assert_eq!(s.tracks().find("Base"), Some(&base));
    assert_eq!(s.tracks().find("Base").unwrap().clips(), &[clip][..]);
}

#[test]
fn unbaked_export_is_reported_not_fatal() {
    let mut s = session();
    s.mark_export("Run");
    s.mark_export("Run");
    assert_eq!(s.exports().len(), 1);
    let report = s.sync();
    assert_eq!(report.skipped, vec![("Run".to_string(), SkipReason::NotBaked)]);
    assert!(s.tracks().find(GENERATED_TRACK).is_some());
    assert!(!s.unmark_export("Walk"));
}
