use marionette_core::{
    parse_stored_action_json, parse_stored_skeleton_json, Channel, Interpolation, Property,
    Transform,
};

#[test]
fn parses_fixture_skeletons() {
    let json = marionette_test_fixtures::skeletons::json("puppet").expect("load puppet fixture");
    let puppet = parse_stored_skeleton_json(&json).expect("parse puppet");
    assert_eq!(puppet.name(), "Puppet");
    assert_eq!(puppet.len(), 3);
    let tail = puppet.find("tail").expect("tail bone");
    let hip = puppet.find("hip").expect("hip bone");
    assert_eq!(puppet.bone(tail).unwrap().parent, Some(hip));
    assert_eq!(*puppet.root(), Transform::IDENTITY);

    let json = marionette_test_fixtures::skeletons::json("performer").expect("load performer");
    let performer = parse_stored_skeleton_json(&json).expect("parse performer");
    let names: Vec<_> = performer.bones().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["hip", "spine"]);
}

#[test]
fn parses_fixture_actions_and_key_modes() {
    let json = marionette_test_fixtures::actions::json("walk").expect("load walk fixture");
    let walk = parse_stored_action_json(&json).expect("parse walk");
    assert_eq!(walk.name(), "Walk");
    assert_eq!(walk.channel_count(), 4);
    let range = walk.frame_range().expect("walk has keys");
    assert_eq!((range.start(), range.end()), (1, 10));

    let y = walk
        .keyframes(&Channel::bone("hip", Property::Location, 1))
        .expect("hip y");
    assert_eq!(y.len(), 3);
    assert!(y.iter().all(|k| k.interpolation == Interpolation::Bezier));

    let z = walk
        .keyframes(&Channel::bone("hip", Property::Location, 2))
        .expect("hip z");
    assert!(z.iter().all(|k| k.interpolation == Interpolation::Linear));

    let json = marionette_test_fixtures::actions::json("wave").expect("load wave fixture");
    let wave = parse_stored_action_json(&json).expect("parse wave");
    assert!(wave
        .keyframes(&Channel::object(Property::Location, 0))
        .is_some());

    let json = marionette_test_fixtures::actions::json("idle").expect("load idle fixture");
    let idle = parse_stored_action_json(&json).expect("parse idle");
    assert!(idle.is_empty());
    assert!(idle.frame_range().is_none());
}
