//! Copies of a node never share storage with the original

use bytes::Bytes;
use mediameta::{ContextHandle, MetaData};
use pretty_assertions::{assert_eq, assert_ne};
use std::collections::BTreeMap;

fn populated() -> MetaData {
    let mut program = MetaData::parse("udp://239.1.1.1:5000?Service=News&Provider=Acme").unwrap();
    program.set_extra_data(Bytes::from_static(&[0x01, 0x64, 0x00, 0x1f]));
    program.set_side_info(vec![9u8, 8, 7]);
    program.set_server_ips(BTreeMap::from([(
        "edge.example.com".to_string(),
        "10.0.0.7".to_string(),
    )]));
    program
        .fields_mut()
        .set_context(Some(ContextHandle::from_raw(42)));

    let mut video = MetaData::parse("pid:256?VideoWidth=1280&Codec=h264").unwrap();
    video.set_extra_data(vec![0x67u8, 0x42]);
    video
        .append_child(MetaData::parse("sei?Kind=captions").unwrap())
        .unwrap();
    program.append_child(video).unwrap();
    program
        .append_child(MetaData::parse("pid:257?AudioSampleRate=48000").unwrap())
        .unwrap();
    program
}

#[test]
fn duplicate_is_equal_but_distinct() {
    let original = populated();
    let copy = original.duplicate();

    assert_eq!(copy, original);
    assert_ne!(copy.id(), original.id());
    assert_ne!(
        copy.child(0).unwrap().id(),
        original.child(0).unwrap().id()
    );
    assert_ne!(
        copy.extra_data().as_ptr(),
        original.extra_data().as_ptr()
    );
}

#[test]
fn context_is_copied_by_value() {
    let original = populated();
    let copy = original.duplicate();
    assert_eq!(copy.fields().context(), original.fields().context());
}

#[test]
fn mutating_copy_leaves_original() {
    let original = populated();
    let snapshot = original.clone();
    let mut copy = original.duplicate();

    copy.set_locator("udp://239.9.9.9:5000");
    copy.set_property("Service", "Sports").unwrap();
    copy.set_extra_data(Bytes::new());
    copy.set_side_info(Vec::new());
    copy.set_server_ips(BTreeMap::new());
    copy.fields_mut().set_context(None);

    let video = copy.child_mut(0).unwrap();
    video.fields_mut().set_video_width(3840);
    video.remove_property("Codec").unwrap();
    video
        .child_mut(0)
        .unwrap()
        .set_property("Kind", "teletext")
        .unwrap();
    copy.append_child(MetaData::new("pid:258")).unwrap();

    assert_eq!(original, snapshot);
    assert_eq!(original.property("Service"), Ok("News"));
    assert_eq!(original.child(0).unwrap().fields().video_width(), 1280);
    assert_eq!(
        original.child(0).unwrap().child(0).unwrap().property("Kind"),
        Ok("captions")
    );
    assert_eq!(original.children_count(), 2);
    assert_eq!(copy.children_count(), 3);
}

#[test]
fn mutating_original_leaves_copy() {
    let mut original = populated();
    let copy = original.clone();
    let snapshot = copy.duplicate();

    original.properties_mut().clear();
    original.child_mut(1).unwrap().fields_mut().set_audio_sample_rate(44100);

    assert_eq!(copy, snapshot);
    assert_eq!(copy.child(1).unwrap().fields().audio_sample_rate(), 48000);
}

#[test]
fn only_the_mutated_field_differs() {
    let original = populated();
    let mut copy = original.duplicate();
    copy.fields_mut().set_video_bitrate(1_000_000);

    assert_ne!(copy, original);
    copy.fields_mut().set_video_bitrate(0);
    assert_eq!(copy, original);
}
