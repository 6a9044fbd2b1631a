//! Url hash synchronization end to end

use mapnav::data::hash::{HashParams, MapParam};
use mapnav::headless::HeadlessMap;
use mapnav::traits::{Entity, ModeContext, ModeRequest, Note, Renderer};
use mapnav::{CollaboratorEvent, EventSource, Extent, LatLng};
use std::time::Duration;

fn params(pairs: &[(&str, &str)]) -> HashParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_link_parses_to_view() {
    let param = MapParam::parse(Some("16/40.7/-74"));
    assert_eq!(param.zoom, 16.0);
    assert_eq!(param.center, LatLng::new(40.7, -74.0));
    assert_eq!(param.rotation, 0.0);
}

#[test]
fn test_bearing_is_published_inverted() {
    let headless = HeadlessMap::new();
    let urlhash = headless.urlhash.clone();
    let mut map = headless.map;

    map.set_map_params(
        Some(LatLng::new(40.7, -74.0)),
        Some(16.0),
        Some(45f64.to_radians()),
        Duration::ZERO,
    );
    map.dispatch(EventSource::Gfx, &CollaboratorEvent::Draw);

    let value = urlhash.param("map").unwrap();
    assert!(value.starts_with("16.00/"), "{}", value);
    assert!(value.ends_with("/315.0"), "{}", value);
}

#[test]
fn test_published_view_round_trips() {
    let source = HeadlessMap::new();
    let urlhash = source.urlhash.clone();
    let mut map = source.map;
    map.set_map_params(
        Some(LatLng::new(-22.9519, -43.2105)),
        Some(17.25),
        Some(0.3),
        Duration::ZERO,
    );
    map.update_hash();
    let published = urlhash.params();

    let mut other = HeadlessMap::new().map;
    other.dispatch(
        EventSource::UrlHash,
        &CollaboratorEvent::HashChange {
            current: published,
            previous: HashParams::default(),
        },
    );

    assert!((other.zoom() - map.zoom()).abs() <= 0.01);
    // 17.25 publishes five decimals
    let (a, b) = (other.center_loc(), map.center_loc());
    assert!((a.lat - b.lat).abs() < 1e-4);
    assert!((a.lng - b.lng).abs() < 1e-4);
    let bearing_delta = (other.transform().r - map.transform().r).to_degrees().abs();
    assert!(bearing_delta <= 0.1);
}

#[test]
fn test_note_param_selects_and_enables() {
    let headless = HeadlessMap::new();
    headless.notes.insert(Note {
        id: 42,
        loc: LatLng::new(1.0, 2.0),
    });
    let renderer = headless.renderer.clone();
    let context = headless.context.clone();
    let urlhash = headless.urlhash.clone();
    let mut map = headless.map;

    map.apply_hash_change(&params(&[("note", "true")]), &HashParams::default());
    assert!(renderer.layer_enabled("notes"));
    assert!(context.requests().is_empty());

    map.apply_hash_change(&params(&[("note", "42")]), &params(&[("note", "true")]));
    assert_eq!(context.selected_note(), Some(42));

    map.update_hash();
    assert_eq!(urlhash.param("note").as_deref(), Some("42"));
}

#[test]
fn test_id_param_selects_first_entity() {
    let headless = HeadlessMap::new();
    headless
        .editor
        .insert(Entity::new("n2", Extent::from_point(LatLng::new(5.0, 5.0))));
    let context = headless.context.clone();
    let mut map = headless.map;

    map.apply_hash_change(&params(&[("id", "n2,w3")]), &HashParams::default());
    assert_eq!(
        context.last_request(),
        Some(ModeRequest::SelectOsm(vec!["n2".into()]))
    );
}
