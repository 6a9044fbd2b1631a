//! Collaborator notifications, redraw coalescing and display options

use mapnav::core::display::AreaFillMode;
use mapnav::data::hash::HashParams;
use mapnav::headless::{
    HeadlessMap, MemoryEditor, MemoryEntityLoader, MemoryFilters, MemoryUrlHash,
    RecordingContext, RecordingRenderer,
};
use mapnav::runtime::spawners::InlineSpawner;
use mapnav::traits::{HistoryEdit, ModeRequest, Storage};
use mapnav::{CollaboratorEvent, EventSource, MapEvent, MapSystemBuilder};
use std::sync::{Arc, Mutex};

#[test]
fn test_redraws_coalesce_until_drawn() {
    let headless = HeadlessMap::new();
    let renderer = headless.renderer.clone();
    let mut map = headless.map;

    map.dispatch(EventSource::Filters, &CollaboratorEvent::FilterChange);
    map.dispatch(EventSource::Styles, &CollaboratorEvent::StyleChange);
    map.dispatch(EventSource::Editor, &CollaboratorEvent::Merge { entity_ids: None });
    assert_eq!(renderer.immediate_redraws(), 1);
    assert_eq!(renderer.deferred_redraws(), 0);

    map.dispatch(EventSource::Gfx, &CollaboratorEvent::Draw);
    map.dispatch(EventSource::Editor, &CollaboratorEvent::Merge { entity_ids: None });
    assert_eq!(renderer.deferred_redraws(), 1);
}

#[test]
fn test_dataset_and_locale_changes_dirty_layers() {
    let headless = HeadlessMap::new();
    let renderer = headless.renderer.clone();
    let mut map = headless.map;

    map.dispatch(EventSource::Rapid, &CollaboratorEvent::DatasetChange);
    assert_eq!(
        renderer.dirty_layers(),
        vec!["rapid".to_string(), "rapidoverlay".to_string()]
    );

    map.dispatch(EventSource::L10n, &CollaboratorEvent::LocaleChange);
    assert_eq!(renderer.scene_dirty_count(), 1);
}

#[test]
fn test_history_jump_is_routed() {
    let headless = HeadlessMap::new();
    headless.editor.push_edit(HistoryEdit::default());
    headless.editor.push_edit(HistoryEdit {
        transform: None,
        selected_ids: vec!["r4".into()],
        graph: ["r4".to_string()].into_iter().collect(),
    });
    let context = headless.context.clone();
    let mut map = headless.map;

    assert!(map.dispatch(
        EventSource::Editor,
        &CollaboratorEvent::HistoryJump {
            prev_index: 0,
            curr_index: 1,
        },
    ));
    assert_eq!(
        context.last_request(),
        Some(ModeRequest::SelectOsm(vec!["r4".into()]))
    );
}

#[test]
fn test_hash_change_is_routed() {
    let mut map = HeadlessMap::new().map;
    let current: HashParams = [("map".to_string(), "12.5/10/20".to_string())]
        .into_iter()
        .collect();

    map.dispatch(
        EventSource::UrlHash,
        &CollaboratorEvent::HashChange {
            current,
            previous: HashParams::default(),
        },
    );
    assert!((map.zoom() - 12.5).abs() < 1e-9);
}

#[test]
fn test_listeners_receive_notifications() {
    let mut map = HeadlessMap::new().map;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    map.on("mapchange", move |event| sink.lock().unwrap().push(event.clone()));

    assert!(map.toggle_highlight_edits());
    map.dispatch(EventSource::Gfx, &CollaboratorEvent::Move);
    map.process_events();

    assert_eq!(*seen.lock().unwrap(), vec![MapEvent::MapChange]);
}

#[test]
fn test_area_fill_survives_restart() {
    let storage = Arc::new(mapnav::headless::MemoryStorage::new());
    let build = |storage: Arc<mapnav::headless::MemoryStorage>| {
        MapSystemBuilder::new()
            .with_storage(storage)
            .with_renderer(Arc::new(RecordingRenderer::new()))
            .with_editor(Arc::new(MemoryEditor::new()))
            .with_filters(Arc::new(MemoryFilters::new()))
            .with_urlhash(Arc::new(MemoryUrlHash::new()))
            .with_context(Arc::new(RecordingContext::new()))
            .with_entity_loader(Arc::new(MemoryEntityLoader::new()))
            .with_spawner(Arc::new(InlineSpawner))
            .build()
            .unwrap()
    };

    let mut map = build(storage.clone());
    assert_eq!(map.area_fill_mode(), AreaFillMode::Partial);
    map.set_area_fill_mode(AreaFillMode::Full);
    assert!(map.toggle_wireframe());
    assert_eq!(storage.get_item("area-fill").as_deref(), Some("wireframe"));
    assert_eq!(storage.get_item("area-fill-toggle").as_deref(), Some("full"));

    let mut restarted = build(storage.clone());
    assert!(restarted.wireframe_mode());
    assert!(restarted.toggle_wireframe());
    assert_eq!(restarted.area_fill_mode(), AreaFillMode::Full);
}
