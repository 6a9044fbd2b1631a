//! Keeps the url hash and the map in step
//!
//! Inbound changes drive navigation and selection; the outbound side
//! republishes the live view after every completed draw.

use crate::core::constants::{MODE_SAVE, NOTES_LAYER};
use crate::core::map::MapSystem;
use crate::data::hash::{
    parse_ids, HashParams, MapParam, NoteParam, ID_PARAM, MAP_PARAM, NOTE_PARAM,
};
use log::debug;
use std::time::Duration;

impl MapSystem {
    /// Applies a hash change. Receives the complete parameter maps, not a diff.
    pub fn apply_hash_change(&mut self, current: &HashParams, previous: &HashParams) {
        // map; a missing value resets the view to the defaults
        let new_map = current.get(MAP_PARAM).map(String::as_str);
        let old_map = previous.get(MAP_PARAM).map(String::as_str);
        if new_map.map_or(true, str::is_empty) || new_map != old_map {
            let param = MapParam::parse(new_map);
            debug!("hash map={:?} -> {:?}", new_map, param);
            self.set_map_params(
                Some(param.center),
                Some(param.zoom),
                Some(param.rotation),
                Duration::ZERO,
            );
        }

        // id; only the first one is selected
        let new_ids = current.get(ID_PARAM);
        if new_ids != previous.get(ID_PARAM) {
            if let Some(ids) = new_ids {
                let ids = parse_ids(ids);
                let is_saving = self.deps.context.mode_id().as_deref() == Some(MODE_SAVE);
                if !is_saving {
                    if let Some(first) = ids.first() {
                        self.select_entity_id(first, false);
                    }
                }
            }
        }

        // note
        let new_note = current.get(NOTE_PARAM).map_or("", String::as_str);
        let old_note = previous.get(NOTE_PARAM).map_or("", String::as_str);
        if new_note != old_note {
            match NoteParam::parse(new_note) {
                NoteParam::Select(id) => self.select_note_id(Some(id)),
                NoteParam::Enabled => self.deps.renderer.enable_layers(&[NOTES_LAYER]),
                NoteParam::Disabled => self.deps.renderer.disable_layers(&[NOTES_LAYER]),
            }
        }
    }

    /// Publishes `map` and `note` for the live view
    pub fn update_hash(&self) {
        let urlhash = &self.deps.urlhash;

        let map = MapParam::format(self.zoom(), self.center_loc(), self.transform().r);
        urlhash.set_param(MAP_PARAM, Some(&map));

        let note = NoteParam::from_state(
            self.deps.renderer.layer_enabled(NOTES_LAYER),
            self.deps.context.selected_note(),
        );
        urlhash.set_param(NOTE_PARAM, note.to_value().as_deref());
    }
}

#[cfg(test)]
mod tests {
    use crate::core::geo::LatLng;
    use crate::data::hash::HashParams;
    use crate::headless::HeadlessMap;
    use crate::traits::{ModeContext, ModeRequest, Renderer};
    use std::time::Duration;

    fn params(pairs: &[(&str, &str)]) -> HashParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_inbound_map() {
        let mut map = HeadlessMap::new().map;
        map.apply_hash_change(&params(&[("map", "16/40.7/-74")]), &HashParams::default());
        assert_eq!(map.zoom(), 16.0);
        let center = map.center_loc();
        assert!((center.lat - 40.7).abs() < 1e-9);
        assert!((center.lng + 74.0).abs() < 1e-9);
        assert_eq!(map.transform().r, 0.0);
    }

    #[test]
    fn test_inbound_unchanged_map_is_ignored() {
        let mut map = HeadlessMap::new().map;
        let hash = params(&[("map", "16/40.7/-74")]);
        map.apply_hash_change(&hash, &HashParams::default());
        map.set_zoom(10.0, Duration::ZERO);
        map.apply_hash_change(&hash, &hash);
        assert_eq!(map.zoom(), 10.0);
    }

    #[test]
    fn test_missing_map_resets_view() {
        let mut map = HeadlessMap::new().map;
        map.center_zoom(LatLng::new(10.0, 10.0), 12.0, Duration::ZERO);
        map.apply_hash_change(&HashParams::default(), &HashParams::default());
        assert_eq!(map.zoom(), 2.0);
    }

    #[test]
    fn test_inbound_id_ignored_while_saving() {
        let headless = HeadlessMap::new();
        headless.context.set_mode("save", vec![]);
        let context = headless.context.clone();
        let mut map = headless.map;

        map.apply_hash_change(&params(&[("id", "w1")]), &HashParams::default());
        assert!(context.requests().is_empty());
    }

    #[test]
    fn test_inbound_note_layer_toggle() {
        let headless = HeadlessMap::new();
        let renderer = headless.renderer.clone();
        let mut map = headless.map;

        let enabled = params(&[("note", "true")]);
        map.apply_hash_change(&enabled, &HashParams::default());
        assert!(renderer.layer_enabled("notes"));

        map.apply_hash_change(&HashParams::default(), &enabled);
        assert!(!renderer.layer_enabled("notes"));
    }

    #[test]
    fn test_outbound_note_values() {
        let headless = HeadlessMap::new();
        let renderer = headless.renderer.clone();
        let urlhash = headless.urlhash.clone();
        let context = headless.context.clone();
        let map = headless.map;

        map.update_hash();
        assert_eq!(urlhash.param("note"), None);
        assert_eq!(urlhash.param("map").as_deref(), Some("2.00/0.0/0.0"));

        renderer.enable_layers(&["notes"]);
        map.update_hash();
        assert_eq!(urlhash.param("note").as_deref(), Some("true"));

        context.enter(ModeRequest::SelectNote(crate::traits::Note {
            id: 7,
            loc: LatLng::default(),
        }));
        map.update_hash();
        assert_eq!(urlhash.param("note").as_deref(), Some("7"));
    }
}
