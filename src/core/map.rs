use crate::{
    animation::transitions::TransformTransition,
    core::{
        config::MapSystemConfig,
        constants::{AREA_FILL_KEY, AREA_FILL_TOGGLE_KEY, MAX_Z, MIN_Z},
        display::{AreaFillMode, DisplayOptions},
        fit,
        geo::{meters_to_lon, nan_to_zero, round_to, Extent, LatLng, Point},
        viewport::{zoom_to_scale, Transform, Viewport},
    },
    input::events::{EventManager, MapEvent},
    rendering::scheduler::RedrawScheduler,
    runtime::AsyncSpawner,
    traits::{
        Editor, Entity, EntityLoader, FeatureFilters, ModeContext, NoteService, Renderer,
        Storage, UrlHash,
    },
};
use crate::core::constants::ZOOM_PRECISION;
use crate::core::locate::LoadCompletion;
use crossbeam_channel::{unbounded, Receiver, Sender};
use instant::Instant;
use log::{debug, trace};
use std::sync::Arc;
use std::time::Duration;

/// Everything the controller talks to, resolved once at build time
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn Storage>,
    pub renderer: Arc<dyn Renderer>,
    pub editor: Arc<dyn Editor>,
    pub filters: Arc<dyn FeatureFilters>,
    pub urlhash: Arc<dyn UrlHash>,
    pub context: Arc<dyn ModeContext>,
    pub entity_loader: Arc<dyn EntityLoader>,
    /// Optional; without it annotation requests fall back to browse
    pub notes: Option<Arc<dyn NoteService>>,
    pub spawner: Arc<dyn AsyncSpawner>,
}

/// The navigation controller.
///
/// Owns the authoritative viewport. Every navigation helper funnels into
/// [`MapSystem::set_map_params`] or [`MapSystem::set_transform`], which
/// enforce the zoom range, the rotation domain and the redraw discipline.
pub struct MapSystem {
    pub(crate) deps: Collaborators,
    pub(crate) config: MapSystemConfig,
    pub(crate) viewport: Viewport,
    transition: Option<TransformTransition>,
    display: DisplayOptions,
    pub(crate) redraw: RedrawScheduler,
    pub(crate) events: EventManager,
    pub(crate) loads_tx: Sender<LoadCompletion>,
    pub(crate) loads_rx: Receiver<LoadCompletion>,
    /// Set when the controller emitted `move` that the renderer will echo
    pub(crate) move_emitted: bool,
    started: bool,
}

impl MapSystem {
    /// Use [`crate::core::builder::MapSystemBuilder`] to validate collaborators first
    pub(crate) fn new(deps: Collaborators, config: MapSystemConfig) -> Self {
        let dimensions = deps
            .renderer
            .dimensions()
            .unwrap_or(config.initial_dimensions);
        let display = DisplayOptions::load(deps.storage.as_ref());
        let redraw = RedrawScheduler::new(deps.renderer.clone());
        let (loads_tx, loads_rx) = unbounded();

        debug!(
            "map system created: {}x{}, fill {}",
            dimensions.x, dimensions.y, display.area_fill
        );

        Self {
            deps,
            config,
            viewport: Viewport::centered(dimensions),
            transition: None,
            display,
            redraw,
            events: EventManager::new(),
            loads_tx,
            loads_rx,
            move_emitted: false,
            started: false,
        }
    }

    pub fn config(&self) -> &MapSystemConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // Lifecycle

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Called after an edit session completes. Nothing to reset yet.
    pub fn reset(&mut self) {}

    // Events

    /// Listen for `move`, `draw` or `mapchange`
    pub fn on<F>(&mut self, event_type: &'static str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    /// Delivers queued notifications to listeners and returns them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }

    // Redraw façade

    pub fn immediate_redraw(&mut self) {
        self.redraw.immediate();
    }

    pub fn deferred_redraw(&mut self) {
        self.redraw.deferred();
    }

    // Transform

    pub fn transform(&self) -> Transform {
        self.viewport.transform
    }

    /// Commits a transform. Rotation is rounded and wrapped first and the
    /// scale is clamped to the zoom range; a non-finite translation or scale
    /// is dropped.
    ///
    /// A zero duration applies at once; otherwise the view eases toward the
    /// target as [`MapSystem::tick`] is called, and any transition already
    /// running is replaced.
    pub fn set_transform(&mut self, transform: Transform, duration: Duration) {
        if !(transform.x.is_finite() && transform.y.is_finite() && transform.k.is_finite()) {
            trace!("set_transform: dropping non-finite {:?}", transform);
            return;
        }
        let mut target = transform.normalized();
        target.k = target.k.clamp(zoom_to_scale(MIN_Z), zoom_to_scale(MAX_Z));
        self.deps.renderer.transform_committed(&target, duration);

        if duration.is_zero() {
            self.transition = None;
            self.apply_transform(target);
        } else {
            debug!("easing to {:?} over {:?}", target, duration);
            self.transition = Some(TransformTransition::new(
                self.viewport.transform,
                target,
                duration,
            ));
            self.redraw.immediate();
        }
    }

    pub fn transform_ease(&mut self, transform: Transform) {
        let duration = self.ease_duration();
        self.set_transform(transform, duration);
    }

    /// Advances a running transition. Returns true while it is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let transform = transition.sample(now);
        let finished = transition.is_finished();
        if finished {
            self.transition = None;
        }
        self.apply_transform(transform);
        !finished
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    fn apply_transform(&mut self, transform: Transform) {
        trace!("transform -> {:?}", transform);
        self.viewport.transform = transform;
        self.events.emit(MapEvent::Move);
        self.move_emitted = true;
        self.redraw.immediate();
    }

    /// Sets location, zoom and rotation together. `None` keeps the current
    /// value. Returns false when nothing had to change.
    pub fn set_map_params(
        &mut self,
        loc: Option<LatLng>,
        zoom: Option<f64>,
        rotation: Option<f64>,
        duration: Duration,
    ) -> bool {
        let center = self.viewport.center();
        let loc1 = self.viewport.center_loc();
        let t1 = self.viewport.transform;
        let z1 = t1.zoom();
        let r1 = t1.r;

        let loc2 = loc.unwrap_or(loc1).clamped();
        let z2 = round_to(nan_to_zero(zoom.unwrap_or(z1)), ZOOM_PRECISION).clamp(MIN_Z, MAX_Z);
        let r2 = Transform::normalize_rotation(rotation.unwrap_or(r1));

        if loc2 == loc1 && z2 == z1 && r2 == r1 {
            trace!("set_map_params: nothing to do");
            return false;
        }

        // keep `loc2` under the pivot once the new scale is applied
        let k2 = zoom_to_scale(z2);
        let mut view2 = Viewport::new(t1, self.viewport.dimensions);
        view2.set_scale(k2);
        let point = view2.project_unrotated(&loc2);
        let xy = view2.transform.translation().add(&center.subtract(&point));

        let t2 = Transform::new(xy.x, xy.y, k2, r2);
        if t2.approx_eq(&t1) {
            trace!("set_map_params: resolved to the current transform");
            return false;
        }

        self.set_transform(t2, duration);
        true
    }

    pub fn ease_duration(&self) -> Duration {
        self.config.transitions.ease_duration()
    }

    // Center and zoom

    pub fn center_loc(&self) -> LatLng {
        self.viewport.center_loc()
    }

    /// Pixel at the middle of the map
    pub fn center_point(&self) -> Point {
        self.viewport.center()
    }

    pub fn set_center(&mut self, loc: LatLng, duration: Duration) -> bool {
        self.set_map_params(Some(loc), None, None, duration)
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f64, duration: Duration) -> bool {
        self.set_map_params(None, Some(zoom), None, duration)
    }

    pub fn center_zoom(&mut self, loc: LatLng, zoom: f64, duration: Duration) -> bool {
        self.set_map_params(Some(loc), Some(zoom), None, duration)
    }

    pub fn center_zoom_ease(&mut self, loc: LatLng, zoom: f64) -> bool {
        let duration = self.ease_duration();
        self.center_zoom(loc, zoom, duration)
    }

    pub fn center_ease(&mut self, loc: LatLng) -> bool {
        let duration = self.ease_duration();
        self.set_center(loc, duration)
    }

    pub fn zoom_ease(&mut self, zoom: f64) -> bool {
        let duration = self.ease_duration();
        self.set_zoom(zoom, duration)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_step(1.0)
    }

    pub fn zoom_in_further(&mut self) -> bool {
        self.zoom_step(4.0)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_step(-1.0)
    }

    pub fn zoom_out_further(&mut self) -> bool {
        self.zoom_step(-4.0)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom() < MAX_Z
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom() > MIN_Z
    }

    fn zoom_step(&mut self, delta: f64) -> bool {
        let zoom = self.zoom().trunc() + delta;
        self.zoom_ease(zoom)
    }

    /// Zoom as it would be at the equator for the same ground resolution.
    ///
    /// At 69°N a true zoom of 14.6 behaves like zoom 16.
    pub fn effective_zoom(&self) -> f64 {
        let lat = self.center_loc().lat;
        let at_latitude = meters_to_lon(1.0, lat);
        let at_equator = meters_to_lon(1.0, 0.0);
        let extra_zoom = (at_latitude / at_equator).log2();
        (self.zoom() + extra_zoom).min(MAX_Z)
    }

    /// Moves the map by a pixel delta given in screen orientation
    pub fn pan(&mut self, delta: Point, duration: Duration) {
        let t = self.viewport.transform;
        let d = delta.rotate(-t.r, &Point::default());
        self.set_transform(Transform::new(t.x + d.x, t.y + d.y, t.k, t.r), duration);
    }

    // Pointer

    /// Pointer position, or the map center when unknown
    pub fn mouse(&self) -> Point {
        self.deps
            .renderer
            .pointer()
            .unwrap_or_else(|| self.center_point())
    }

    pub fn mouse_loc(&self) -> LatLng {
        self.viewport.unproject(&self.mouse())
    }

    pub fn resize(&mut self, dimensions: Point) {
        if dimensions == self.viewport.dimensions {
            return;
        }
        self.viewport.set_dimensions(dimensions);
        self.redraw.immediate();
    }

    // Extents

    pub fn visible_extent(&self) -> Extent {
        self.viewport.visible_extent()
    }

    /// Frames `extent` in the full viewport
    pub fn set_extent(&mut self, extent: &Extent) -> bool {
        let zoom = self.extent_zoom(extent, None);
        self.set_map_params(Some(extent.center()), Some(zoom), None, Duration::ZERO)
    }

    /// The visible extent minus the header, footer and padding
    pub fn trimmed_extent(&self) -> Extent {
        let chrome = &self.config.chrome;
        let Point { x: w, y: h } = self.viewport.dimensions;
        let bottom_left = self
            .viewport
            .unproject(&Point::new(chrome.pad, h - chrome.footer - chrome.pad));
        let top_right = self
            .viewport
            .unproject(&Point::new(w - chrome.pad, chrome.header + chrome.pad));
        Extent::new(bottom_left, top_right)
    }

    /// Frames `extent` in the area not covered by chrome
    pub fn set_trimmed_extent(&mut self, extent: &Extent) -> bool {
        let zoom = self.trimmed_extent_zoom(extent);
        self.set_map_params(Some(extent.center()), Some(zoom), None, Duration::ZERO)
    }

    /// See [`fit::extent_zoom`]; `dimensions` defaults to the viewport
    pub fn extent_zoom(&self, extent: &Extent, dimensions: Option<Point>) -> f64 {
        let dimensions = dimensions.unwrap_or(self.viewport.dimensions);
        fit::extent_zoom(&self.viewport, extent, dimensions)
    }

    pub fn trimmed_extent_zoom(&self, extent: &Extent) -> f64 {
        fit::trimmed_extent_zoom(&self.viewport, extent, &self.config.chrome)
    }

    /// Centers on the combined extent of `entities` at the zoom that shows it
    pub fn fit_entities(&mut self, entities: &[Entity], duration: Duration) -> bool {
        let extent = entities
            .iter()
            .fold(Extent::empty(), |acc, entity| acc.union(&entity.extent));
        if !extent.area().is_finite() {
            return false;
        }

        let zoom = self
            .trimmed_extent_zoom(&extent)
            .clamp(0.0, self.config.reframe.fit_max_zoom);
        self.set_map_params(Some(extent.center()), Some(zoom), None, duration)
    }

    pub fn fit_entities_ease(&mut self, entities: &[Entity]) -> bool {
        let duration = self.ease_duration();
        self.fit_entities(entities, duration)
    }

    // Display options

    pub fn display_options(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn highlight_edits(&self) -> bool {
        self.display.highlight_edits
    }

    /// Returns true when the value changed
    pub fn set_highlight_edits(&mut self, enabled: bool) -> bool {
        if self.display.highlight_edits == enabled {
            return false;
        }
        self.display.highlight_edits = enabled;
        self.display_changed();
        true
    }

    pub fn toggle_highlight_edits(&mut self) -> bool {
        self.set_highlight_edits(!self.display.highlight_edits)
    }

    pub fn area_fill_mode(&self) -> AreaFillMode {
        self.display.area_fill
    }

    /// Returns true when the mode changed
    pub fn set_area_fill_mode(&mut self, mode: AreaFillMode) -> bool {
        let current = self.display.area_fill;
        if current == mode {
            return false;
        }

        let storage = &self.deps.storage;
        if current != AreaFillMode::Wireframe {
            self.display.toggle_fill = current;
            storage.set_item(AREA_FILL_TOGGLE_KEY, current.as_str());
        }
        self.display.area_fill = mode;
        storage.set_item(AREA_FILL_KEY, mode.as_str());

        self.display_changed();
        true
    }

    pub fn wireframe_mode(&self) -> bool {
        self.display.wireframe()
    }

    /// Leaving wireframe restores the fill mode in use before entering it
    pub fn set_wireframe_mode(&mut self, enabled: bool) -> bool {
        if enabled {
            self.set_area_fill_mode(AreaFillMode::Wireframe)
        } else {
            self.set_area_fill_mode(self.display.toggle_fill)
        }
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.set_wireframe_mode(!self.wireframe_mode())
    }

    fn display_changed(&mut self) {
        self.deps.renderer.mark_scene_dirty();
        self.redraw.immediate();
        self.events.emit(MapEvent::MapChange);
    }
}

impl std::fmt::Debug for MapSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSystem")
            .field("viewport", &self.viewport)
            .field("display", &self.display)
            .field("redraw", &self.redraw)
            .field("transitioning", &self.transition.is_some())
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::constants::{AREA_FILL_KEY, AREA_FILL_TOGGLE_KEY};
    use crate::core::display::AreaFillMode;
    use crate::core::geo::{Extent, LatLng, Point};
    use crate::core::viewport::{zoom_to_scale, Transform};
    use crate::headless::HeadlessMap;
    use crate::input::events::MapEvent;
    use crate::traits::{Entity, Storage};
    use instant::Instant;
    use std::f64::consts::TAU;
    use std::time::Duration;

    #[test]
    fn test_startup_transform() {
        let headless = HeadlessMap::new();
        let map = headless.map;
        assert_eq!(map.zoom(), 2.0);
        assert_eq!(map.transform().r, 0.0);
        let center = map.center_loc();
        assert!(center.lat.abs() < 1e-9 && center.lng.abs() < 1e-9);
    }

    #[test]
    fn test_set_map_params_reads_back() {
        let mut map = HeadlessMap::new().map;
        assert!(map.set_map_params(
            Some(LatLng::new(40.7128, -74.006)),
            Some(16.374),
            Some(-0.5),
            Duration::ZERO
        ));

        let center = map.center_loc();
        assert!((center.lat - 40.7128).abs() < 1e-9);
        assert!((center.lng + 74.006).abs() < 1e-9);
        assert!((map.zoom() - 16.37).abs() < 1e-9);
        let r = map.transform().r;
        assert!((0.0..TAU).contains(&r));
        assert!((r - (TAU - 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_set_map_params_clamps_and_sanitizes() {
        let mut map = HeadlessMap::new().map;
        map.set_map_params(
            Some(LatLng::new(f64::NAN, 500.0)),
            Some(40.0),
            Some(f64::INFINITY),
            Duration::ZERO,
        );
        assert_eq!(map.zoom(), 24.0);
        assert_eq!(map.transform().r, 0.0);
        assert!((map.center_loc().lng - 180.0).abs() < 1e-6);

        map.set_zoom(f64::NAN, Duration::ZERO);
        assert_eq!(map.zoom(), 2.0);
    }

    #[test]
    fn test_set_map_params_is_idempotent() {
        let headless = HeadlessMap::new();
        let renderer = headless.renderer.clone();
        let mut map = headless.map;

        map.set_map_params(Some(LatLng::new(51.5, -0.12)), Some(15.0), Some(1.0), Duration::ZERO);
        map.process_events();
        // a drawn frame clears the pending request so any new one would reach the renderer
        map.redraw.frame_drawn();
        let transform = map.transform();
        let baseline = renderer.immediate_redraws();

        let center = map.center_loc();
        assert!(!map.set_map_params(Some(center), Some(map.zoom()), Some(transform.r), Duration::ZERO));
        assert!(!map.set_map_params(None, None, None, Duration::ZERO));
        assert_eq!(map.transform(), transform);
        assert_eq!(renderer.immediate_redraws(), baseline);
        assert!(map.process_events().is_empty());
    }

    #[test]
    fn test_pan_respects_rotation() {
        let mut map = HeadlessMap::new().map;
        map.set_transform(Transform::new(0.0, 0.0, zoom_to_scale(10.0), std::f64::consts::FRAC_PI_2), Duration::ZERO);
        let before = map.transform();
        map.pan(Point::new(10.0, 0.0), Duration::ZERO);
        let after = map.transform();
        // a rightward screen drag moves the unrotated map upward
        // rotation is stored rounded, so allow for the residue
        assert!((after.x - before.x).abs() < 0.01);
        assert!((after.y - before.y + 10.0).abs() < 0.01);
    }

    #[test]
    fn test_zoom_steps_truncate() {
        let mut map = HeadlessMap::new().map;
        map.set_zoom(16.7, Duration::ZERO);
        map.zoom_in();
        assert!(map.is_transitioning());
        let now = Instant::now();
        map.tick(now);
        map.tick(now + Duration::from_millis(300));
        assert!(!map.is_transitioning());
        assert_eq!(map.zoom(), 17.0);

        map.zoom_out_further();
        map.tick(now + Duration::from_millis(400));
        map.tick(now + Duration::from_millis(700));
        assert_eq!(map.zoom(), 13.0);
    }

    #[test]
    fn test_can_zoom_limits() {
        let mut map = HeadlessMap::new().map;
        assert!(!map.can_zoom_out());
        assert!(map.can_zoom_in());
        map.set_zoom(24.0, Duration::ZERO);
        assert!(!map.can_zoom_in());
    }

    #[test]
    fn test_eased_transition_emits_moves() {
        let mut map = HeadlessMap::new().map;
        map.center_zoom_ease(LatLng::new(10.0, 10.0), 12.0);
        assert_eq!(map.zoom(), 2.0);

        let now = Instant::now();
        assert!(map.tick(now));
        assert!(map.tick(now + Duration::from_millis(100)));
        assert!(!map.tick(now + Duration::from_millis(260)));
        assert_eq!(map.zoom(), 12.0);
        let moves = map
            .process_events()
            .into_iter()
            .filter(|e| *e == MapEvent::Move)
            .count();
        assert_eq!(moves, 3);
    }

    #[test]
    fn test_new_command_supersedes_transition() {
        let mut map = HeadlessMap::new().map;
        map.zoom_ease(10.0);
        map.tick(Instant::now());
        map.set_zoom(5.0, Duration::ZERO);
        assert!(!map.is_transitioning());
        assert_eq!(map.zoom(), 5.0);
    }

    #[test]
    fn test_effective_zoom() {
        let mut map = HeadlessMap::new().map;
        map.center_zoom(LatLng::new(0.0, 0.0), 16.0, Duration::ZERO);
        assert!((map.effective_zoom() - 16.0).abs() < 1e-9);

        map.center_zoom(LatLng::new(60.0, 0.0), 16.0, Duration::ZERO);
        assert!((map.effective_zoom() - 17.0).abs() < 1e-6);

        map.center_zoom(LatLng::new(80.0, 0.0), 24.0, Duration::ZERO);
        assert_eq!(map.effective_zoom(), 24.0);
    }

    #[test]
    fn test_fit_entities_centers_extent() {
        let mut map = HeadlessMap::new().map;
        let entities = vec![
            Entity::new("w1", Extent::from_coords(40.70, -74.02, 40.71, -74.00)),
            Entity::new("w2", Extent::from_coords(40.71, -74.00, 40.72, -73.98)),
        ];
        assert!(map.fit_entities(&entities, Duration::ZERO));
        let center = map.center_loc();
        assert!((center.lat - 40.71).abs() < 1e-6);
        assert!((center.lng + 74.0).abs() < 1e-6);
        assert!(map.zoom() <= 20.0);

        assert!(!map.fit_entities(&[], Duration::ZERO));
    }

    #[test]
    fn test_trimmed_extent_inside_visible() {
        let mut map = HeadlessMap::new().map;
        map.center_zoom(LatLng::new(45.0, 7.0), 14.0, Duration::ZERO);
        let visible = map.visible_extent();
        let trimmed = map.trimmed_extent();
        assert!(visible.contains(&trimmed));
        assert!(trimmed.area() < visible.area());
    }

    #[test]
    fn test_set_trimmed_extent_frames_it() {
        let mut map = HeadlessMap::new().map;
        let extent = Extent::from_coords(48.80, 2.25, 48.90, 2.42);
        assert!(map.set_trimmed_extent(&extent));
        let visible = map.visible_extent();
        assert!(visible.contains(&extent));
        assert!(extent.percent_contained_in(&visible) == 1.0);
    }

    #[test]
    fn test_area_fill_persists_and_notifies() {
        let headless = HeadlessMap::new();
        let storage = headless.storage.clone();
        let renderer = headless.renderer.clone();
        let mut map = headless.map;

        assert!(map.set_area_fill_mode(AreaFillMode::Full));
        assert!(!map.set_area_fill_mode(AreaFillMode::Full));
        assert_eq!(storage.get_item(AREA_FILL_KEY).as_deref(), Some("full"));
        assert_eq!(storage.get_item(AREA_FILL_TOGGLE_KEY).as_deref(), Some("partial"));
        assert_eq!(renderer.scene_dirty_count(), 1);

        let changes = map
            .process_events()
            .into_iter()
            .filter(|e| *e == MapEvent::MapChange)
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_wireframe_restores_previous_mode() {
        let mut map = HeadlessMap::new().map;
        map.set_area_fill_mode(AreaFillMode::Full);

        assert!(map.set_wireframe_mode(true));
        assert!(map.wireframe_mode());
        assert!(!map.set_wireframe_mode(true));

        assert!(map.set_wireframe_mode(false));
        assert_eq!(map.area_fill_mode(), AreaFillMode::Full);

        map.toggle_wireframe();
        map.toggle_wireframe();
        assert_eq!(map.area_fill_mode(), AreaFillMode::Full);
    }

    #[test]
    fn test_highlight_edits_toggle() {
        let mut map = HeadlessMap::new().map;
        assert!(!map.set_highlight_edits(false));
        assert!(map.toggle_highlight_edits());
        assert!(map.highlight_edits());
        assert!(!map.set_highlight_edits(true));
    }

    #[test]
    fn test_non_finite_pan_is_dropped() {
        let mut map = HeadlessMap::new().map;
        let before = map.transform();

        map.pan(Point::new(f64::NAN, 0.0), Duration::ZERO);
        map.pan(Point::new(0.0, f64::INFINITY), Duration::ZERO);
        assert_eq!(map.transform(), before);

        assert!(map.set_map_params(Some(LatLng::new(1.0, 1.0)), Some(5.0), None, Duration::ZERO));
        let center = map.center_loc();
        assert!((center.lat - 1.0).abs() < 1e-9);
        assert!((center.lng - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_transform_clamps_scale() {
        let headless = HeadlessMap::new();
        let urlhash = headless.urlhash.clone();
        let mut map = headless.map;

        map.set_transform(Transform::new(400.0, 300.0, zoom_to_scale(30.0), 0.0), Duration::ZERO);
        assert_eq!(map.zoom(), 24.0);

        map.dispatch(
            crate::input::events::EventSource::Gfx,
            &crate::input::events::CollaboratorEvent::Draw,
        );
        let published = urlhash.param("map").unwrap_or_default();
        assert!(published.starts_with("24.00/"), "{}", published);

        map.set_transform(Transform::new(400.0, 300.0, f64::NAN, 0.0), Duration::ZERO);
        assert_eq!(map.zoom(), 24.0);
    }
}
