use anyhow::Context;
use mapnav::{
    core::geo::{Extent, LatLng, Point},
    data::hash::HashParams,
    headless::HeadlessMap,
    traits::Entity,
    CollaboratorEvent, EventSource, NavigationProfile,
};
use instant::Instant;
use std::time::Duration;

/// Drives the navigation core without a renderer and prints what it publishes
fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("🗺️ mapnav headless example");
    println!("==========================");

    let config = NavigationProfile::Standard.resolve();
    let headless = HeadlessMap::with_config(config).context("building the map system")?;
    let urlhash = headless.urlhash.clone();
    let context = headless.context.clone();
    let mut map = headless.map;
    map.start();

    // Follow a shared link
    let link: HashParams = [("map".to_string(), "16/40.7/-74/45".to_string())]
        .into_iter()
        .collect();
    map.dispatch(
        EventSource::UrlHash,
        &CollaboratorEvent::HashChange {
            current: link,
            previous: HashParams::default(),
        },
    );
    report(&map, "after following the link");

    let locations = [
        ("London", LatLng::new(51.5074, -0.1278), 10.0),
        ("Tokyo", LatLng::new(35.6762, 139.6503), 12.0),
    ];
    for (name, loc, zoom) in locations {
        map.center_zoom(loc, zoom, Duration::ZERO);
        report(&map, name);
    }

    map.pan(Point::new(100.0, 0.0), Duration::ZERO);
    map.zoom_in();

    // Drive the eased zoom at ~60fps
    let start = Instant::now();
    let mut frames = 0;
    while map.tick(start + Duration::from_millis(16 * frames)) {
        frames += 1;
    }
    println!("🎞️ zoom eased over {} frames", frames + 1);
    report(&map, "after pan and zoom in");

    // Select something that has to be loaded first
    headless.loader.insert(Entity::new(
        "w42",
        Extent::from_coords(48.8580, 2.2930, 48.8590, 2.2955),
    ));
    map.select_entity_id("w42", false);
    let applied = map.process_loads();
    println!("✅ {} load(s) applied, mode request {:?}", applied, context.last_request());

    // A finished frame republishes the hash
    map.dispatch(EventSource::Gfx, &CollaboratorEvent::Draw);
    println!(
        "🔗 map={}",
        urlhash.param("map").unwrap_or_else(|| "-".to_string())
    );

    for event in map.process_events() {
        log::debug!("event {:?}", event);
    }

    Ok(())
}

fn report(map: &mapnav::MapSystem, label: &str) {
    let center = map.center_loc();
    println!(
        "📍 {}: {:.4}, {:.4} at zoom {:.2}, rotation {:.3}",
        label,
        center.lat,
        center.lng,
        map.zoom(),
        map.transform().r
    );
}
