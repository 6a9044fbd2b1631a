pub mod builder;
pub mod config;
pub mod constants;
pub mod display;
pub mod fit;
pub mod geo;
pub mod hash_sync;
pub mod locate;
pub mod map;
pub mod viewport;

pub use builder::MapSystemBuilder;
pub use config::{ChromeMargins, MapSystemConfig, NavigationProfile, ReframePolicy};
pub use display::{AreaFillMode, DisplayOptions};
pub use geo::{Extent, LatLng, Point};
pub use map::{Collaborators, MapSystem};
pub use viewport::{Transform, Viewport};
