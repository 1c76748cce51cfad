pub mod events;

pub use events::{
    ClusterClick, DrawEventKind, ExpansionZoom, ImageLoaded, MapEvent, PointClick,
    QuakeProperties,
};
