pub mod base;
pub mod cluster;
pub mod draw;
pub mod heatmap;
pub mod highlight;
pub mod measure;
pub mod mode;
pub mod overlay;
