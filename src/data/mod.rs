pub mod geojson;
pub mod provider;
pub mod records;
