pub mod geo;

pub use geo::GeoHelper;
