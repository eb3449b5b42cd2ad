pub mod bounds;

pub use bounds::LatLonBounds;
