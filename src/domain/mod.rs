pub mod coordinate;
pub mod icon;
pub mod place;

pub use coordinate::Coordinate;
pub use icon::{IconError, MarkerIcon};
pub use place::{MainSection, Place, Price};
