pub mod nominatim;

pub use nominatim::{Geocoder, NominatimGeocoder};
