//! HTML output: marker popups and the standalone Leaflet map page.

pub mod page;
pub mod popup;

pub use page::{MapPage, MarkerSpec, RenderError};
pub use popup::{PopupStyle, popup_html};
