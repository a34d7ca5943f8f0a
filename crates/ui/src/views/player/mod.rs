mod scripts;
mod surface;
mod view;

pub use surface::WebMediaSurface;
pub use view::{PlayerPanel, WebPlayer};
