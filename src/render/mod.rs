//! Choropleth rendering: the parsed map asset, color mapping, and the
//! declarative shape-to-style binding.

mod asset;
mod color;
mod renderer;
mod svg;

pub use asset::{MapAsset, Outline, Shape};
pub use color::{intensity_color, Rgb};
pub use renderer::MapRenderer;
