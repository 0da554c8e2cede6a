#![doc = "Presencia public API"]
mod common;
mod list;
mod render;
mod resolve;
mod scale;
mod select;
mod source;
mod types;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use types::{RegionSample, ResolvedRegion, ShapeId};

#[doc(inline)]
pub use resolve::{normalize, RegionTable, Resolution, Resolver, CAPITAL_SHAPE_ID};

#[doc(inline)]
pub use scale::{intensity, intensity_map, IntensityMap};

#[doc(inline)]
pub use render::{intensity_color, MapAsset, MapRenderer, Outline, Rgb, Shape};

#[doc(inline)]
pub use select::{
    Placement, PointerEvent, ScreenTransform, SelectionCoordinator, SelectionState, Tooltip,
};

#[doc(inline)]
pub use list::{ranked_list, RankedEntry};

#[doc(inline)]
pub use source::{
    load_samples, CancelToken, HttpSampleSource, SampleSource, StaticSampleSource,
    DEFAULT_ENDPOINT,
};
