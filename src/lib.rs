mod debug;
mod error;
mod float_map;
mod pager;
mod surface;
mod types;
mod units;

pub use debug::DebugLogger;
pub use error::PageplanError;
pub use float_map::{Bounds, FloatMarginMap, Side};
pub use pager::{
    Background, BackgroundImage, MarginSnapshot, MarginSpec, NewPageOptions, PageHook, Pager,
};
pub use surface::{RecordingSurface, Surface, SurfaceCommand};
pub use types::{Color, Mm, Orientation, PageFormat, Size};
pub use units::to_mm;
