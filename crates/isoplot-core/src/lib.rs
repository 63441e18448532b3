//! # Isoplot Core
//!
//! Raster engine that turns PCB artwork primitives into isolation-routing
//! tool paths.
//!
//! ## Passes
//!
//! - **Drawing**: wide lines, circles and engraving lines claim cells on a
//!   shared [`PixelGrid`]; cells claimed by several primitives point at a
//!   deduplicated [`OverlayRecord`]
//! - **Interior filtering**: shared cells provably inside another primitive
//!   are flagged and excluded from boundary discovery
//! - **Segment discovery**: each primitive's perimeter is replayed to recover
//!   the exposed boundary as line and arc segments, each boundary cell
//!   claimed exactly once
//! - **Chain assembly**: segments sharing endpoints are ordered into
//!   continuous chains with their orientation resolved
//! - **Edge milling**: the board outline chain is identified and tabs are
//!   distributed over it
//!
//! [`IsoPlotBuilder`] runs the passes in order; each pass is also usable on
//! its own.

pub mod bitmap;
pub mod builder;
pub mod cancel;
pub mod chain;
pub mod discover;
pub mod edge_mill;
pub mod error;
pub mod grid;
pub mod interior;
pub mod options;
pub mod overlay;
pub mod plot;
pub mod raster;
pub mod registry;
pub mod segment;

// Re-export commonly used items
pub use bitmap::BitmapMode;
pub use builder::{ChainMode, IsoPlotBuilder, IsoPlotOutput, IsoPlotStats};
pub use cancel::Cancellation;
pub use chain::{ChainAssembler, IsoPlotChain};
pub use discover::SegmentDiscoverer;
pub use edge_mill::{board_extent, place_tabs, select_outside_chain};
pub use error::{EdgeMillError, EdgeMillResult, IsoPlotError, IsoPlotResult};
pub use grid::{Bounds, Cell, CellClass, CellState, GridPoint, PixelGrid, Role};
pub use interior::InteriorPixelFilter;
pub use options::{EdgeMillOptions, IsoPlotOptions};
pub use overlay::{OverlayCollection, OverlayHandle, OverlayMember, OverlayRecord};
pub use plot::IsoPlot;
pub use registry::{BuilderObject, BuilderObjectRegistry, PerimeterKind, PrimitiveId};
pub use segment::{IsoPlotSegment, SegmentShape};
