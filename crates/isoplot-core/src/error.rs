//! Error types for the isolation plot engine.
//!
//! [`IsoPlotError`] covers internal-consistency and capacity failures that
//! abort a conversion run. [`EdgeMillError`] covers geometry problems that
//! are reported back to the user, who may retry with other parameters.

use thiserror::Error;

/// Errors that abort an isolation plot run.
///
/// Once one of these has been returned by an [`IsoPlotBuilder`](crate::IsoPlotBuilder)
/// the builder refuses further work with [`IsoPlotError::Abandoned`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsoPlotError {
    /// The primitive ID counter would exceed the configured ceiling.
    #[error("Primitive capacity exhausted: no IDs left above {max}")]
    CapacityExhausted {
        /// The largest ID the registry may hand out.
        max: u32,
    },

    /// A non-composite draw re-claimed a cell its primitive already owns.
    #[error("Primitive {owner} overwrote its own cell at ({x}, {y})")]
    SelfOverwrite {
        /// The primitive that revisited the cell.
        owner: u32,
        /// Cell column.
        x: i32,
        /// Cell row.
        y: i32,
    },

    /// A shared cell points at an overlay record the collection does not hold.
    #[error("Overlay record {handle} referenced at ({x}, {y}) does not exist")]
    MissingOverlayRecord {
        /// The dangling record handle.
        handle: u32,
        /// Cell column.
        x: i32,
        /// Cell row.
        y: i32,
    },

    /// Plot options failed validation.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOptions { name: String, reason: String },

    /// A primitive was drawn after interior filtering had already run.
    #[error("Plot is sealed: no drawing after interior pixel removal")]
    Sealed,

    /// The caller raised the cancellation flag.
    #[error("Isolation plot cancelled")]
    Cancelled,

    /// A previous fatal error left the plot in an untrusted state.
    #[error("Isolation plot abandoned after an earlier failure")]
    Abandoned,

    /// An edge-mill failure surfaced through the full pipeline.
    #[error(transparent)]
    EdgeMill(#[from] EdgeMillError),
}

impl IsoPlotError {
    /// True for errors after which no plot state may be trusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EdgeMill(_) | Self::InvalidOptions { .. } | Self::Sealed
        )
    }
}

/// Reported (non-fatal) failures of edge-mill chain processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeMillError {
    /// No chain holds all four global extremes of the discovered segments.
    #[error("No outside boundary could be identified among {chains} chain(s)")]
    NoOutsideChain {
        /// How many chains were searched.
        chains: usize,
    },

    /// Fewer tabs fit on the outside chain than were requested.
    #[error("Could not place all tabs: requested {requested}, placed {placed}")]
    TabsNotPlaced { requested: u32, placed: u32 },
}

/// Result type alias for isolation plot operations.
pub type IsoPlotResult<T> = Result<T, IsoPlotError>;

/// Result type alias for edge-mill operations.
pub type EdgeMillResult<T> = Result<T, EdgeMillError>;
