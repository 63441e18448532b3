//! # Isoplot
//!
//! Isolation-routing raster engine for PCB artwork.
//!
//! ## Architecture
//!
//! The workspace is split into:
//!
//! 1. **isoplot-core** - Pixel grid, overlay records, rasterization, interior
//!    filtering, segment discovery, chain assembly and edge-mill tabs
//! 2. **isoplot-settings** - Configuration files (JSON/TOML) and validation
//! 3. **isoplot** - Logging setup and the JSON job runner binary

pub mod job;

pub use isoplot_core::{
    BitmapMode, CellClass, ChainMode, EdgeMillError, EdgeMillOptions, IsoPlotBuilder,
    IsoPlotChain, IsoPlotError, IsoPlotOptions, IsoPlotOutput, IsoPlotSegment, IsoPlotStats,
    PrimitiveId, SegmentShape,
};
pub use isoplot_settings::{Config, LoggingSettings, SettingsError};
pub use job::{run_job, summarize, PlotJob, PrimitiveSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("ISOPLOT_BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to the job summary
/// - RUST_LOG environment variable support, falling back to the configured level
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| anyhow::anyhow!("Invalid log filter: {e}"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(settings.ansi)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logging already initialised: {e}"))?;

    Ok(())
}
