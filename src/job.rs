//! JSON job files for the `isoplot` binary.
//!
//! A job names the raster size, the primitives to draw (already scaled to
//! grid units) and how the boundaries should be chained.

use anyhow::{Context, Result};
use isoplot_core::{
    BitmapMode, ChainMode, EdgeMillOptions, IsoPlotBuilder, IsoPlotOptions, IsoPlotOutput,
    SegmentShape,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveSpec {
    WideLine {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: i32,
        #[serde(default = "filled_by_default")]
        filled: bool,
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        #[serde(default = "filled_by_default")]
        filled: bool,
    },
    EngravingLine {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
    Track {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: i32,
    },
    RectPad {
        cx: i32,
        cy: i32,
        width: i32,
        height: i32,
    },
}

fn filled_by_default() -> bool {
    true
}

/// Contents of a job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotJob {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub mode: ChainMode,
    /// Overrides the configured tab settings.
    #[serde(default)]
    pub edge_mill: Option<EdgeMillOptions>,
    pub primitives: Vec<PrimitiveSpec>,
    /// Where to write a debug rendering of the grid, if anywhere.
    #[serde(default)]
    pub bitmap: Option<PathBuf>,
    #[serde(default)]
    pub bitmap_mode: BitmapMode,
}

impl PlotJob {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid job file {}", path.display()))
    }
}

fn draw(builder: &mut IsoPlotBuilder, spec: &PrimitiveSpec) -> Result<usize> {
    let drawn = match *spec {
        PrimitiveSpec::WideLine {
            x0,
            y0,
            x1,
            y1,
            width,
            filled,
        } => builder
            .draw_wide_line_outline(x0, y0, x1, y1, width, filled)?
            .map_or(0, |_| 1),
        PrimitiveSpec::Circle {
            cx,
            cy,
            radius,
            filled,
        } => builder.draw_circle(cx, cy, radius, filled)?.map_or(0, |_| 1),
        PrimitiveSpec::EngravingLine { x0, y0, x1, y1 } => {
            builder.draw_engraving_line(x0, y0, x1, y1)?.map_or(0, |_| 1)
        }
        PrimitiveSpec::Track {
            x0,
            y0,
            x1,
            y1,
            width,
        } => builder.draw_track(x0, y0, x1, y1, width)?.len(),
        PrimitiveSpec::RectPad {
            cx,
            cy,
            width,
            height,
        } => builder.draw_rect_pad(cx, cy, width, height)?.map_or(0, |_| 1),
    };
    Ok(drawn)
}

/// Draw every primitive of `job` and build its chains.
pub fn run_job(job: &PlotJob, mut options: IsoPlotOptions) -> Result<IsoPlotOutput> {
    if let Some(edge_mill) = job.edge_mill {
        options.edge_mill = edge_mill;
    }
    let mut builder = IsoPlotBuilder::new(job.width, job.height, options)
        .context("Invalid plot options")?;

    for (index, spec) in job.primitives.iter().enumerate() {
        let drawn = draw(&mut builder, spec)
            .with_context(|| format!("Failed to draw primitive {index}"))?;
        if drawn == 0 {
            debug!(index, "primitive skipped as degenerate");
        }
    }

    let result = builder.build(job.mode);

    if let Some(path) = &job.bitmap {
        builder
            .plot()
            .isolation_bitmap(job.bitmap_mode)
            .save(path)
            .with_context(|| format!("Failed to write bitmap {}", path.display()))?;
        info!(path = %path.display(), "debug bitmap written");
    }

    result.context("Isolation plot failed")
}

/// Human-readable listing of the chains.
pub fn summarize(output: &IsoPlotOutput) -> String {
    let stats = &output.stats;
    let mut text = String::new();
    let _ = writeln!(
        text,
        "{} primitives, {} overlay records, {} interior cells, {} segments, {} chains ({} closed)",
        stats.primitives,
        stats.overlay_records,
        stats.disregarded_cells,
        stats.segments,
        stats.chains,
        stats.closed_chains
    );

    for (index, chain) in output.chains.iter().enumerate() {
        let marker = if output.outside_chain == Some(index) {
            " [outside]"
        } else {
            ""
        };
        let _ = writeln!(
            text,
            "chain {index}{marker}: {} segments, length {:.1}, {}",
            chain.len(),
            chain.length(),
            if chain.is_closed() { "closed" } else { "open" }
        );
        for segment in &chain.segments {
            let (head, tail) = (segment.head(), segment.tail());
            match segment.shape {
                SegmentShape::Line { tab_count, .. } if tab_count > 0 => {
                    let _ = writeln!(text, "  line {head} -> {tail} tabs {tab_count}");
                }
                SegmentShape::Line { .. } => {
                    let _ = writeln!(text, "  line {head} -> {tail}");
                }
                SegmentShape::Arc { center, radius, .. } => {
                    let sense = match segment.is_clockwise() {
                        Some(false) => "ccw",
                        _ => "cw",
                    };
                    let _ = writeln!(
                        text,
                        "  arc {head} -> {tail} center {center} r {radius} {sense}"
                    );
                }
            }
        }
    }
    text
}
