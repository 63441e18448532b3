//! Pipeline entry point: draw primitives, then filter, discover and chain.

use crate::cancel::Cancellation;
use crate::chain::{ChainAssembler, IsoPlotChain};
use crate::discover::SegmentDiscoverer;
use crate::edge_mill::{place_tabs, select_outside_chain};
use crate::error::{IsoPlotError, IsoPlotResult};
use crate::grid::{CellClass, GridPoint};
use crate::interior::InteriorPixelFilter;
use crate::options::{EdgeMillOptions, IsoPlotOptions};
use crate::plot::IsoPlot;
use crate::raster::wide_line_corners;
use crate::registry::{BuilderObject, BuilderObjectRegistry, PrimitiveId};
use crate::segment::IsoPlotSegment;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What the chains are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    /// Isolation routing around copper.
    #[default]
    Isolation,
    /// Board outline milling: select the outside chain and place tabs.
    EdgeMill,
}

/// Counters gathered over one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IsoPlotStats {
    pub primitives: usize,
    pub overlay_records: usize,
    pub live_overlay_records: usize,
    pub disregarded_cells: usize,
    pub segments: usize,
    pub chains: usize,
    pub closed_chains: usize,
    pub tabs: u32,
}

/// Result of [`IsoPlotBuilder::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsoPlotOutput {
    pub chains: Vec<IsoPlotChain>,
    /// Index into `chains` of the board outline (edge-mill mode only).
    pub outside_chain: Option<usize>,
    pub stats: IsoPlotStats,
}

impl IsoPlotOutput {
    pub fn outside(&self) -> Option<&IsoPlotChain> {
        self.outside_chain.and_then(|i| self.chains.get(i))
    }
}

/// Owns the plot, the primitive registry and the run state of one
/// conversion.
///
/// Drawing is only allowed until interior filtering has run. Any fatal error
/// leaves the builder abandoned: every later call fails with
/// [`IsoPlotError::Abandoned`].
pub struct IsoPlotBuilder {
    plot: IsoPlot,
    registry: BuilderObjectRegistry,
    options: IsoPlotOptions,
    cancel: Cancellation,
    interior_removed: bool,
    segments: Option<Vec<IsoPlotSegment>>,
    abandoned: bool,
}

impl IsoPlotBuilder {
    pub fn new(width: usize, height: usize, options: IsoPlotOptions) -> IsoPlotResult<Self> {
        options.validate()?;
        debug!(width, height, "isolation plot allocated");
        Ok(Self {
            plot: IsoPlot::new(width, height),
            registry: BuilderObjectRegistry::new(options.max_primitive_id),
            options,
            cancel: Cancellation::none(),
            interior_removed: false,
            segments: None,
            abandoned: false,
        })
    }

    /// Poll `flag` between primitives and grid rows.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Cancellation::from_flag(flag);
        self
    }

    pub fn plot(&self) -> &IsoPlot {
        &self.plot
    }

    pub fn registry(&self) -> &BuilderObjectRegistry {
        &self.registry
    }

    pub fn options(&self) -> &IsoPlotOptions {
        &self.options
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    pub fn cell_class(&self, x: i32, y: i32) -> Option<CellClass> {
        self.plot.cell_class(x, y)
    }

    /// Replace the tab settings, e.g. to retry after
    /// [`EdgeMillError::TabsNotPlaced`](crate::EdgeMillError::TabsNotPlaced).
    pub fn set_edge_mill_options(&mut self, edge_mill: EdgeMillOptions) -> IsoPlotResult<()> {
        let options = IsoPlotOptions {
            edge_mill,
            ..self.options.clone()
        };
        options.validate()?;
        self.options = options;
        Ok(())
    }

    fn ensure_usable(&self) -> IsoPlotResult<()> {
        if self.abandoned {
            return Err(IsoPlotError::Abandoned);
        }
        Ok(())
    }

    fn ensure_drawable(&self) -> IsoPlotResult<()> {
        self.ensure_usable()?;
        if self.interior_removed {
            return Err(IsoPlotError::Sealed);
        }
        Ok(())
    }

    fn track<T>(&mut self, result: IsoPlotResult<T>) -> IsoPlotResult<T> {
        if let Err(e) = &result {
            if e.is_fatal() {
                error!(error = %e, "isolation plot abandoned");
                self.abandoned = true;
            }
        }
        result
    }

    fn try_draw<F>(&mut self, build: F) -> IsoPlotResult<PrimitiveId>
    where
        F: FnOnce(PrimitiveId) -> BuilderObject,
    {
        self.cancel.check()?;
        let id = self.registry.register(build)?;
        if let Some(object) = self.registry.get(id) {
            let composite = object.is_composite();
            let walks = match self.plot.grid().bounds() {
                Some(clip) => object.perimeter_walks(&clip),
                None => Vec::new(),
            };
            for walk in walks {
                self.plot.draw_walk(id, &walk, composite)?;
            }
            if object.is_filled() {
                let filled = self.plot.background_fill(id, object.bounds())?;
                debug!(owner = %id, filled, "background filled");
            }
        }
        Ok(id)
    }

    fn draw<F>(&mut self, build: F) -> IsoPlotResult<Option<PrimitiveId>>
    where
        F: FnOnce(PrimitiveId) -> BuilderObject,
    {
        let result = self.try_draw(build);
        self.track(result).map(Some)
    }

    /// Rectangle swept by a line of `width`, optionally filled. Returns
    /// `None` for a zero-length line or non-positive width.
    pub fn draw_wide_line_outline(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: i32,
        filled: bool,
    ) -> IsoPlotResult<Option<PrimitiveId>> {
        self.ensure_drawable()?;
        let (from, to) = (GridPoint::new(x0, y0), GridPoint::new(x1, y1));
        let Some(corners) = wide_line_corners(from, to, width) else {
            debug!(%from, %to, width, "degenerate wide line skipped");
            return Ok(None);
        };
        self.draw(|id| BuilderObject::Line {
            id,
            from,
            to,
            width,
            corners,
            filled,
        })
    }

    /// Returns `None` for a non-positive radius.
    pub fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        filled: bool,
    ) -> IsoPlotResult<Option<PrimitiveId>> {
        self.ensure_drawable()?;
        let center = GridPoint::new(cx, cy);
        if radius <= 0 {
            debug!(%center, radius, "degenerate circle skipped");
            return Ok(None);
        }
        self.draw(|id| BuilderObject::Circle {
            id,
            center,
            radius,
            filled,
        })
    }

    /// Single-pixel line. Returns `None` when both ends coincide.
    pub fn draw_engraving_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> IsoPlotResult<Option<PrimitiveId>> {
        self.ensure_drawable()?;
        let (from, to) = (GridPoint::new(x0, y0), GridPoint::new(x1, y1));
        if from == to {
            debug!(%from, "degenerate engraving line skipped");
            return Ok(None);
        }
        self.draw(|id| BuilderObject::EngravingLine { id, from, to })
    }

    /// Round-ended track: a filled wide line capped by a filled circle of
    /// diameter `width` on each end. A zero-length track is a single dot.
    pub fn draw_track(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: i32,
    ) -> IsoPlotResult<Vec<PrimitiveId>> {
        self.ensure_drawable()?;
        let radius = width / 2;
        let mut ids = Vec::new();
        ids.extend(self.draw_wide_line_outline(x0, y0, x1, y1, width, true)?);
        ids.extend(self.draw_circle(x0, y0, radius, true)?);
        if (x0, y0) != (x1, y1) {
            ids.extend(self.draw_circle(x1, y1, radius, true)?);
        }
        Ok(ids)
    }

    /// Filled axis-aligned rectangle of `width` x `height` centred on
    /// `(cx, cy)`. The edge columns sit exactly `width` apart, the left one at
    /// `cx - width / 2`, so odd widths lean one cell to the right. Returns
    /// `None` for a non-positive width or height.
    pub fn draw_rect_pad(
        &mut self,
        cx: i32,
        cy: i32,
        width: i32,
        height: i32,
    ) -> IsoPlotResult<Option<PrimitiveId>> {
        self.ensure_drawable()?;
        if width <= 0 || height <= 0 {
            debug!(cx, cy, width, height, "degenerate pad skipped");
            return Ok(None);
        }
        let left = cx.saturating_sub(width / 2);
        let right = left.saturating_add(width);
        self.draw_wide_line_outline(left, cy, right, cy, height, true)
    }

    /// Flag interior cells. Seals the plot against further drawing.
    pub fn remove_interior_pixels(&mut self) -> IsoPlotResult<usize> {
        self.ensure_usable()?;
        let result = InteriorPixelFilter::run(&mut self.plot, &self.cancel);
        let flagged = self.track(result)?;
        self.interior_removed = true;
        Ok(flagged)
    }

    /// Discovered boundary segments, running interior removal first if
    /// needed. Discovery runs once; later calls return the same segments.
    pub fn discover_segments(&mut self) -> IsoPlotResult<&[IsoPlotSegment]> {
        self.ensure_usable()?;
        if self.segments.is_none() {
            if !self.interior_removed {
                self.remove_interior_pixels()?;
            }
            let result = SegmentDiscoverer::run(&mut self.plot, &self.registry, &self.cancel);
            self.segments = Some(self.track(result)?);
        }
        Ok(self.segments.as_deref().unwrap_or_default())
    }

    /// Run every remaining pass and assemble chains.
    ///
    /// Edge-mill failures come back as [`IsoPlotError::EdgeMill`] and leave
    /// the builder usable, so the caller can adjust the tab settings and
    /// build again.
    pub fn build(&mut self, mode: ChainMode) -> IsoPlotResult<IsoPlotOutput> {
        let segments = self.discover_segments()?.to_vec();
        let check = self.cancel.check();
        self.track(check)?;

        let segment_count = segments.len();
        let mut chains = ChainAssembler::assemble(segments);
        let (outside_chain, tabs) = match mode {
            ChainMode::Isolation => (None, 0),
            ChainMode::EdgeMill => {
                let index = select_outside_chain(&chains)?;
                let tabs = place_tabs(&mut chains[index], &self.options.edge_mill)?;
                (Some(index), tabs)
            }
        };

        let stats = IsoPlotStats {
            primitives: self.registry.len(),
            overlay_records: self.plot.overlays().len(),
            live_overlay_records: self.plot.overlays().live_count(),
            disregarded_cells: self.plot.grid().iter().filter(|(_, c)| c.disregard).count(),
            segments: segment_count,
            chains: chains.len(),
            closed_chains: chains.iter().filter(|c| c.is_closed()).count(),
            tabs,
        };
        info!(
            ?mode,
            primitives = stats.primitives,
            segments = stats.segments,
            chains = stats.chains,
            tabs = stats.tabs,
            "isolation plot built"
        );

        Ok(IsoPlotOutput {
            chains,
            outside_chain,
            stats,
        })
    }
}
