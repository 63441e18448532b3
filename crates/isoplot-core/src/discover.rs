//! Segment discovery: re-reads the grid along each primitive's perimeter and
//! recovers the boundary pieces still exposed after interior removal.
//!
//! Every visited live cell is flagged `edge_in_use` the first time any
//! primitive walks over it, so a boundary shared by two primitives is
//! emitted once, by whichever primitive was drawn first.

use crate::cancel::Cancellation;
use crate::error::IsoPlotResult;
use crate::grid::{GridPoint, PixelGrid};
use crate::plot::IsoPlot;
use crate::registry::{BuilderObject, BuilderObjectRegistry, PerimeterKind};
use crate::segment::IsoPlotSegment;
use tracing::{debug, trace};

/// Pending run of a single perimeter walk.
#[derive(Debug, Default)]
struct RunTracker {
    start: Option<GridPoint>,
    end: GridPoint,
    have_unused: bool,
    finished: Vec<(GridPoint, GridPoint)>,
}

impl RunTracker {
    fn reset(&mut self) {
        self.start = None;
        self.have_unused = false;
    }

    /// Close the pending run, keeping it only if it covers at least one
    /// newly claimed cell and has some extent.
    fn flush(&mut self) {
        if let Some(start) = self.start {
            if self.have_unused && start != self.end {
                self.finished.push((start, self.end));
            }
        }
        self.reset();
    }

    /// Cell excluded from discovery (interior, or outside the grid).
    fn blocked(&mut self) {
        self.flush();
    }

    /// Cell no segment has claimed yet.
    fn unused(&mut self, p: GridPoint) {
        match self.start {
            None => self.start = Some(p),
            // resume from the last claimed cell so the new piece joins it
            Some(_) if !self.have_unused => self.start = Some(self.end),
            Some(_) => {}
        }
        self.end = p;
        self.have_unused = true;
    }

    /// Cell an earlier segment already claimed.
    fn in_use(&mut self, p: GridPoint) {
        match self.start {
            None => {
                self.start = Some(p);
                self.end = p;
                self.have_unused = false;
            }
            Some(_) if !self.have_unused => self.end = p,
            Some(start) => {
                self.finished.push((start, p));
                self.start = Some(p);
                self.end = p;
                self.have_unused = false;
            }
        }
    }
}

fn walk_perimeter(grid: &mut PixelGrid, walk: &[GridPoint]) -> Vec<(GridPoint, GridPoint)> {
    let mut tracker = RunTracker::default();
    for &p in walk {
        match grid.get_mut(p.x, p.y) {
            None => tracker.blocked(),
            Some(cell) if cell.disregard => tracker.blocked(),
            Some(cell) if !cell.edge_in_use => {
                cell.edge_in_use = true;
                tracker.unused(p);
            }
            Some(_) => tracker.in_use(p),
        }
    }
    tracker.flush();
    tracker.finished
}

pub struct SegmentDiscoverer;

impl SegmentDiscoverer {
    /// Segments of one primitive, in perimeter order.
    pub fn discover_object(plot: &mut IsoPlot, object: &BuilderObject) -> Vec<IsoPlotSegment> {
        let (grid, _) = plot.parts_mut();
        let id = object.id();
        let kind = object.perimeter_kind();
        let Some(clip) = grid.bounds() else {
            return Vec::new();
        };

        let mut segments = Vec::new();
        for walk in object.perimeter_walks(&clip) {
            for (start, end) in walk_perimeter(grid, &walk) {
                let segment = match kind {
                    PerimeterKind::Straight => IsoPlotSegment::line(id, start, end),
                    PerimeterKind::Circular { center, radius } => {
                        IsoPlotSegment::arc(id, start, end, center, radius, true)
                    }
                };
                segments.push(segment);
            }
        }
        trace!(owner = %id, count = segments.len(), "segments discovered");
        segments
    }

    /// Segments of every registered primitive, in registration order.
    pub fn run(
        plot: &mut IsoPlot,
        registry: &BuilderObjectRegistry,
        cancel: &Cancellation,
    ) -> IsoPlotResult<Vec<IsoPlotSegment>> {
        let mut segments = Vec::new();
        for object in registry.iter() {
            cancel.check()?;
            segments.extend(Self::discover_object(plot, object));
        }
        debug!(
            primitives = registry.len(),
            segments = segments.len(),
            "segment discovery complete"
        );
        Ok(segments)
    }
}
