//! Interior pixel removal.
//!
//! Runs once after all drawing and before segment discovery. A shared cell
//! whose overlay record is dominated (no edge owner at all, or more owners
//! covering it than bounding it) lies inside some other object and is
//! flagged `disregard`. Cells with a single owner are never touched.

use crate::cancel::Cancellation;
use crate::error::{IsoPlotError, IsoPlotResult};
use crate::grid::CellState;
use crate::plot::IsoPlot;
use tracing::debug;

pub struct InteriorPixelFilter;

impl InteriorPixelFilter {
    /// Flag dominated shared cells. Returns how many cells were flagged.
    pub fn run(plot: &mut IsoPlot, cancel: &Cancellation) -> IsoPlotResult<usize> {
        let (grid, overlays) = plot.parts_mut();
        let mut flagged = 0;

        for y in 0..grid.height() {
            cancel.check()?;
            for (x, cell) in grid.row_mut(y).iter_mut().enumerate() {
                let CellState::Shared(handle) = cell.state else {
                    continue;
                };
                let record = overlays
                    .get(handle)
                    .ok_or(IsoPlotError::MissingOverlayRecord {
                        handle: handle.raw(),
                        x: x as i32,
                        y: y as i32,
                    })?;
                if record.is_dominated() && !cell.disregard {
                    cell.disregard = true;
                    flagged += 1;
                }
            }
        }

        debug!(flagged, "interior pixel removal complete");
        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellClass, Role};
    use crate::registry::PrimitiveId;

    #[test]
    fn test_only_dominated_shared_cells_are_flagged() {
        let (a, b, c) = (PrimitiveId::new(1), PrimitiveId::new(2), PrimitiveId::new(3));
        let mut plot = IsoPlot::new(8, 1);
        // single owner: untouched
        plot.set_point(a, Role::Background, 0, 0, false).unwrap();
        // edge inside another object's background
        plot.set_point(a, Role::Edge, 1, 0, false).unwrap();
        plot.set_point(b, Role::Background, 1, 0, false).unwrap();
        // two edges meeting
        plot.set_point(a, Role::Edge, 2, 0, false).unwrap();
        plot.set_point(b, Role::Edge, 2, 0, false).unwrap();
        // stacked backgrounds
        plot.set_point(a, Role::Background, 3, 0, false).unwrap();
        plot.set_point(b, Role::Background, 3, 0, false).unwrap();
        // two edges crossing inside a third object
        plot.set_point(a, Role::Edge, 4, 0, false).unwrap();
        plot.set_point(b, Role::Edge, 4, 0, false).unwrap();
        plot.set_point(c, Role::Background, 4, 0, false).unwrap();

        let flagged = InteriorPixelFilter::run(&mut plot, &Cancellation::none()).unwrap();
        assert_eq!(flagged, 3);
        assert_eq!(plot.cell_class(0, 0), Some(CellClass::Background));
        assert!(plot.cell(1, 0).unwrap().disregard);
        assert!(!plot.cell(2, 0).unwrap().disregard);
        assert!(plot.cell(3, 0).unwrap().disregard);
        assert!(plot.cell(4, 0).unwrap().disregard);
        assert_eq!(plot.cell_class(3, 0), Some(CellClass::InteriorBackground));
    }

    #[test]
    fn test_running_twice_flags_nothing_new() {
        let mut plot = IsoPlot::new(2, 1);
        plot.set_point(PrimitiveId::new(1), Role::Edge, 0, 0, false)
            .unwrap();
        plot.set_point(PrimitiveId::new(2), Role::Background, 0, 0, false)
            .unwrap();
        let cancel = Cancellation::none();
        assert_eq!(InteriorPixelFilter::run(&mut plot, &cancel).unwrap(), 1);
        assert_eq!(InteriorPixelFilter::run(&mut plot, &cancel).unwrap(), 0);
    }
}
