//! The isolation plot: pixel grid plus overlay records, and the collision
//! protocol every draw goes through.
//!
//! Primitives never reference each other directly. They communicate only
//! through the cells they claim: a cell first claimed by one primitive
//! records that owner; a second claimant turns the cell into a shared cell
//! pointing at an overlay record holding both; later claimants move the cell
//! to the record for the grown owner set.

use crate::error::{IsoPlotError, IsoPlotResult};
use crate::grid::{Bounds, Cell, CellClass, CellState, GridPoint, PixelGrid, Role};
use crate::overlay::{OverlayCollection, OverlayMember, OverlayRecord};
use crate::raster::bresenham_line;
use crate::registry::PrimitiveId;

#[derive(Debug)]
pub struct IsoPlot {
    grid: PixelGrid,
    overlays: OverlayCollection,
}

impl IsoPlot {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: PixelGrid::new(width, height),
            overlays: OverlayCollection::new(),
        }
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn overlays(&self) -> &OverlayCollection {
        &self.overlays
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Split borrow used by passes that rewrite cell flags while reading
    /// overlay records.
    pub(crate) fn parts_mut(&mut self) -> (&mut PixelGrid, &OverlayCollection) {
        (&mut self.grid, &self.overlays)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.get(x, y)
    }

    /// Role classification of a cell; `None` outside the grid.
    pub fn cell_class(&self, x: i32, y: i32) -> Option<CellClass> {
        self.grid.get(x, y).map(Cell::class)
    }

    /// The overlay record a shared cell points at.
    pub fn record_at(&self, x: i32, y: i32) -> IsoPlotResult<Option<&OverlayRecord>> {
        match self.grid.get(x, y).map(|c| c.state) {
            Some(CellState::Shared(handle)) => self
                .overlays
                .get(handle)
                .map(Some)
                .ok_or(IsoPlotError::MissingOverlayRecord {
                    handle: handle.raw(),
                    x,
                    y,
                }),
            _ => Ok(None),
        }
    }

    /// Every (owner, role) pair claiming a cell.
    pub fn members_at(&self, x: i32, y: i32) -> IsoPlotResult<Vec<OverlayMember>> {
        match self.grid.get(x, y).map(|c| c.state) {
            None | Some(CellState::Unclaimed) => Ok(Vec::new()),
            Some(CellState::Owned { owner, role }) => Ok(vec![OverlayMember::new(owner, role)]),
            Some(CellState::Shared(_)) => Ok(self
                .record_at(x, y)?
                .map(|r| r.members().to_vec())
                .unwrap_or_default()),
        }
    }

    /// How `owner` uses a cell, if at all.
    pub fn role_of(&self, owner: PrimitiveId, x: i32, y: i32) -> IsoPlotResult<Option<Role>> {
        match self.grid.get(x, y).map(|c| c.state) {
            Some(CellState::Owned { owner: o, role }) if o == owner => Ok(Some(role)),
            Some(CellState::Shared(_)) => Ok(self
                .record_at(x, y)?
                .and_then(|r| r.member(owner))
                .map(|m| m.role)),
            _ => Ok(None),
        }
    }

    fn is_own_edge(&self, owner: PrimitiveId, x: i32, y: i32) -> IsoPlotResult<bool> {
        Ok(self.role_of(owner, x, y)? == Some(Role::Edge))
    }

    /// Claim one cell for `owner`.
    ///
    /// Out-of-bounds coordinates are ignored (clipping). Re-claiming a cell
    /// the owner already holds is a [`IsoPlotError::SelfOverwrite`] unless
    /// `ignore_own_overwrite` is set, in which case the two usages merge with
    /// the edge role winning.
    pub fn set_point(
        &mut self,
        owner: PrimitiveId,
        role: Role,
        x: i32,
        y: i32,
        ignore_own_overwrite: bool,
    ) -> IsoPlotResult<()> {
        let Some(cell) = self.grid.get(x, y) else {
            return Ok(());
        };
        let previous = cell.state;
        let incoming = OverlayMember::new(owner, role);
        let self_overwrite = IsoPlotError::SelfOverwrite {
            owner: owner.get(),
            x,
            y,
        };

        let next = match previous {
            CellState::Unclaimed => CellState::Owned { owner, role },
            CellState::Owned {
                owner: current,
                role: current_role,
            } if current == owner => {
                if !ignore_own_overwrite {
                    return Err(self_overwrite);
                }
                CellState::Owned {
                    owner,
                    role: current_role.merge(role),
                }
            }
            CellState::Owned {
                owner: current,
                role: current_role,
            } => CellState::Shared(
                self.overlays
                    .find_or_create(vec![OverlayMember::new(current, current_role), incoming]),
            ),
            CellState::Shared(handle) => {
                let record =
                    self.overlays
                        .get(handle)
                        .ok_or(IsoPlotError::MissingOverlayRecord {
                            handle: handle.raw(),
                            x,
                            y,
                        })?;
                if let Some(existing) = record.member(owner) {
                    if !ignore_own_overwrite {
                        return Err(self_overwrite);
                    }
                    if existing.role.merge(role) == existing.role {
                        return Ok(());
                    }
                }
                let members = record.with_member(incoming);
                CellState::Shared(self.overlays.find_or_create(members))
            }
        };

        if next != previous {
            if let CellState::Shared(old) = previous {
                self.overlays.detach(old);
            }
            if let CellState::Shared(new) = next {
                self.overlays.attach(new);
            }
        }
        if let Some(cell) = self.grid.get_mut(x, y) {
            cell.state = next;
        }
        Ok(())
    }

    /// Write every point of a walk as an edge of `owner`.
    pub fn draw_walk(
        &mut self,
        owner: PrimitiveId,
        points: &[GridPoint],
        ignore_own_overwrite: bool,
    ) -> IsoPlotResult<()> {
        for p in points {
            self.set_point(owner, Role::Edge, p.x, p.y, ignore_own_overwrite)?;
        }
        Ok(())
    }

    /// Bresenham line of edge cells.
    pub fn draw_line(
        &mut self,
        owner: PrimitiveId,
        from: GridPoint,
        to: GridPoint,
        ignore_own_overwrite: bool,
    ) -> IsoPlotResult<()> {
        self.draw_walk(owner, &bresenham_line(from, to), ignore_own_overwrite)
    }

    /// Scanline background fill of `owner`'s interior within `bounds`.
    ///
    /// For each row, the first run of the owner's edge cells opens the span
    /// and the next owner edge cell closes it; everything between is claimed
    /// as background. Only one span is filled per row, so this is correct for
    /// simple convex outlines (rectangles, circles) and nothing more. Rows
    /// with no closing edge inside the grid are left alone.
    ///
    /// Returns the number of cells written.
    pub fn background_fill(&mut self, owner: PrimitiveId, bounds: Bounds) -> IsoPlotResult<usize> {
        if self.width() == 0 || self.height() == 0 {
            return Ok(0);
        }
        let x_lo = bounds.min_x.max(0);
        let x_hi = bounds.max_x.min(self.width() as i32 - 1);
        let y_lo = bounds.min_y.max(0);
        let y_hi = bounds.max_y.min(self.height() as i32 - 1);

        let mut written = 0;
        for y in y_lo..=y_hi {
            let mut x = x_lo;
            while x <= x_hi && !self.is_own_edge(owner, x, y)? {
                x += 1;
            }
            while x <= x_hi && self.is_own_edge(owner, x, y)? {
                x += 1;
            }
            let span_start = x;
            while x <= x_hi && !self.is_own_edge(owner, x, y)? {
                x += 1;
            }
            if x > x_hi {
                continue;
            }
            for fx in span_start..x {
                self.set_point(owner, Role::Background, fx, y, true)?;
                written += 1;
            }
        }
        Ok(written)
    }
}
