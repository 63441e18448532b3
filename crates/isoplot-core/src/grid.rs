//! Pixel grid shared by every rasterized primitive.
//!
//! Each cell is an explicit sum type: unclaimed, owned by exactly one
//! primitive (with its role), or shared through an overlay record. Two
//! per-cell flags are layered on top: `disregard` (provably interior, set by
//! the interior filter) and `edge_in_use` (claimed by a discovered segment).

use crate::overlay::OverlayHandle;
use crate::registry::PrimitiveId;
use serde::{Deserialize, Serialize};

/// How a primitive uses a cell.
///
/// `Edge` orders above `Background` so merging two usages of the same owner
/// keeps the edge. An edge usage also claims the cell as background: the
/// boundary pixel belongs to the primitive's covered area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Background,
    Edge,
}

impl Role {
    pub fn is_edge(self) -> bool {
        matches!(self, Role::Edge)
    }

    /// Combine two usages of one owner on one cell.
    pub fn merge(self, other: Role) -> Role {
        self.max(other)
    }
}

/// Integer raster coordinate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: GridPoint) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Inclusive axis-aligned rectangle in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Smallest bounds holding every point. `None` for an empty input.
    pub fn around<I: IntoIterator<Item = GridPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: GridPoint) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        (i64::from(self.min_x)..=i64::from(self.max_x)).contains(&x)
            && (i64::from(self.min_y)..=i64::from(self.max_y)).contains(&y)
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Ownership state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Unclaimed,
    Owned {
        owner: PrimitiveId,
        role: Role,
    },
    Shared(OverlayHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub state: CellState,
    /// Provably interior; excluded from segment discovery.
    pub disregard: bool,
    /// Already claimed by a discovered segment.
    pub edge_in_use: bool,
}

/// Coarse role classification of a cell, for inspection views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    Unused,
    Edge,
    Background,
    Overlay,
    InteriorBackground,
}

impl Cell {
    pub fn is_unclaimed(&self) -> bool {
        matches!(self.state, CellState::Unclaimed)
    }

    pub fn class(&self) -> CellClass {
        match self.state {
            CellState::Unclaimed => CellClass::Unused,
            CellState::Owned {
                role: Role::Edge, ..
            } => CellClass::Edge,
            CellState::Owned { .. } => CellClass::Background,
            CellState::Shared(_) if self.disregard => CellClass::InteriorBackground,
            CellState::Shared(_) => CellClass::Overlay,
        }
    }
}

/// Fixed-size matrix of cells, allocated once per conversion run.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// The cell rectangle, `None` for an empty grid.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(Bounds {
            min_x: 0,
            min_y: 0,
            max_x: i32::try_from(self.width - 1).unwrap_or(i32::MAX),
            max_y: i32::try_from(self.height - 1).unwrap_or(i32::MAX),
        })
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        let i = self.index(x, y)?;
        Some(&self.cells[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let i = self.index(x, y)?;
        Some(&mut self.cells[i])
    }

    /// Mutable access to one full row. Panics if `y` is outside the grid.
    pub fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        let start = y * self.width;
        &mut self.cells[start..start + self.width]
    }

    /// Every cell with its coordinate, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &Cell)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let p = GridPoint::new((i % width) as i32, (i / width) as i32);
            (p, cell)
        })
    }

    /// Number of cells in each class.
    pub fn class_count(&self, class: CellClass) -> usize {
        self.cells.iter().filter(|c| c.class() == class).count()
    }
}
