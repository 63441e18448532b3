//! Builder objects: the primitives drawn into an isolation plot.
//!
//! The registry hands out IDs and keeps each primitive's geometry so later
//! passes can replay its perimeter in exactly the order it was drawn.

use crate::error::{IsoPlotError, IsoPlotResult};
use crate::grid::{Bounds, GridPoint};
use crate::raster::{bresenham_line, circle_points, circle_touches, clip_line, clip_walk};
use serde::{Deserialize, Serialize};

/// Default ID ceiling, the largest value that fits the classic 24-bit cell
/// encoding.
pub const DEFAULT_MAX_PRIMITIVE_ID: u32 = (1 << 24) - 1;

/// Unique ID of a drawn primitive. IDs start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which kind of boundary segment a primitive's perimeter yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerimeterKind {
    Straight,
    Circular { center: GridPoint, radius: i32 },
}

/// A drawn primitive and the geometry needed to re-derive its boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderObject {
    /// Wide line drawn as a (rotated) rectangle outline.
    Line {
        id: PrimitiveId,
        from: GridPoint,
        to: GridPoint,
        width: i32,
        corners: [GridPoint; 4],
        filled: bool,
    },
    Circle {
        id: PrimitiveId,
        center: GridPoint,
        radius: i32,
        filled: bool,
    },
    /// Thin line; its cells are all edge.
    EngravingLine {
        id: PrimitiveId,
        from: GridPoint,
        to: GridPoint,
    },
}

impl BuilderObject {
    pub fn id(&self) -> PrimitiveId {
        match self {
            Self::Line { id, .. } | Self::Circle { id, .. } | Self::EngravingLine { id, .. } => *id,
        }
    }

    pub fn perimeter_kind(&self) -> PerimeterKind {
        match self {
            Self::Circle { center, radius, .. } => PerimeterKind::Circular {
                center: *center,
                radius: *radius,
            },
            _ => PerimeterKind::Straight,
        }
    }

    pub fn is_filled(&self) -> bool {
        match self {
            Self::Line { filled, .. } | Self::Circle { filled, .. } => *filled,
            Self::EngravingLine { .. } => false,
        }
    }

    /// Whether the perimeter is drawn from several passes that may touch the
    /// same cell more than once.
    pub fn is_composite(&self) -> bool {
        !matches!(self, Self::EngravingLine { .. })
    }

    /// The perimeter as a list of walks, in drawing order, limited to `clip`.
    ///
    /// A wide line yields its four sides as separate walks (each side becomes
    /// its own straight segment). A circle yields one walk that returns to its
    /// first cell, so a fully exposed circle closes on itself; where the
    /// circle leaves `clip` its walk is split. Nothing outside `clip` is ever
    /// materialised, so far-off geometry costs no more than what is visible.
    pub fn perimeter_walks(&self, clip: &Bounds) -> Vec<Vec<GridPoint>> {
        let straight = |from: GridPoint, to: GridPoint| {
            clip_line(from, to, clip).map(|(a, b)| bresenham_line(a, b))
        };
        match self {
            Self::Line { corners, .. } => (0..4)
                .filter_map(|i| straight(corners[i], corners[(i + 1) % 4]))
                .collect(),
            Self::Circle { center, radius, .. } => {
                if !circle_touches(*center, *radius, clip) {
                    return Vec::new();
                }
                let mut walk = circle_points(*center, *radius);
                if let Some(&first) = walk.first() {
                    walk.push(first);
                }
                clip_walk(walk, clip)
            }
            Self::EngravingLine { from, to, .. } => straight(*from, *to).into_iter().collect(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Line { corners, .. } => Bounds::around(corners.iter().copied())
                .unwrap_or(Bounds {
                    min_x: 0,
                    min_y: 0,
                    max_x: 0,
                    max_y: 0,
                }),
            Self::Circle { center, radius, .. } => Bounds {
                min_x: center.x.saturating_sub(*radius),
                min_y: center.y.saturating_sub(*radius),
                max_x: center.x.saturating_add(*radius),
                max_y: center.y.saturating_add(*radius),
            },
            Self::EngravingLine { from, to, .. } => {
                let mut b = Bounds {
                    min_x: from.x,
                    min_y: from.y,
                    max_x: from.x,
                    max_y: from.y,
                };
                b.include(*to);
                b
            }
        }
    }
}

/// Owns every primitive of one conversion run.
#[derive(Debug, Clone)]
pub struct BuilderObjectRegistry {
    objects: Vec<BuilderObject>,
    max_id: u32,
}

impl Default for BuilderObjectRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRIMITIVE_ID)
    }
}

impl BuilderObjectRegistry {
    pub fn new(max_id: u32) -> Self {
        Self {
            objects: Vec::new(),
            max_id,
        }
    }

    /// The ID the next registration will receive.
    pub fn next_id(&self) -> IsoPlotResult<PrimitiveId> {
        let next = self.objects.len() as u64 + 1;
        if next > u64::from(self.max_id) {
            return Err(IsoPlotError::CapacityExhausted { max: self.max_id });
        }
        Ok(PrimitiveId::new(next as u32))
    }

    /// Assign the next ID and store the object built for it.
    pub fn register<F>(&mut self, build: F) -> IsoPlotResult<PrimitiveId>
    where
        F: FnOnce(PrimitiveId) -> BuilderObject,
    {
        let id = self.next_id()?;
        self.objects.push(build(id));
        Ok(id)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&BuilderObject> {
        let index = (id.get() as usize).checked_sub(1)?;
        self.objects.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuilderObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
