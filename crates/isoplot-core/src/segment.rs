//! Boundary segments recovered from the isolation plot.

use crate::grid::{Bounds, GridPoint};
use crate::registry::PrimitiveId;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Geometry specific to the segment variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentShape {
    Line {
        /// Tabs assigned by edge-mill tab placement.
        tab_count: u32,
        /// Length of each tab, in raster units.
        tab_length: u32,
    },
    Arc {
        center: GridPoint,
        radius: i32,
        /// Traversal sense from `start` to `end`, with y pointing up.
        clockwise: bool,
    },
}

/// A discovered boundary piece in raster coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoPlotSegment {
    pub owner: PrimitiveId,
    pub start: GridPoint,
    pub end: GridPoint,
    pub shape: SegmentShape,
    /// Consumed by chain assembly.
    pub chained: bool,
    /// Emit from `end` to `start`.
    pub needs_flip: bool,
}

impl IsoPlotSegment {
    pub fn line(owner: PrimitiveId, start: GridPoint, end: GridPoint) -> Self {
        Self {
            owner,
            start,
            end,
            shape: SegmentShape::Line {
                tab_count: 0,
                tab_length: 0,
            },
            chained: false,
            needs_flip: false,
        }
    }

    pub fn arc(
        owner: PrimitiveId,
        start: GridPoint,
        end: GridPoint,
        center: GridPoint,
        radius: i32,
        clockwise: bool,
    ) -> Self {
        Self {
            owner,
            start,
            end,
            shape: SegmentShape::Arc {
                center,
                radius,
                clockwise,
            },
            chained: false,
            needs_flip: false,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self.shape, SegmentShape::Line { .. })
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.shape, SegmentShape::Arc { .. })
    }

    /// Where the tool enters this segment, orientation applied.
    pub fn head(&self) -> GridPoint {
        if self.needs_flip {
            self.end
        } else {
            self.start
        }
    }

    /// Where the tool leaves this segment, orientation applied.
    pub fn tail(&self) -> GridPoint {
        if self.needs_flip {
            self.start
        } else {
            self.end
        }
    }

    pub fn touches(&self, p: GridPoint) -> bool {
        self.start == p || self.end == p
    }

    /// The endpoint opposite `p`. Assumes `p` is one of the endpoints.
    pub fn far_end(&self, p: GridPoint) -> GridPoint {
        if self.start == p {
            self.end
        } else {
            self.start
        }
    }

    /// Effective arc sense after `needs_flip`. `None` for lines.
    pub fn is_clockwise(&self) -> Option<bool> {
        match self.shape {
            SegmentShape::Arc { clockwise, .. } => Some(clockwise != self.needs_flip),
            SegmentShape::Line { .. } => None,
        }
    }

    /// Angle swept from `start` to `end` in the recorded sense. A closed arc
    /// (start equals end) sweeps a full turn.
    fn sweep(&self, center: GridPoint, clockwise: bool) -> f64 {
        if self.start == self.end {
            return TAU;
        }
        let a1 = angle_from(center, self.end);
        turned(angle_from(center, self.start), a1, clockwise)
    }

    /// Path length in raster units.
    pub fn length(&self) -> f64 {
        match self.shape {
            SegmentShape::Line { .. } => self.start.distance_to(self.end),
            SegmentShape::Arc {
                center,
                radius,
                clockwise,
            } => f64::from(radius) * self.sweep(center, clockwise),
        }
    }

    /// Extent used for outside-boundary detection. An arc covers its end
    /// points plus every axis extreme of its circle it sweeps past.
    pub fn extent(&self) -> Bounds {
        let mut b = Bounds {
            min_x: self.start.x,
            min_y: self.start.y,
            max_x: self.start.x,
            max_y: self.start.y,
        };
        b.include(self.end);
        if let SegmentShape::Arc {
            center,
            radius,
            clockwise,
        } = self.shape
        {
            let a0 = angle_from(center, self.start);
            let sweep = self.sweep(center, clockwise);
            let extremes = [
                (0.0, GridPoint::new(center.x.saturating_add(radius), center.y)),
                (FRAC_PI_2, GridPoint::new(center.x, center.y.saturating_add(radius))),
                (PI, GridPoint::new(center.x.saturating_sub(radius), center.y)),
                (-FRAC_PI_2, GridPoint::new(center.x, center.y.saturating_sub(radius))),
            ];
            for (theta, point) in extremes {
                if turned(a0, theta, clockwise) <= sweep + 1e-9 {
                    b.include(point);
                }
            }
        }
        b
    }

    pub fn tab_count(&self) -> u32 {
        match self.shape {
            SegmentShape::Line { tab_count, .. } => tab_count,
            SegmentShape::Arc { .. } => 0,
        }
    }

    pub fn tab_length(&self) -> u32 {
        match self.shape {
            SegmentShape::Line { tab_length, .. } => tab_length,
            SegmentShape::Arc { .. } => 0,
        }
    }

    pub(crate) fn set_tabs(&mut self, count: u32, length: u32) {
        if let SegmentShape::Line {
            tab_count,
            tab_length,
        } = &mut self.shape
        {
            *tab_count = count;
            *tab_length = length;
        }
    }

    /// Most tabs of `tab_length` this segment can hold: every tab needs a
    /// cut gap of the same length on both sides, so `n` tabs need
    /// `(2n + 1) * tab_length`.
    pub fn max_tabs(&self, tab_length: u32) -> u32 {
        if !self.is_line() || tab_length == 0 {
            return 0;
        }
        let units = self.length() / f64::from(tab_length);
        if units < 1.0 {
            return 0;
        }
        ((units - 1.0) / 2.0).floor() as u32
    }

    /// Evenly spaced tab centre points, from head to tail.
    pub fn tab_centers(&self) -> Vec<(f64, f64)> {
        let n = self.tab_count();
        let (head, tail) = (self.head(), self.tail());
        (1..=n)
            .map(|i| {
                let t = f64::from(i) / f64::from(n + 1);
                (
                    f64::from(head.x) + t * (f64::from(tail.x) - f64::from(head.x)),
                    f64::from(head.y) + t * (f64::from(tail.y) - f64::from(head.y)),
                )
            })
            .collect()
    }
}

fn angle_from(center: GridPoint, p: GridPoint) -> f64 {
    (f64::from(p.y) - f64::from(center.y)).atan2(f64::from(p.x) - f64::from(center.x))
}

/// Angle turned going from `from` to `to` in the given sense, in `[0, 2pi)`.
fn turned(from: f64, to: f64, clockwise: bool) -> f64 {
    let delta = if clockwise { from - to } else { to - from };
    delta.rem_euclid(TAU)
}
