//! Debug rendering of the isolation plot.

use crate::grid::{Cell, CellClass};
use crate::plot::IsoPlot;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// What the debug bitmap colours cells by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitmapMode {
    /// Role classification of every cell.
    #[default]
    Roles,
    /// Cells claimed by discovered segments, over a dimmed role view.
    SegmentUse,
}

const UNUSED: Rgb<u8> = Rgb([255, 255, 255]);
const EDGE: Rgb<u8> = Rgb([200, 30, 30]);
const BACKGROUND: Rgb<u8> = Rgb([240, 200, 120]);
const OVERLAY: Rgb<u8> = Rgb([60, 90, 220]);
const INTERIOR: Rgb<u8> = Rgb([150, 150, 150]);
const IN_USE: Rgb<u8> = Rgb([0, 160, 60]);

pub fn class_color(class: CellClass) -> Rgb<u8> {
    match class {
        CellClass::Unused => UNUSED,
        CellClass::Edge => EDGE,
        CellClass::Background => BACKGROUND,
        CellClass::Overlay => OVERLAY,
        CellClass::InteriorBackground => INTERIOR,
    }
}

fn dim(Rgb([r, g, b]): Rgb<u8>) -> Rgb<u8> {
    let fade = |c: u8| ((u16::from(c) + 3 * 255) / 4) as u8;
    Rgb([fade(r), fade(g), fade(b)])
}

fn cell_color(cell: &Cell, mode: BitmapMode) -> Rgb<u8> {
    match mode {
        BitmapMode::Roles => class_color(cell.class()),
        BitmapMode::SegmentUse if cell.edge_in_use => IN_USE,
        BitmapMode::SegmentUse => dim(class_color(cell.class())),
    }
}

impl IsoPlot {
    /// Render the grid with row 0 at the bottom of the image.
    pub fn isolation_bitmap(&self, mode: BitmapMode) -> RgbImage {
        let (width, height) = (self.width() as u32, self.height() as u32);
        let mut image = RgbImage::new(width, height);
        for (p, cell) in self.grid().iter() {
            let (x, y) = (p.x as u32, p.y as u32);
            if x < width && y < height {
                image.put_pixel(x, height - 1 - y, cell_color(cell, mode));
            }
        }
        image
    }
}
