use isoplot_core::{CellClass, ChainMode, GridPoint, IsoPlotBuilder, IsoPlotOptions};

const CIRCLES: [(i32, i32, i32); 3] = [(30, 30, 10), (42, 30, 10), (36, 40, 10)];

fn distance(x: i32, y: i32, cx: i32, cy: i32) -> f64 {
    f64::from((x - cx).pow(2) + (y - cy).pow(2)).sqrt()
}

fn strictly_inside(x: i32, y: i32, (cx, cy, r): (i32, i32, i32)) -> bool {
    distance(x, y, cx, cy) < f64::from(r) - 1.5
}

fn three_overlapping_circles() -> IsoPlotBuilder {
    let mut builder = IsoPlotBuilder::new(80, 80, IsoPlotOptions::default()).unwrap();
    for (cx, cy, r) in CIRCLES {
        builder.draw_circle(cx, cy, r, true).unwrap();
    }
    builder
}

#[test]
fn test_isolated_filled_circle_closes() {
    let mut builder = IsoPlotBuilder::new(50, 50, IsoPlotOptions::default()).unwrap();
    builder.draw_circle(25, 25, 10, true).unwrap();
    let output = builder.build(ChainMode::Isolation).unwrap();

    assert_eq!(output.chains.len(), 1);
    let chain = &output.chains[0];
    assert!(chain.segments.iter().all(|s| s.is_arc()));
    assert!(chain.is_closed());
    assert_eq!(chain.head(), chain.tail());
    assert_eq!(chain.head(), Some(GridPoint::new(25, 35)));
    assert_eq!(chain.segments[0].is_clockwise(), Some(true));
}

#[test]
fn test_circle_clipped_by_grid_still_discovers() {
    let mut builder = IsoPlotBuilder::new(30, 30, IsoPlotOptions::default()).unwrap();
    builder.draw_circle(0, 15, 8, true).unwrap();
    let output = builder.build(ChainMode::Isolation).unwrap();
    assert!(!output.chains.is_empty());
    assert!(output
        .chains
        .iter()
        .flat_map(|c| &c.segments)
        .all(|s| s.start.x >= 0 && s.end.x >= 0));
}

#[test]
fn test_overlapping_circles_drop_enclosed_edges() {
    let mut builder = three_overlapping_circles();
    let flagged = builder.remove_interior_pixels().unwrap();
    assert!(flagged > 0);

    // right extreme of the first circle lies inside the second
    assert!(builder.plot().cell(40, 30).unwrap().disregard);
    // common core of all three is stacked background
    assert_eq!(builder.cell_class(36, 33), Some(CellClass::InteriorBackground));
    // area covered by the first circle alone
    assert_eq!(builder.cell_class(24, 30), Some(CellClass::Background));
    // outer extremes of the silhouette stay live
    assert!(!builder.plot().cell(20, 30).unwrap().disregard);
    assert!(!builder.plot().cell(52, 30).unwrap().disregard);
    assert!(!builder.plot().cell(36, 50).unwrap().disregard);
}

#[test]
fn test_overlapping_circles_leave_only_silhouette() {
    let mut builder = three_overlapping_circles();
    let output = builder.build(ChainMode::Isolation).unwrap();
    assert!(output.stats.segments > 0);
    assert!(output.stats.disregarded_cells > 0);

    let plot = builder.plot();
    for (p, cell) in plot.grid().iter() {
        if cell.edge_in_use {
            for circle in CIRCLES {
                assert!(
                    !strictly_inside(p.x, p.y, circle),
                    "live boundary cell {p} inside circle {circle:?}"
                );
            }
        }
        for circle in CIRCLES {
            if strictly_inside(p.x, p.y, circle) && cell.class() == CellClass::Overlay {
                panic!("shared cell {p} inside circle {circle:?} was not flagged");
            }
        }
    }

    let segments: Vec<_> = output.chains.iter().flat_map(|c| &c.segments).collect();
    assert!(segments.iter().all(|s| s.is_arc()));
    assert!(output.chains.iter().all(|c| c.is_continuous()));
}
