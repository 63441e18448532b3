use isoplot_core::{
    CellClass, ChainMode, GridPoint, IsoPlotBuilder, IsoPlotOptions, IsoPlotSegment, PrimitiveId,
};

fn two_touching_rectangles() -> IsoPlotBuilder {
    let mut builder = IsoPlotBuilder::new(30, 20, IsoPlotOptions::default()).unwrap();
    // left square spans x 0..=10, right square x 10..=20, both y 0..=10
    builder
        .draw_wide_line_outline(0, 5, 10, 5, 10, true)
        .unwrap();
    builder
        .draw_wide_line_outline(10, 5, 20, 5, 10, true)
        .unwrap();
    builder
}

fn is_shared_edge(segment: &IsoPlotSegment) -> bool {
    segment.start.x == 10 && segment.end.x == 10
}

#[test]
fn test_shared_edge_is_emitted_once() {
    let mut builder = two_touching_rectangles();
    let segments = builder.discover_segments().unwrap().to_vec();

    assert_eq!(segments.len(), 7);
    let shared: Vec<_> = segments.iter().filter(|s| is_shared_edge(s)).collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].owner, PrimitiveId::new(1));
    assert!(segments.iter().all(IsoPlotSegment::is_line));
}

#[test]
fn test_shared_edge_survives_interior_filtering() {
    let mut builder = two_touching_rectangles();
    let flagged = builder.remove_interior_pixels().unwrap();
    assert_eq!(flagged, 0);
    for y in 0..=10 {
        assert_eq!(builder.cell_class(10, y), Some(CellClass::Overlay));
    }
}

#[test]
fn test_rectangle_interiors_are_background() {
    let builder = two_touching_rectangles();
    for &(x, y) in &[(5, 5), (1, 1), (9, 9), (15, 5), (11, 1), (19, 9)] {
        assert_eq!(builder.cell_class(x, y), Some(CellClass::Background), "({x}, {y})");
    }
    assert_eq!(builder.cell_class(0, 5), Some(CellClass::Edge));
    assert_eq!(builder.cell_class(20, 5), Some(CellClass::Edge));
    assert_eq!(builder.cell_class(25, 5), Some(CellClass::Unused));
}

#[test]
fn test_touching_rectangles_chain_into_loop_and_open_path() {
    let mut builder = two_touching_rectangles();
    let output = builder.build(ChainMode::Isolation).unwrap();

    assert_eq!(output.chains.len(), 2);
    assert_eq!(output.stats.segments, 7);

    let left = &output.chains[0];
    assert_eq!(left.len(), 4);
    assert!(left.is_closed());

    let right = &output.chains[1];
    assert_eq!(right.len(), 3);
    assert!(!right.is_closed());
    assert_eq!(right.head(), Some(GridPoint::new(10, 10)));
    assert_eq!(right.tail(), Some(GridPoint::new(10, 0)));

    assert!(output.chains.iter().all(|c| c.is_continuous()));
}
