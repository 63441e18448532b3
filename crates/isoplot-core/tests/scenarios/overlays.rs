use isoplot_core::{
    CellClass, IsoPlot, IsoPlotBuilder, IsoPlotError, IsoPlotOptions, OverlayMember, PrimitiveId,
    Role,
};

#[test]
fn test_repeated_collision_pattern_reuses_record() {
    let mut builder = IsoPlotBuilder::new(40, 20, IsoPlotOptions::default()).unwrap();
    let pad = builder
        .draw_wide_line_outline(0, 5, 20, 5, 10, true)
        .unwrap()
        .unwrap();
    let line = builder.draw_engraving_line(-5, 5, 30, 5).unwrap().unwrap();

    let plot = builder.plot();
    // crossings of the pad outline, and the run through its interior
    assert_eq!(plot.overlays().len(), 2);
    assert_eq!(plot.overlays().live_count(), 2);
    assert_eq!(
        plot.members_at(10, 5).unwrap(),
        vec![
            OverlayMember::new(pad, Role::Background),
            OverlayMember::new(line, Role::Edge)
        ]
    );
    assert_eq!(
        plot.members_at(0, 5).unwrap(),
        vec![
            OverlayMember::new(pad, Role::Edge),
            OverlayMember::new(line, Role::Edge)
        ]
    );
    assert_eq!(plot.cell_class(25, 5), Some(CellClass::Edge));
}

#[test]
fn test_engraving_through_filled_pad_is_interior() {
    let mut builder = IsoPlotBuilder::new(40, 20, IsoPlotOptions::default()).unwrap();
    builder
        .draw_wide_line_outline(0, 5, 20, 5, 10, true)
        .unwrap();
    builder.draw_engraving_line(-5, 5, 30, 5).unwrap();
    let flagged = builder.remove_interior_pixels().unwrap();

    assert_eq!(flagged, 19);
    assert_eq!(builder.cell_class(10, 5), Some(CellClass::InteriorBackground));
    assert_eq!(builder.cell_class(0, 5), Some(CellClass::Overlay));
}

#[test]
fn test_third_owner_moves_cell_to_new_record() {
    let (a, b, c) = (PrimitiveId::new(1), PrimitiveId::new(2), PrimitiveId::new(3));
    let mut plot = IsoPlot::new(4, 1);
    for x in 0..4 {
        plot.set_point(a, Role::Background, x, 0, false).unwrap();
        plot.set_point(b, Role::Background, x, 0, false).unwrap();
    }
    assert_eq!(plot.overlays().len(), 1);

    for x in 0..4 {
        plot.set_point(c, Role::Edge, x, 0, false).unwrap();
    }
    assert_eq!(plot.overlays().len(), 2);
    // the two-owner record is no longer referenced by any cell
    assert_eq!(plot.overlays().live_count(), 1);
}

#[test]
fn test_self_overwrite_is_fatal() {
    let mut plot = IsoPlot::new(4, 4);
    let id = PrimitiveId::new(1);
    plot.set_point(id, Role::Edge, 2, 2, false).unwrap();
    assert_eq!(
        plot.set_point(id, Role::Edge, 2, 2, false),
        Err(IsoPlotError::SelfOverwrite { owner: 1, x: 2, y: 2 })
    );
    assert!(IsoPlotError::SelfOverwrite { owner: 1, x: 2, y: 2 }.is_fatal());
}
