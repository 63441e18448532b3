use isoplot_core::{
    select_outside_chain, Bounds, ChainMode, EdgeMillError, EdgeMillOptions, IsoPlotBuilder,
    IsoPlotError, IsoPlotOptions,
};

fn options(tab_count: u32, tab_width: u32) -> IsoPlotOptions {
    IsoPlotOptions {
        edge_mill: EdgeMillOptions {
            tab_count,
            tab_width,
        },
        ..IsoPlotOptions::default()
    }
}

/// Unfilled board outline from (10, 10) to (190, 90) with copper inside.
fn populated_board(options: IsoPlotOptions) -> IsoPlotBuilder {
    let mut builder = IsoPlotBuilder::new(200, 100, options).unwrap();
    builder
        .draw_wide_line_outline(10, 50, 190, 50, 80, false)
        .unwrap();
    builder.draw_circle(50, 50, 8, true).unwrap();
    builder.draw_rect_pad(120, 50, 20, 10).unwrap();
    builder.draw_track(60, 50, 110, 50, 4).unwrap();
    builder
}

#[test]
fn test_board_outline_is_outside_chain() {
    let mut builder = populated_board(options(0, 20));
    let output = builder.build(ChainMode::EdgeMill).unwrap();

    assert!(output.chains.len() > 1);
    assert_eq!(output.outside_chain, Some(0));
    let outside = output.outside().unwrap();
    assert_eq!(
        outside.extent(),
        Some(Bounds {
            min_x: 10,
            min_y: 10,
            max_x: 190,
            max_y: 90
        })
    );
    assert_eq!(outside.len(), 4);
    assert!(outside.is_closed());
    assert_eq!(select_outside_chain(&output.chains), Ok(0));
}

#[test]
fn test_isolation_mode_does_not_select_outline() {
    let mut builder = populated_board(options(4, 20));
    let output = builder.build(ChainMode::Isolation).unwrap();
    assert_eq!(output.outside_chain, None);
    assert_eq!(output.stats.tabs, 0);
}

#[test]
fn test_tabs_spread_over_long_sides() {
    let mut builder = populated_board(options(4, 20));
    let output = builder.build(ChainMode::EdgeMill).unwrap();
    assert_eq!(output.stats.tabs, 4);

    let outside = output.outside().unwrap();
    let mut counts: Vec<u32> = outside.segments.iter().map(|s| s.tab_count()).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 1, 1, 1]);
    for segment in &outside.segments {
        assert_eq!(segment.tab_centers().len(), 1);
        assert_eq!(segment.tab_length(), 20);
    }
}

#[test]
fn test_too_many_tabs_for_narrow_board() {
    // long sides 100 hold one tab of 25 each; short sides 30 hold none
    let mut builder = IsoPlotBuilder::new(140, 60, options(4, 25)).unwrap();
    builder
        .draw_wide_line_outline(20, 30, 120, 30, 30, false)
        .unwrap();
    builder.draw_circle(70, 30, 5, true).unwrap();

    let err = builder.build(ChainMode::EdgeMill).unwrap_err();
    assert_eq!(
        err,
        IsoPlotError::EdgeMill(EdgeMillError::TabsNotPlaced {
            requested: 4,
            placed: 2
        })
    );
    assert!(!err.is_fatal());
    assert!(!builder.is_abandoned());
}

#[test]
fn test_no_outline_when_extremes_belong_to_different_chains() {
    let mut builder = IsoPlotBuilder::new(100, 100, options(0, 20)).unwrap();
    builder.draw_engraving_line(10, 10, 40, 40).unwrap();
    builder.draw_engraving_line(90, 90, 60, 20).unwrap();

    let err = builder.build(ChainMode::EdgeMill).unwrap_err();
    assert_eq!(
        err,
        IsoPlotError::EdgeMill(EdgeMillError::NoOutsideChain { chains: 2 })
    );
}
