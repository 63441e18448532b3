use isoplot_core::{
    ChainMode, GridPoint, IsoPlotBuilder, IsoPlotOptions, IsoPlotSegment, PrimitiveId, Role,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const GRID: usize = 64;

#[derive(Debug, Clone)]
enum Shape {
    Wide {
        from: (i32, i32),
        to: (i32, i32),
        width: i32,
        filled: bool,
    },
    Circle {
        center: (i32, i32),
        radius: i32,
        filled: bool,
    },
    Engraving {
        from: (i32, i32),
        to: (i32, i32),
    },
}

fn point() -> impl Strategy<Value = (i32, i32)> {
    (-4i32..68, -4i32..68)
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (point(), point(), 1i32..12, any::<bool>()).prop_map(|(from, to, width, filled)| {
            Shape::Wide {
                from,
                to,
                width,
                filled,
            }
        }),
        (point(), 1i32..15, any::<bool>()).prop_map(|(center, radius, filled)| Shape::Circle {
            center,
            radius,
            filled
        }),
        (point(), point()).prop_map(|(from, to)| Shape::Engraving { from, to }),
    ]
}

fn draw_all(shapes: &[Shape]) -> IsoPlotBuilder {
    let mut builder = IsoPlotBuilder::new(GRID, GRID, IsoPlotOptions::default()).unwrap();
    for shape in shapes {
        match *shape {
            Shape::Wide {
                from,
                to,
                width,
                filled,
            } => {
                builder
                    .draw_wide_line_outline(from.0, from.1, to.0, to.1, width, filled)
                    .unwrap();
            }
            Shape::Circle {
                center,
                radius,
                filled,
            } => {
                builder
                    .draw_circle(center.0, center.1, radius, filled)
                    .unwrap();
            }
            Shape::Engraving { from, to } => {
                builder
                    .draw_engraving_line(from.0, from.1, to.0, to.1)
                    .unwrap();
            }
        }
    }
    builder
}

fn key(segment: &IsoPlotSegment) -> (u32, (i32, i32), (i32, i32)) {
    (
        segment.owner.get(),
        (segment.start.x, segment.start.y),
        (segment.end.x, segment.end.y),
    )
}

/// Every stretch of the owner's perimeter walks that runs from the segment's
/// start to the first following visit of its end.
fn candidate_runs(walks: &[Vec<GridPoint>], segment: &IsoPlotSegment) -> Vec<Vec<GridPoint>> {
    let mut runs = Vec::new();
    for walk in walks {
        for (i, &p) in walk.iter().enumerate() {
            if p != segment.start {
                continue;
            }
            if let Some(j) = walk[i + 1..].iter().position(|&q| q == segment.end) {
                runs.push(walk[i..=i + 1 + j].to_vec());
            }
        }
    }
    runs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn chains_partition_discovered_segments(shapes in prop::collection::vec(shape(), 1..8)) {
        let mut builder = draw_all(&shapes);
        let output = builder.build(ChainMode::Isolation).unwrap();
        let mut discovered: Vec<_> = builder.discover_segments().unwrap().iter().map(key).collect();
        let mut chained: Vec<_> = output.chains.iter().flat_map(|c| &c.segments).map(key).collect();
        discovered.sort_unstable();
        chained.sort_unstable();
        prop_assert_eq!(discovered, chained);
        prop_assert!(output.chains.iter().flat_map(|c| &c.segments).all(|s| s.chained));
    }

    #[test]
    fn chains_are_continuous(shapes in prop::collection::vec(shape(), 1..8)) {
        let mut builder = draw_all(&shapes);
        let output = builder.build(ChainMode::Isolation).unwrap();
        for chain in &output.chains {
            prop_assert!(chain.is_continuous());
            prop_assert_eq!(chain.head(), Some(chain.origin));
        }
    }

    #[test]
    fn edge_in_use_marks_exactly_the_live_edges(shapes in prop::collection::vec(shape(), 1..8)) {
        let mut builder = draw_all(&shapes);
        builder.build(ChainMode::Isolation).unwrap();
        let plot = builder.plot();
        for (p, cell) in plot.grid().iter() {
            let has_edge = plot
                .members_at(p.x, p.y)
                .unwrap()
                .iter()
                .any(|m| m.role == Role::Edge);
            let live_edge = has_edge && !cell.disregard;
            prop_assert_eq!(cell.edge_in_use, live_edge, "cell {}", p);
        }
    }

    #[test]
    fn segments_cover_live_edges_without_overlap(shapes in prop::collection::vec(shape(), 1..8)) {
        let mut builder = draw_all(&shapes);
        builder.build(ChainMode::Isolation).unwrap();
        let segments = builder.discover_segments().unwrap().to_vec();
        let plot = builder.plot();
        let clip = plot.grid().bounds().unwrap();
        let walks: HashMap<PrimitiveId, Vec<Vec<GridPoint>>> = builder
            .registry()
            .iter()
            .map(|object| (object.id(), object.perimeter_walks(&clip)))
            .collect();

        // cells each segment surely covers, and its inner cells when the
        // stretch it came from is unambiguous
        let mut covered: HashSet<GridPoint> = HashSet::new();
        let mut claims: Vec<(HashSet<GridPoint>, Option<HashSet<GridPoint>>)> = Vec::new();
        for segment in &segments {
            let runs = candidate_runs(&walks[&segment.owner], segment);
            prop_assert!(!runs.is_empty(), "{:?} is off its owner's perimeter", segment);
            for run in &runs {
                covered.extend(run.iter().copied());
            }
            let certain: HashSet<GridPoint> = runs[0]
                .iter()
                .copied()
                .filter(|p| runs.iter().all(|run| run.contains(p)))
                .collect();
            let inner = (runs.len() == 1)
                .then(|| runs[0][1..runs[0].len() - 1].iter().copied().collect());
            claims.push((certain, inner));
        }

        // an inner cell belongs to one segment; others may only end on it
        for (a, (_, inner)) in claims.iter().enumerate() {
            let Some(inner) = inner else { continue };
            for (b, (certain, _)) in claims.iter().enumerate() {
                if a == b {
                    continue;
                }
                for p in certain {
                    if *p == segments[b].start || *p == segments[b].end {
                        continue;
                    }
                    prop_assert!(
                        !inner.contains(p),
                        "cell {} lies on {:?} and {:?}", p, segments[a], segments[b]
                    );
                }
            }
        }

        // a live edge cell off every segment was a lone cell between
        // blocked neighbours, too short to make a segment
        let blocked = |q: Option<&GridPoint>| {
            q.map_or(true, |q| plot.cell(q.x, q.y).map_or(true, |c| c.disregard))
        };
        for (p, cell) in plot.grid().iter() {
            if cell.disregard || covered.contains(&p) {
                continue;
            }
            let edge_owners: Vec<PrimitiveId> = plot
                .members_at(p.x, p.y)
                .unwrap()
                .iter()
                .filter(|m| m.role == Role::Edge)
                .map(|m| m.owner)
                .collect();
            if edge_owners.is_empty() {
                continue;
            }
            let lone = edge_owners.iter().flat_map(|o| &walks[o]).any(|walk| {
                walk.iter().enumerate().any(|(i, &q)| {
                    q == p
                        && blocked(i.checked_sub(1).and_then(|k| walk.get(k)))
                        && blocked(walk.get(i + 1))
                })
            });
            prop_assert!(lone, "live edge cell {} is on no segment", p);
        }
    }

    #[test]
    fn overlay_records_are_unique(shapes in prop::collection::vec(shape(), 1..8)) {
        let builder = draw_all(&shapes);
        let overlays = builder.plot().overlays();
        let keys: HashSet<_> = overlays.iter().map(|(_, r)| r.members().to_vec()).collect();
        prop_assert_eq!(keys.len(), overlays.len());
        for (_, record) in overlays.iter() {
            prop_assert!(record.members().len() >= 2);
        }
    }

    #[test]
    fn line_segments_have_extent(shapes in prop::collection::vec(shape(), 1..8)) {
        let mut builder = draw_all(&shapes);
        for segment in builder.discover_segments().unwrap() {
            if segment.is_line() {
                prop_assert_ne!(segment.start, segment.end);
            }
        }
    }
}
