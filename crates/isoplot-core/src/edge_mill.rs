//! Edge-mill post-processing: picking the board outline among the chains and
//! leaving tabs on it.

use crate::chain::IsoPlotChain;
use crate::error::{EdgeMillError, EdgeMillResult};
use crate::grid::Bounds;
use crate::options::EdgeMillOptions;
use crate::segment::IsoPlotSegment;
use tracing::{debug, warn};

/// Index of the chain holding the global extremes in X and Y.
///
/// The outside chain is the one whose own extent reaches the minimum and
/// maximum X and Y over every segment of every chain. Arc segments count
/// with the part of their circle they actually sweep.
pub fn select_outside_chain(chains: &[IsoPlotChain]) -> EdgeMillResult<usize> {
    let Some(global) = board_extent(chains) else {
        warn!(chains = chains.len(), "no segments to take an outside boundary from");
        return Err(EdgeMillError::NoOutsideChain {
            chains: chains.len(),
        });
    };

    let found = chains
        .iter()
        .position(|chain| chain.extent().is_some_and(|extent| extent == global));
    match found {
        Some(index) => {
            debug!(index, segments = chains[index].len(), "outside chain selected");
            Ok(index)
        }
        None => {
            warn!(
                chains = chains.len(),
                ?global,
                "no chain reaches all four board extremes"
            );
            Err(EdgeMillError::NoOutsideChain {
                chains: chains.len(),
            })
        }
    }
}

fn eligible_segments(segments: &[IsoPlotSegment], min_length: f64) -> Vec<usize> {
    let mut eligible: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_line() && s.length() >= min_length)
        .map(|(i, _)| i)
        .collect();
    eligible.sort_by(|&a, &b| segments[b].length().total_cmp(&segments[a].length()));
    eligible
}

/// Distribute `options.tab_count` tabs over the outside chain.
///
/// Tabs go round-robin over the line segments at least three tab widths
/// long, longest first. Each segment then keeps only as many tabs as it can
/// space out. If the kept total falls short of the request, every tab is
/// removed again and [`EdgeMillError::TabsNotPlaced`] is returned.
pub fn place_tabs(chain: &mut IsoPlotChain, options: &EdgeMillOptions) -> EdgeMillResult<u32> {
    let requested = options.tab_count;
    if requested == 0 {
        return Ok(0);
    }
    let width = options.tab_width;
    let eligible = eligible_segments(&chain.segments, options.min_segment_length());
    if eligible.is_empty() {
        warn!(requested, tab_width = width, "no outside segment is long enough for a tab");
        return Err(EdgeMillError::TabsNotPlaced {
            requested,
            placed: 0,
        });
    }

    let mut assigned = vec![0u32; eligible.len()];
    for i in 0..requested as usize {
        assigned[i % eligible.len()] += 1;
    }

    let mut placed = 0;
    for (&index, &count) in eligible.iter().zip(&assigned) {
        let segment = &mut chain.segments[index];
        let fitted = count.min(segment.max_tabs(width));
        segment.set_tabs(fitted, if fitted > 0 { width } else { 0 });
        placed += fitted;
    }

    if placed != requested {
        for segment in &mut chain.segments {
            segment.set_tabs(0, 0);
        }
        warn!(requested, placed, "could not place all tabs");
        return Err(EdgeMillError::TabsNotPlaced { requested, placed });
    }

    debug!(placed, segments = eligible.len(), "tabs placed");
    Ok(placed)
}

/// Outline extent of a set of chains, if any holds a segment.
pub fn board_extent(chains: &[IsoPlotChain]) -> Option<Bounds> {
    chains
        .iter()
        .filter_map(IsoPlotChain::extent)
        .reduce(|a, b| a.union(&b))
}
