//! Chain assembly: orders discovered segments into continuous tool paths.

use crate::grid::{Bounds, GridPoint};
use crate::segment::IsoPlotSegment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ordered segments whose consecutive members share an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoPlotChain {
    pub segments: Vec<IsoPlotSegment>,
    /// Free endpoint the chain is entered from.
    pub origin: GridPoint,
}

impl IsoPlotChain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> Option<GridPoint> {
        self.segments.first().map(IsoPlotSegment::head)
    }

    pub fn tail(&self) -> Option<GridPoint> {
        self.segments.last().map(IsoPlotSegment::tail)
    }

    /// The path returns to where it started.
    pub fn is_closed(&self) -> bool {
        !self.segments.is_empty() && self.head() == self.tail()
    }

    /// Every segment starts where the previous one ended.
    pub fn is_continuous(&self) -> bool {
        self.segments
            .windows(2)
            .all(|w| w[0].tail() == w[1].head())
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(IsoPlotSegment::length).sum()
    }

    pub fn extent(&self) -> Option<Bounds> {
        self.segments
            .iter()
            .map(IsoPlotSegment::extent)
            .reduce(|a, b| a.union(&b))
    }

    /// Set `needs_flip` on each segment so the chain can be cut without
    /// lifting the tool: starting from `origin`, a segment whose start matches
    /// the running position keeps its orientation, otherwise it is flipped.
    pub fn resolve_orientation(&mut self) {
        let mut position = self.origin;
        for segment in &mut self.segments {
            if segment.start == position {
                segment.needs_flip = false;
                position = segment.end;
            } else {
                segment.needs_flip = true;
                position = segment.start;
            }
        }
    }
}

pub struct ChainAssembler;

impl ChainAssembler {
    /// Partition segments into chains.
    ///
    /// The first unchained segment seeds each chain; the chain then grows
    /// from the seed's end and from its start by repeatedly taking the first
    /// unchained segment touching the current free endpoint. Chains come out
    /// in discovery order and with orientation already resolved.
    pub fn assemble(mut segments: Vec<IsoPlotSegment>) -> Vec<IsoPlotChain> {
        let mut by_endpoint: HashMap<GridPoint, Vec<usize>> = HashMap::new();
        for (i, segment) in segments.iter().enumerate() {
            by_endpoint.entry(segment.start).or_default().push(i);
            if segment.end != segment.start {
                by_endpoint.entry(segment.end).or_default().push(i);
            }
        }

        let next_unchained = |segments: &[IsoPlotSegment], p: GridPoint| -> Option<usize> {
            by_endpoint
                .get(&p)?
                .iter()
                .copied()
                .find(|&i| !segments[i].chained)
        };

        let mut orders: Vec<(Vec<usize>, GridPoint)> = Vec::new();
        for seed in 0..segments.len() {
            if segments[seed].chained {
                continue;
            }
            segments[seed].chained = true;

            let mut forward = Vec::new();
            let mut position = segments[seed].end;
            while let Some(i) = next_unchained(&segments, position) {
                segments[i].chained = true;
                position = segments[i].far_end(position);
                forward.push(i);
            }

            let mut backward = Vec::new();
            let mut position = segments[seed].start;
            while let Some(i) = next_unchained(&segments, position) {
                segments[i].chained = true;
                position = segments[i].far_end(position);
                backward.push(i);
            }

            let mut order: Vec<usize> = backward.into_iter().rev().collect();
            order.push(seed);
            order.extend(forward);
            orders.push((order, position));
        }

        let mut slots: Vec<Option<IsoPlotSegment>> = segments.into_iter().map(Some).collect();
        let chains: Vec<IsoPlotChain> = orders
            .into_iter()
            .map(|(order, origin)| {
                let mut chain = IsoPlotChain {
                    segments: order.iter().filter_map(|&i| slots[i].take()).collect(),
                    origin,
                };
                chain.resolve_orientation();
                chain
            })
            .collect();

        debug!(
            chains = chains.len(),
            closed = chains.iter().filter(|c| c.is_closed()).count(),
            "chain assembly complete"
        );
        chains
    }
}
