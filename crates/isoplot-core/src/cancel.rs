//! Cooperative cancellation for the long-running passes.

use crate::error::{IsoPlotError, IsoPlotResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Optional shared flag polled between primitives and between grid rows.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Option<Arc<AtomicBool>>,
}

impl Cancellation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag: Some(flag) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn check(&self) -> IsoPlotResult<()> {
        if self.is_cancelled() {
            Err(IsoPlotError::Cancelled)
        } else {
            Ok(())
        }
    }
}
