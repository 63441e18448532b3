use crate::error::{IsoPlotError, IsoPlotResult};
use crate::registry::DEFAULT_MAX_PRIMITIVE_ID;
use serde::{Deserialize, Serialize};

/// Tab settings for edge milling, in raster units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeMillOptions {
    /// Number of tabs to leave on the outside chain. Zero disables tabs.
    pub tab_count: u32,
    /// Length of each tab along its segment.
    pub tab_width: u32,
}

impl Default for EdgeMillOptions {
    fn default() -> Self {
        Self {
            tab_count: 0,
            tab_width: 20,
        }
    }
}

impl EdgeMillOptions {
    /// Segments shorter than this never receive a tab.
    pub fn min_segment_length(&self) -> f64 {
        3.0 * f64::from(self.tab_width)
    }
}

/// Options for one isolation plot run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoPlotOptions {
    /// Largest primitive ID the registry will hand out.
    pub max_primitive_id: u32,
    pub edge_mill: EdgeMillOptions,
}

impl Default for IsoPlotOptions {
    fn default() -> Self {
        Self {
            max_primitive_id: DEFAULT_MAX_PRIMITIVE_ID,
            edge_mill: EdgeMillOptions::default(),
        }
    }
}

impl IsoPlotOptions {
    pub fn validate(&self) -> IsoPlotResult<()> {
        if self.max_primitive_id == 0 {
            return Err(IsoPlotError::InvalidOptions {
                name: "max_primitive_id".to_string(),
                reason: "must allow at least one primitive".to_string(),
            });
        }
        if self.edge_mill.tab_count > 0 && self.edge_mill.tab_width == 0 {
            return Err(IsoPlotError::InvalidOptions {
                name: "edge_mill.tab_width".to_string(),
                reason: "must be positive when tabs are requested".to_string(),
            });
        }
        Ok(())
    }
}
