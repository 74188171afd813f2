//! Area configuration
//!
//! Hosts usually keep this next to their editor settings and hand it to
//! [`NodeArea::new`](crate::node_area::NodeArea::new).

use serde::{Deserialize, Serialize};

use crate::area::AreaTransform;
use crate::error::Result;

/// Allowed zoom range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    /// Clamp a zoom factor into the bounds
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.1, max: 10.0 }
    }
}

/// Configuration for a [`NodeArea`](crate::node_area::NodeArea)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaConfig {
    pub zoom: ZoomBounds,
    /// Transform applied when the area is created
    pub initial_transform: AreaTransform,
    /// Move a node's element to the top of the surface when it is picked
    pub bring_to_front_on_pick: bool,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomBounds::default(),
            initial_transform: AreaTransform::default(),
            bring_to_front_on_pick: true,
        }
    }
}

impl AreaConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AreaConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Swap inverted zoom bounds and clamp the initial zoom into them
    pub fn normalized(mut self) -> Self {
        if self.zoom.min > self.zoom.max {
            std::mem::swap(&mut self.zoom.min, &mut self.zoom.max);
        }
        self.initial_transform.k = self.zoom.clamp(self.initial_transform.k);
        self
    }
}
