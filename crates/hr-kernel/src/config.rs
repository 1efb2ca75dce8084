use hr_core::AddressMode;
use serde::{Deserialize, Serialize};

use crate::dispatch::GroupSize;

/// How the four footprint texels are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendStrategy {
    /// Fixed 0.5 blend factors: the unweighted mean of the 2x2 block.
    #[default]
    Box,
    /// Blend factors are the fractional offsets of the texel-center mapping
    /// from destination into source space. Identical to `Box` when both
    /// source dimensions are even.
    Bilinear,
}

/// Destination size rule for odd source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtentPolicy {
    /// `(w / 2, h / 2)`; an odd last column/row is dropped.
    #[default]
    Floor,
    /// `(ceil(w / 2), ceil(h / 2))`; the last column/row reads past the edge
    /// through the address mode.
    Ceil,
}

impl ExtentPolicy {
    pub fn destination_extent(self, src_w: usize, src_h: usize) -> (usize, usize) {
        match self {
            Self::Floor => (src_w / 2, src_h / 2),
            Self::Ceil => (src_w.div_ceil(2), src_h.div_ceil(2)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Thread groups run on the rayon pool.
    #[default]
    Parallel,
    /// Thread groups run in order on the calling thread.
    Serial,
}

/// Configuration of one downsample dispatch.
///
/// Missing fields fall back to [`Default`], so a JSON config file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownsampleConfig {
    pub address: AddressMode,
    pub blend: BlendStrategy,
    pub extent: ExtentPolicy,
    pub group: GroupSize,
    pub execution: Execution,
}

#[cfg(test)]
mod tests {
    use hr_core::{AddressMode, Rgba};

    use super::{BlendStrategy, DownsampleConfig, Execution, ExtentPolicy};
    use crate::dispatch::GroupSize;

    #[test]
    fn default_config_is_box_clamp_floor_4x4() {
        let cfg = DownsampleConfig::default();
        assert_eq!(cfg.address, AddressMode::Clamp);
        assert_eq!(cfg.blend, BlendStrategy::Box);
        assert_eq!(cfg.extent, ExtentPolicy::Floor);
        assert_eq!(cfg.group, GroupSize { x: 4, y: 4 });
        assert_eq!(cfg.execution, Execution::Parallel);
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let cfg: DownsampleConfig = serde_json::from_str(
            r#"{
                "address": { "border": { "r": 0.0, "g": 0.0, "b": 1.0, "a": 1.0 } },
                "blend": "bilinear"
            }"#,
        )
        .expect("valid config json");

        assert_eq!(cfg.address, AddressMode::Border(Rgba::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(cfg.blend, BlendStrategy::Bilinear);
        assert_eq!(cfg.extent, ExtentPolicy::Floor);
        assert_eq!(cfg.group, GroupSize::DEFAULT);
    }

    #[test]
    fn extent_policies_on_odd_and_degenerate_sizes() {
        assert_eq!(ExtentPolicy::Floor.destination_extent(5, 3), (2, 1));
        assert_eq!(ExtentPolicy::Ceil.destination_extent(5, 3), (3, 2));
        assert_eq!(ExtentPolicy::Floor.destination_extent(1, 8), (0, 4));
        assert_eq!(ExtentPolicy::Ceil.destination_extent(1, 8), (1, 4));
        assert_eq!(ExtentPolicy::Ceil.destination_extent(0, 0), (0, 0));
    }
}
