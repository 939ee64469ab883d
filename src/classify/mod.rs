pub mod band;
pub mod color;

pub use band::Band;
pub use color::{band_color, gradient, ColorPolicy, Rgb};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub band: Band,
    pub color: Rgb,
}

/// Band and color of an occupancy percentage under `policy`.
pub fn classify(percentage: i64, policy: ColorPolicy) -> Classification {
    Classification {
        band: Band::of(percentage),
        color: policy.color(percentage),
    }
}
