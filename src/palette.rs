//! Maps a region's water access score onto display color and block height.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterAccessCategory {
    Optimal,
    Good,
    Moderate,
    Deficient,
    Critical,
}

impl WaterAccessCategory {
    /// Best to worst, the order the legend lists them.
    pub const ALL: [WaterAccessCategory; 5] = [
        WaterAccessCategory::Optimal,
        WaterAccessCategory::Good,
        WaterAccessCategory::Moderate,
        WaterAccessCategory::Deficient,
        WaterAccessCategory::Critical,
    ];

    /// Thresholds are checked from the top down; anything under 20 is critical.
    pub fn categorize(level: f32) -> Self {
        let level = clamp_level(level);
        if level >= 80.0 {
            WaterAccessCategory::Optimal
        } else if level >= 60.0 {
            WaterAccessCategory::Good
        } else if level >= 40.0 {
            WaterAccessCategory::Moderate
        } else if level >= 20.0 {
            WaterAccessCategory::Deficient
        } else {
            WaterAccessCategory::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaterAccessCategory::Optimal => "optimal",
            WaterAccessCategory::Good => "good",
            WaterAccessCategory::Moderate => "moderate",
            WaterAccessCategory::Deficient => "deficient",
            WaterAccessCategory::Critical => "critical",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            WaterAccessCategory::Optimal => "#22c55e",
            WaterAccessCategory::Good => "#3b82f6",
            WaterAccessCategory::Moderate => "#eab308",
            WaterAccessCategory::Deficient => "#f97316",
            WaterAccessCategory::Critical => "#ef4444",
        }
    }

    /// Inclusive lower bound, exclusive upper bound (except 100 for optimal).
    pub fn range_label(self) -> &'static str {
        match self {
            WaterAccessCategory::Optimal => "80-100",
            WaterAccessCategory::Good => "60-80",
            WaterAccessCategory::Moderate => "40-60",
            WaterAccessCategory::Deficient => "20-40",
            WaterAccessCategory::Critical => "0-20",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            WaterAccessCategory::Optimal => [0x22, 0xc5, 0x5e],
            WaterAccessCategory::Good => [0x3b, 0x82, 0xf6],
            WaterAccessCategory::Moderate => [0xea, 0xb3, 0x08],
            WaterAccessCategory::Deficient => [0xf9, 0x73, 0x16],
            WaterAccessCategory::Critical => [0xef, 0x44, 0x44],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub category: WaterAccessCategory,
    pub label: &'static str,
    pub range: &'static str,
    pub color: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    WaterAccessCategory::ALL
        .iter()
        .map(|category| LegendEntry {
            category: *category,
            label: category.label(),
            range: category.range_label(),
            color: category.color_hex(),
        })
        .collect()
}

/// Linear height mapping: `base_offset + level / 100 * scale_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationScale {
    pub base_offset: f32,
    pub scale_factor: f32,
}

impl Default for ElevationScale {
    fn default() -> Self {
        Self {
            base_offset: 0.2,
            scale_factor: 0.5,
        }
    }
}

impl ElevationScale {
    pub fn elevation(&self, level: f32) -> f32 {
        self.base_offset + (clamp_level(level) / 100.0) * self.scale_factor
    }
}

/// Scale an RGB triple by a light factor, saturating at 255.
pub fn shade(rgb: [u8; 3], light: f32) -> [u8; 3] {
    let light = light.max(0.0);
    rgb.map(|channel| (channel as f32 * light).round().clamp(0.0, 255.0) as u8)
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 100.0)
    }
}
