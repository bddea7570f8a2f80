use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    #[default]
    Dry,
    Wet,
}

impl SeasonType {
    pub const ALL: [SeasonType; 2] = [SeasonType::Dry, SeasonType::Wet];

    pub fn label(self) -> &'static str {
        match self {
            SeasonType::Dry => "dry season",
            SeasonType::Wet => "wet season",
        }
    }

    pub fn ambient(self) -> AmbientParams {
        match self {
            SeasonType::Dry => DRY_AMBIENT,
            SeasonType::Wet => WET_AMBIENT,
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonType::Dry => write!(f, "dry"),
            SeasonType::Wet => write!(f, "wet"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown season '{0}', expected 'dry' or 'wet'")]
pub struct UnknownSeason(pub String);

impl FromStr for SeasonType {
    type Err = UnknownSeason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dry" | "dry season" => Ok(SeasonType::Dry),
            "wet" | "wet season" => Ok(SeasonType::Wet),
            other => Err(UnknownSeason(other.to_string())),
        }
    }
}

/// Lighting and weather constants applied to the whole scene for one season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmbientParams {
    pub light_intensity: f32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub fog_color: &'static str,
    pub sky_color: &'static str,
    pub precipitation_visible: bool,
}

const DRY_AMBIENT: AmbientParams = AmbientParams {
    light_intensity: 1.2,
    fog_near: 20.0,
    fog_far: 60.0,
    fog_color: "#f5deb3",
    sky_color: "#87ceeb",
    precipitation_visible: false,
};

const WET_AMBIENT: AmbientParams = AmbientParams {
    light_intensity: 0.6,
    fog_near: 8.0,
    fog_far: 35.0,
    fog_color: "#9ca3af",
    sky_color: "#64748b",
    precipitation_visible: true,
};
