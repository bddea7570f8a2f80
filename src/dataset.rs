use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::region::{Region, RegionId, RegionRegistry, SeasonData};

const BUILTIN_DATASET: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/datasets/cotton_belt.yaml"
));

#[derive(Debug, Clone, Deserialize)]
pub struct RegionDataset {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub regions: Vec<Region>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset must define at least one region")]
    Empty,
    #[error("region id {0} defined more than once")]
    DuplicateId(u32),
    #[error("region id {0} has no name")]
    MissingName(u32),
    #[error("region '{name}' has a non-positive footprint ({width} x {depth})")]
    InvalidFootprint { name: String, width: f32, depth: f32 },
    #[error("region '{name}' {field} must be within 0..=100, got {value}")]
    OutOfRange {
        name: String,
        field: String,
        value: f32,
    },
    #[error("region '{name}' {field} is not a finite number")]
    NotFinite { name: String, field: String },
}

impl RegionDataset {
    /// The mock table compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_DATASET).context("Failed to parse builtin dataset")
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let dataset: RegionDataset = serde_yaml::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.regions.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut known_ids = HashSet::new();
        for region in &self.regions {
            if !known_ids.insert(region.id) {
                return Err(DatasetError::DuplicateId(region.id.raw()));
            }
            if region.name.trim().is_empty() {
                return Err(DatasetError::MissingName(region.id.raw()));
            }
            for (field, value) in [
                ("x", region.x),
                ("z", region.z),
                ("width", region.width),
                ("depth", region.depth),
            ] {
                ensure_finite(&region.name, field, value)?;
            }
            if region.width <= 0.0 || region.depth <= 0.0 {
                return Err(DatasetError::InvalidFootprint {
                    name: region.name.clone(),
                    width: region.width,
                    depth: region.depth,
                });
            }
            validate_reading(&region.name, "dry", &region.dry)?;
            validate_reading(&region.name, "wet", &region.wet)?;
        }

        Ok(())
    }

    /// Pairs of regions whose footprints intersect. Overlap is tolerated, not rejected.
    pub fn overlapping_pairs(&self) -> Vec<(RegionId, RegionId)> {
        let mut pairs = Vec::new();
        for (index, a) in self.regions.iter().enumerate() {
            for b in &self.regions[index + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    pub fn into_registry(self) -> RegionRegistry {
        for (a, b) in self.overlapping_pairs() {
            warn!(
                dataset = %self.name,
                first = a.raw(),
                second = b.raw(),
                "region footprints overlap"
            );
        }
        debug!(dataset = %self.name, regions = self.regions.len(), "region registry built");
        RegionRegistry::new(self.regions)
    }
}

fn validate_reading(name: &str, season: &str, data: &SeasonData) -> Result<(), DatasetError> {
    for (field, value) in [
        ("precipitation", data.precipitation),
        ("temperature", data.temperature),
    ] {
        ensure_finite(name, format!("{season}.{field}"), value)?;
    }
    for (field, value) in [
        ("water_access_level", data.water_access_level),
        ("soil_moisture", data.soil_moisture),
    ] {
        let field = format!("{season}.{field}");
        ensure_finite(name, field.clone(), value)?;
        if !(0.0..=100.0).contains(&value) {
            return Err(DatasetError::OutOfRange {
                name: name.to_string(),
                field,
                value,
            });
        }
    }
    Ok(())
}

fn ensure_finite(name: &str, field: impl Into<String>, value: f32) -> Result<(), DatasetError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DatasetError::NotFinite {
            name: name.to_string(),
            field: field.into(),
        })
    }
}

pub struct DatasetLoader {
    base_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<RegionDataset> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
        RegionDataset::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dataset_is_valid_and_disjoint() {
        let dataset = RegionDataset::builtin().unwrap();
        assert_eq!(dataset.name, "cotton_belt");
        assert_eq!(dataset.regions.len(), 6);
        assert!(dataset.overlapping_pairs().is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut dataset = RegionDataset::builtin().unwrap();
        let copy = dataset.regions[0].clone();
        dataset.regions.push(copy);
        assert_eq!(dataset.validate(), Err(DatasetError::DuplicateId(1)));
    }

    #[test]
    fn rejects_levels_outside_score_range() {
        let mut dataset = RegionDataset::builtin().unwrap();
        dataset.regions[1].wet.soil_moisture = 101.0;
        match dataset.validate() {
            Err(DatasetError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, "wet.soil_moisture");
                assert_eq!(value, 101.0);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn tolerates_overlap_but_reports_it() {
        let mut dataset = RegionDataset::builtin().unwrap();
        dataset.regions[1].x = -6.0;
        assert!(dataset.validate().is_ok());
        assert_eq!(
            dataset.overlapping_pairs(),
            vec![(RegionId::new(1), RegionId::new(2))]
        );
    }

    #[test]
    fn rejects_empty_table() {
        let err = RegionDataset::from_yaml_str("name: empty\nregions: []\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::Empty)
        );
    }
}
