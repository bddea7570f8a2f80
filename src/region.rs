use serde::{Deserialize, Serialize};

use crate::season::SeasonType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(u32);

impl RegionId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One seasonal reading for a region. Levels are 0..=100 scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonData {
    pub water_access_level: f32,
    pub precipitation: f32,
    pub temperature: f32,
    pub soil_moisture: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub dry: SeasonData,
    pub wet: SeasonData,
}

impl Region {
    pub fn data(&self, season: SeasonType) -> &SeasonData {
        match season {
            SeasonType::Dry => &self.dry,
            SeasonType::Wet => &self.wet,
        }
    }

    /// Footprints are centred on `(x, z)`. Touching edges do not count.
    pub fn overlaps(&self, other: &Region) -> bool {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        dx < (self.width + other.width) / 2.0 && dz < (self.depth + other.depth) / 2.0
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        (x - self.x).abs() <= self.width / 2.0 && (z - self.z).abs() <= self.depth / 2.0
    }
}

/// Ordered, read-only table of regions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

impl RegionRegistry {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Any point of the ground plane covered by a region footprint.
    pub fn covers(&self, x: f32, z: f32) -> bool {
        self.regions.iter().any(|region| region.contains(x, z))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample(id: u32, x: f32, z: f32, dry_level: f32, wet_level: f32) -> Region {
        Region {
            id: RegionId::new(id),
            name: format!("Region {id}"),
            x,
            z,
            width: 4.0,
            depth: 4.0,
            dry: SeasonData {
                water_access_level: dry_level,
                precipitation: 12.0,
                temperature: 34.0,
                soil_moisture: 18.0,
            },
            wet: SeasonData {
                water_access_level: wet_level,
                precipitation: 210.0,
                temperature: 27.0,
                soil_moisture: 64.0,
            },
        }
    }

    #[test]
    fn data_follows_season() {
        let region = sample(1, 0.0, 0.0, 30.0, 75.0);
        assert_eq!(region.data(SeasonType::Dry).water_access_level, 30.0);
        assert_eq!(region.data(SeasonType::Wet).water_access_level, 75.0);
    }

    #[test]
    fn adjacent_footprints_do_not_overlap() {
        let a = sample(1, 0.0, 0.0, 50.0, 50.0);
        let b = sample(2, 4.0, 0.0, 50.0, 50.0);
        let c = sample(3, 3.0, 1.0, 50.0, 50.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn registry_preserves_table_order() {
        let registry = RegionRegistry::new(vec![
            sample(7, 0.0, 0.0, 10.0, 20.0),
            sample(3, 5.0, 0.0, 10.0, 20.0),
        ]);
        let ids: Vec<u32> = registry.iter().map(|r| r.id.raw()).collect();
        assert_eq!(ids, vec![7, 3]);
        assert!(registry.contains(RegionId::new(3)));
        assert!(registry.get(RegionId::new(4)).is_none());
        assert!(registry.covers(5.5, 1.0));
        assert!(!registry.covers(20.0, 20.0));
    }
}
