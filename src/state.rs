//! Season and selection state for the region map.
//!
//! State is an immutable value; every user event goes through [`reduce`] and
//! produces the next value. Views for the overview and detail panels are
//! derived from the state and the registry on read, so they always reflect
//! the active season.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    advice::{recommendations, Recommendation},
    palette::{ElevationScale, WaterAccessCategory},
    region::{Region, RegionId, RegionRegistry, SeasonData},
    season::SeasonType,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VizState {
    pub season: SeasonType,
    pub selection: Option<RegionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectSeason(SeasonType),
    SelectRegion(Option<RegionId>),
    ClearSelection,
}

pub fn reduce(state: &VizState, action: Action, registry: &RegionRegistry) -> VizState {
    match action {
        Action::SelectSeason(season) if season == state.season => *state,
        Action::SelectSeason(season) => {
            debug!(from = %state.season, to = %season, "season changed");
            VizState { season, ..*state }
        }
        Action::SelectRegion(Some(id)) if !registry.contains(id) => {
            warn!(region = id.raw(), "ignoring selection of unknown region");
            *state
        }
        Action::SelectRegion(Some(id)) => {
            debug!(region = id.raw(), "region selected");
            VizState {
                selection: Some(id),
                ..*state
            }
        }
        Action::SelectRegion(None) | Action::ClearSelection => VizState {
            selection: None,
            ..*state
        },
    }
}

/// A region merged with the data snapshot of the active season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRegion {
    pub id: RegionId,
    pub name: String,
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub season: SeasonType,
    pub current_data: SeasonData,
    pub category: WaterAccessCategory,
    pub category_label: &'static str,
    pub color: &'static str,
    pub elevation: f32,
}

impl SelectedRegion {
    pub fn from_region(region: &Region, season: SeasonType, scale: &ElevationScale) -> Self {
        let current_data = *region.data(season);
        let category = WaterAccessCategory::categorize(current_data.water_access_level);
        Self {
            id: region.id,
            name: region.name.clone(),
            x: region.x,
            z: region.z,
            width: region.width,
            depth: region.depth,
            season,
            current_data,
            category,
            category_label: category.label(),
            color: category.color_hex(),
            elevation: scale.elevation(current_data.water_access_level),
        }
    }
}

/// Regions under this water access level count as in deficit.
pub const DEFICIT_THRESHOLD: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: WaterAccessCategory,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub season: SeasonType,
    pub season_label: &'static str,
    pub regions: Vec<SelectedRegion>,
    /// Mean water access over all regions; 0 for an empty table.
    pub average_water_access: f32,
    pub deficit_regions: usize,
    /// Fraction (0..=1) of regions under [`DEFICIT_THRESHOLD`].
    pub deficit_share: f32,
    /// One entry per category, best first, including empty ones.
    pub distribution: Vec<CategoryCount>,
}

impl OverviewView {
    fn new(season: SeasonType, regions: Vec<SelectedRegion>) -> Self {
        let total = regions.len();
        let levels = regions.iter().map(|r| r.current_data.water_access_level);
        let deficit_regions = levels.clone().filter(|level| *level < DEFICIT_THRESHOLD).count();
        let (average_water_access, deficit_share) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                levels.sum::<f32>() / total as f32,
                deficit_regions as f32 / total as f32,
            )
        };
        let distribution = WaterAccessCategory::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                label: category.label(),
                color: category.color_hex(),
                count: regions.iter().filter(|r| r.category == *category).count(),
            })
            .collect();

        Self {
            season,
            season_label: season.label(),
            regions,
            average_water_access,
            deficit_regions,
            deficit_share,
            distribution,
        }
    }
}

/// The selected region plus what to do about its water access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    #[serde(flatten)]
    pub region: SelectedRegion,
    pub recommendations: Vec<Recommendation>,
}

impl From<SelectedRegion> for DetailView {
    fn from(region: SelectedRegion) -> Self {
        let recommendations = recommendations(region.current_data.water_access_level);
        Self {
            region,
            recommendations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "lowercase")]
pub enum PanelView {
    Overview(OverviewView),
    Detail(DetailView),
}

impl VizState {
    pub fn selected(&self, registry: &RegionRegistry, scale: &ElevationScale) -> Option<SelectedRegion> {
        self.selection
            .and_then(|id| registry.get(id))
            .map(|region| SelectedRegion::from_region(region, self.season, scale))
    }

    pub fn overview(&self, registry: &RegionRegistry, scale: &ElevationScale) -> OverviewView {
        let regions = registry
            .iter()
            .map(|region| SelectedRegion::from_region(region, self.season, scale))
            .collect();
        OverviewView::new(self.season, regions)
    }

    /// Detail view replaces the overview while a region is selected.
    pub fn view(&self, registry: &RegionRegistry, scale: &ElevationScale) -> PanelView {
        match self.selected(registry, scale) {
            Some(detail) => PanelView::Detail(detail.into()),
            None => PanelView::Overview(self.overview(registry, scale)),
        }
    }
}
