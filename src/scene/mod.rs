//! Builds a backend-agnostic description of the 3D map from the current
//! state. A [`SceneComposer`] runs its layers in order over an empty
//! [`SceneDescription`]; the result depends only on the seed, the registry and
//! the [`VizState`].

pub mod layers;

use serde::Serialize;

use crate::{
    palette::{ElevationScale, WaterAccessCategory},
    region::{RegionId, RegionRegistry},
    rng::{LayerRng, RngManager},
    season::{AmbientParams, SeasonType},
    state::VizState,
};

pub use layers::{AmbientLayer, DecorationLayer, RiverLayer, TerrainLayer};

/// Half the side length of the square ground plane.
pub const GROUND_HALF_EXTENT: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct SceneSettings {
    pub seed: u64,
    pub elevation: ElevationScale,
    pub tree_count: usize,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            elevation: ElevationScale::default(),
            tree_count: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionBlock {
    pub id: RegionId,
    pub name: String,
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub category: WaterAccessCategory,
    pub color: &'static str,
    pub shaded_color: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct River {
    pub points: Vec<[f32; 2]>,
    pub width: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mountain {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub height: f32,
    pub snow_cap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Farmhouse,
    Silo,
    Gin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub x: f32,
    pub z: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub x: f32,
    pub z: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Precipitation {
    pub drops: Vec<[f32; 3]>,
    pub fall_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDescription {
    pub season: SeasonType,
    pub ambient: AmbientParams,
    pub ground_half_extent: f32,
    pub precipitation: Option<Precipitation>,
    pub blocks: Vec<RegionBlock>,
    pub river: Option<River>,
    pub mountains: Vec<Mountain>,
    pub structures: Vec<Structure>,
    pub trees: Vec<Tree>,
}

impl SceneDescription {
    pub fn empty(season: SeasonType) -> Self {
        Self {
            season,
            ambient: season.ambient(),
            ground_half_extent: GROUND_HALF_EXTENT,
            precipitation: None,
            blocks: Vec::new(),
            river: None,
            mountains: Vec::new(),
            structures: Vec::new(),
            trees: Vec::new(),
        }
    }
}

pub struct SceneContext<'a> {
    pub state: &'a VizState,
    pub registry: &'a RegionRegistry,
    pub settings: &'a SceneSettings,
}

pub trait SceneLayer: Send + Sync {
    fn name(&self) -> &str;
    fn compose(&self, ctx: &SceneContext<'_>, scene: &mut SceneDescription, rng: &mut LayerRng<'_>);
}

pub struct SceneBuilder {
    settings: SceneSettings,
    layers: Vec<Box<dyn SceneLayer>>,
}

impl SceneBuilder {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: impl SceneLayer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn build(self) -> SceneComposer {
        SceneComposer {
            settings: self.settings,
            layers: self.layers,
        }
    }
}

pub struct SceneComposer {
    settings: SceneSettings,
    layers: Vec<Box<dyn SceneLayer>>,
}

impl SceneComposer {
    /// Every layer the map uses, in draw order.
    pub fn standard(settings: SceneSettings) -> Self {
        SceneBuilder::new(settings)
            .with_layer(AmbientLayer::new())
            .with_layer(RiverLayer::new())
            .with_layer(DecorationLayer::new())
            .with_layer(TerrainLayer::new())
            .build()
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn compose(&self, state: &VizState, registry: &RegionRegistry) -> SceneDescription {
        let mut rng = RngManager::new(self.settings.seed);
        let mut scene = SceneDescription::empty(state.season);
        let ctx = SceneContext {
            state,
            registry,
            settings: &self.settings,
        };
        for layer in &self.layers {
            let mut stream = rng.stream(layer.name());
            layer.compose(&ctx, &mut scene, &mut stream);
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::tests::sample;

    struct Marker;

    impl SceneLayer for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn compose(&self, _ctx: &SceneContext<'_>, scene: &mut SceneDescription, _rng: &mut LayerRng<'_>) {
            for block in &mut scene.blocks {
                block.selected = true;
            }
        }
    }

    #[test]
    fn layers_run_in_registration_order() {
        let registry = RegionRegistry::new(vec![sample(1, 0.0, 0.0, 50.0, 70.0)]);
        let state = VizState::default();

        let marked_after = SceneBuilder::new(SceneSettings::default())
            .with_layer(TerrainLayer::new())
            .with_layer(Marker)
            .build()
            .compose(&state, &registry);
        assert!(marked_after.blocks[0].selected);

        let overwritten = SceneBuilder::new(SceneSettings::default())
            .with_layer(Marker)
            .with_layer(TerrainLayer::new())
            .build()
            .compose(&state, &registry);
        assert!(!overwritten.blocks[0].selected);
    }

    #[test]
    fn empty_builder_yields_bare_scene() {
        let registry = RegionRegistry::default();
        let scene = SceneBuilder::new(SceneSettings::default())
            .build()
            .compose(&VizState::default(), &registry);
        assert_eq!(scene, SceneDescription::empty(SeasonType::Dry));
    }
}
