use crate::{
    palette::{shade, to_hex, WaterAccessCategory},
    rng::LayerRng,
    scene::{RegionBlock, SceneContext, SceneDescription, SceneLayer},
};

/// One clickable block per region, raised and colored by its water access.
pub struct TerrainLayer;

impl TerrainLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerrainLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLayer for TerrainLayer {
    fn name(&self) -> &str {
        "terrain"
    }

    fn compose(&self, ctx: &SceneContext<'_>, scene: &mut SceneDescription, _rng: &mut LayerRng<'_>) {
        let season = ctx.state.season;
        let light = scene.ambient.light_intensity;
        scene.blocks = ctx
            .registry
            .iter()
            .map(|region| {
                let level = region.data(season).water_access_level;
                let category = WaterAccessCategory::categorize(level);
                RegionBlock {
                    id: region.id,
                    name: region.name.clone(),
                    x: region.x,
                    z: region.z,
                    width: region.width,
                    depth: region.depth,
                    height: ctx.settings.elevation.elevation(level),
                    category,
                    color: category.color_hex(),
                    shaded_color: to_hex(shade(category.rgb(), light)),
                    selected: ctx.state.selection == Some(region.id),
                }
            })
            .collect();
    }
}
