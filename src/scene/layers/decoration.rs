use rand::Rng;

use crate::{
    rng::LayerRng,
    scene::{Mountain, SceneContext, SceneDescription, SceneLayer, Structure, StructureKind, Tree},
    season::SeasonType,
};

const MOUNTAINS: [(f32, f32, f32, f32); 5] = [
    (-13.0, -13.5, 3.0, 5.5),
    (-6.5, -14.0, 2.5, 4.0),
    (0.5, -13.8, 3.4, 6.5),
    (7.0, -14.2, 2.2, 3.6),
    (12.5, -13.4, 3.0, 5.0),
];

const STRUCTURES: [(StructureKind, f32, f32, f32); 5] = [
    (StructureKind::Farmhouse, -11.5, 9.0, 0.0),
    (StructureKind::Silo, -9.8, 9.4, 0.0),
    (StructureKind::Gin, -1.0, 9.6, 1.57),
    (StructureKind::Farmhouse, 8.5, 9.2, 3.14),
    (StructureKind::Silo, 10.4, 9.0, 0.0),
];

const SNOW_LINE: f32 = 5.0;
const PLACEMENT_ATTEMPTS: usize = 20;

/// Mountains, farm buildings and scattered trees around the region grid.
/// Trees never land on a region footprint.
pub struct DecorationLayer;

impl DecorationLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DecorationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLayer for DecorationLayer {
    fn name(&self) -> &str {
        "decoration"
    }

    fn compose(&self, ctx: &SceneContext<'_>, scene: &mut SceneDescription, rng: &mut LayerRng<'_>) {
        scene.mountains = MOUNTAINS
            .iter()
            .map(|&(x, z, radius, height)| Mountain {
                x,
                z,
                radius,
                height,
                snow_cap: height > SNOW_LINE,
            })
            .collect();

        scene.structures = STRUCTURES
            .iter()
            .map(|&(kind, x, z, rotation)| Structure { kind, x, z, rotation })
            .collect();

        let foliage = match ctx.state.season {
            SeasonType::Dry => 0.9,
            SeasonType::Wet => 1.1,
        };
        let half = scene.ground_half_extent - 1.0;
        let target = ctx.settings.tree_count;
        let mut trees = Vec::with_capacity(target);
        for _ in 0..target * PLACEMENT_ATTEMPTS {
            if trees.len() == target {
                break;
            }
            let x: f32 = rng.gen_range(-half..half);
            let z: f32 = rng.gen_range(-half..half);
            let scale: f32 = rng.gen_range(0.6..1.2);
            if ctx.registry.covers(x, z) {
                continue;
            }
            trees.push(Tree {
                x,
                z,
                scale: scale * foliage,
            });
        }
        scene.trees = trees;
    }
}
