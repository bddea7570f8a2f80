use rand::Rng;

use crate::{
    rng::LayerRng,
    scene::{Precipitation, SceneContext, SceneDescription, SceneLayer},
};

const RAIN_DROPS: usize = 240;
const RAIN_CEILING: f32 = 14.0;

/// Rain particles for seasons whose ambient parameters call for them.
pub struct AmbientLayer;

impl AmbientLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmbientLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLayer for AmbientLayer {
    fn name(&self) -> &str {
        "ambient"
    }

    fn compose(&self, _ctx: &SceneContext<'_>, scene: &mut SceneDescription, rng: &mut LayerRng<'_>) {
        if !scene.ambient.precipitation_visible {
            scene.precipitation = None;
            return;
        }
        let half = scene.ground_half_extent;
        let drops = (0..RAIN_DROPS)
            .map(|_| {
                [
                    rng.gen_range(-half..half),
                    rng.gen_range(1.0..RAIN_CEILING),
                    rng.gen_range(-half..half),
                ]
            })
            .collect();
        scene.precipitation = Some(Precipitation {
            drops,
            fall_speed: 9.0,
        });
    }
}
