use crate::{
    rng::LayerRng,
    scene::{River, SceneContext, SceneDescription, SceneLayer},
    season::SeasonType,
};

const RIVER_PATH: [[f32; 2]; 7] = [
    [-16.0, -9.5],
    [-11.0, -8.2],
    [-6.0, -9.0],
    [-1.0, -8.1],
    [4.0, -8.9],
    [9.0, -8.0],
    [16.0, -9.2],
];

pub struct RiverLayer;

impl RiverLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiverLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLayer for RiverLayer {
    fn name(&self) -> &str {
        "river"
    }

    fn compose(&self, ctx: &SceneContext<'_>, scene: &mut SceneDescription, _rng: &mut LayerRng<'_>) {
        let (width, color) = match ctx.state.season {
            SeasonType::Dry => (0.8, "#4f9fd8"),
            SeasonType::Wet => (1.4, "#3b6e99"),
        };
        scene.river = Some(River {
            points: RIVER_PATH.to_vec(),
            width,
            color,
        });
    }
}
