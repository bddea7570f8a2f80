//! Water management recommendations shown for regions below good access.

use serde::Serialize;

/// Regions at or above this water access level get no recommendations.
pub const RECOMMENDATION_THRESHOLD: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub detail: &'static str,
    /// Shown when the level is strictly below this value.
    #[serde(skip)]
    below: f32,
}

const CATALOG: &[Recommendation] = &[
    Recommendation {
        title: "Irrigation scheduling",
        detail: "Use soil moisture sensors, weather stations and water balance models to decide when and how much to irrigate at each crop stage.",
        below: RECOMMENDATION_THRESHOLD,
    },
    Recommendation {
        title: "Soil cover and no-till",
        detail: "Keep the soil covered with straw and adopt no-till with crop rotation so the root zone holds more of the water it receives.",
        below: RECOMMENDATION_THRESHOLD,
    },
    Recommendation {
        title: "Precision irrigation systems",
        detail: "Install drip lines or a center pivot with low energy precision application for a more uniform and efficient water supply.",
        below: 40.0,
    },
    Recommendation {
        title: "Controlled deficit irrigation",
        detail: "Concentrate the available water on flowering and boll filling, and apply less during the stages that tolerate stress.",
        below: 20.0,
    },
];

/// Recommendations for a water access level, most general first.
pub fn recommendations(level: f32) -> Vec<Recommendation> {
    if level.is_nan() {
        return Vec::new();
    }
    CATALOG
        .iter()
        .filter(|recommendation| level < recommendation.below)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_access_needs_no_advice() {
        assert!(recommendations(60.0).is_empty());
        assert!(recommendations(85.0).is_empty());
        assert!(!recommendations(59.0).is_empty());
    }

    #[test]
    fn advice_grows_with_the_deficit() {
        assert_eq!(recommendations(45.0).len(), 2);
        assert_eq!(recommendations(39.0).len(), 3);
        let critical = recommendations(12.0);
        assert_eq!(critical.len(), 4);
        assert_eq!(critical[0].title, "Irrigation scheduling");
    }

    #[test]
    fn serializes_without_threshold() {
        let json = serde_json::to_value(recommendations(10.0)[0]).unwrap();
        assert_eq!(json["title"], "Irrigation scheduling");
        assert!(json.get("below").is_none());
    }
}
