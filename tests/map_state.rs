use yieldgap::{
    palette::{ElevationScale, WaterAccessCategory},
    reduce,
    state::PanelView,
    Action, RegionDataset, RegionId, RegionRegistry, SeasonType, VizState,
};

fn registry() -> RegionRegistry {
    RegionDataset::builtin().unwrap().into_registry()
}

fn displayed(state: &VizState, registry: &RegionRegistry) -> Vec<(RegionId, f32, f32, f32, f32)> {
    let scale = ElevationScale::default();
    state
        .overview(registry, &scale)
        .regions
        .into_iter()
        .map(|r| {
            let d = r.current_data;
            (r.id, d.water_access_level, d.precipitation, d.temperature, d.soil_moisture)
        })
        .collect()
}

#[test]
fn season_round_trip_restores_snapshot() {
    let registry = registry();
    let start = VizState::default();
    let before = displayed(&start, &registry);

    let wet = reduce(&start, Action::SelectSeason(SeasonType::Wet), &registry);
    assert_ne!(displayed(&wet, &registry), before);

    let dry = reduce(&wet, Action::SelectSeason(SeasonType::Dry), &registry);
    assert_eq!(dry, start);
    assert_eq!(displayed(&dry, &registry), before);
}

#[test]
fn reselecting_active_season_changes_nothing() {
    let registry = registry();
    let state = reduce(&VizState::default(), Action::SelectSeason(SeasonType::Wet), &registry);
    let again = reduce(&state, Action::SelectSeason(SeasonType::Wet), &registry);
    assert_eq!(again, state);
}

#[test]
fn second_selection_replaces_first_and_clear_empties() {
    let registry = registry();
    let scale = ElevationScale::default();
    let a = RegionId::new(1);
    let b = RegionId::new(5);

    let state = reduce(&VizState::default(), Action::SelectRegion(Some(a)), &registry);
    let state = reduce(&state, Action::SelectRegion(Some(b)), &registry);
    let selected = state.selected(&registry, &scale).unwrap();
    assert_eq!(selected.id, b);
    assert_eq!(selected.name, "Western Drylands");

    let cleared = reduce(&state, Action::SelectRegion(None), &registry);
    assert!(cleared.selected(&registry, &scale).is_none());
    let cleared = reduce(&state, Action::ClearSelection, &registry);
    assert!(cleared.selection.is_none());
}

#[test]
fn dry_season_click_shows_dry_snapshot() {
    let registry = registry();
    let scale = ElevationScale::default();
    let state = reduce(
        &VizState::default(),
        Action::SelectRegion(Some(RegionId::new(1))),
        &registry,
    );

    let detail = match state.view(&registry, &scale) {
        PanelView::Detail(detail) => detail,
        other => panic!("expected detail panel, got {other:?}"),
    };
    assert!(detail.recommendations.is_empty());
    let detail = detail.region;
    assert_eq!(detail.season, SeasonType::Dry);
    assert_eq!(detail.current_data.water_access_level, 85.0);
    assert_eq!(detail.category, WaterAccessCategory::Optimal);
    assert_eq!(detail.category_label, "optimal");
    assert_eq!(detail.current_data.precipitation, 18.0);
    assert_eq!(detail.current_data.temperature, 33.0);
    assert_eq!(detail.current_data.soil_moisture, 42.0);
}

#[test]
fn overview_lists_every_region_with_active_category() {
    let registry = registry();
    let scale = ElevationScale::default();
    let state = reduce(&VizState::default(), Action::SelectSeason(SeasonType::Wet), &registry);
    let overview = state.overview(&registry, &scale);
    assert_eq!(overview.season_label, "wet season");
    assert_eq!(overview.regions.len(), registry.len());
    let drylands = &overview.regions[4];
    assert_eq!(drylands.category, WaterAccessCategory::Deficient);
}

fn close(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 1e-4
}

#[test]
fn dry_overview_metrics_match_builtin_table() {
    let registry = registry();
    let overview = VizState::default().overview(&registry, &ElevationScale::default());
    // 85 + 64 + 45 + 32 + 12 + 24
    assert!(close(overview.average_water_access, 262.0 / 6.0));
    assert_eq!(overview.deficit_regions, 3);
    assert!(close(overview.deficit_share, 0.5));

    let counts: Vec<(WaterAccessCategory, usize)> = overview
        .distribution
        .iter()
        .map(|entry| (entry.category, entry.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            (WaterAccessCategory::Optimal, 1),
            (WaterAccessCategory::Good, 1),
            (WaterAccessCategory::Moderate, 1),
            (WaterAccessCategory::Deficient, 2),
            (WaterAccessCategory::Critical, 1),
        ]
    );
}

#[test]
fn wet_overview_metrics_match_builtin_table() {
    let registry = registry();
    let state = reduce(&VizState::default(), Action::SelectSeason(SeasonType::Wet), &registry);
    let overview = state.overview(&registry, &ElevationScale::default());
    // 95 + 90 + 68 + 57 + 38 + 81
    assert!(close(overview.average_water_access, 71.5));
    assert_eq!(overview.deficit_regions, 1);
    assert!(close(overview.deficit_share, 1.0 / 6.0));

    let counts: Vec<usize> = overview.distribution.iter().map(|entry| entry.count).collect();
    assert_eq!(counts, vec![3, 1, 1, 1, 0]);
    assert_eq!(counts.iter().sum::<usize>(), registry.len());
}

#[test]
fn critical_region_gets_full_recommendation_list() {
    let registry = registry();
    let scale = ElevationScale::default();
    let state = reduce(
        &VizState::default(),
        Action::SelectRegion(Some(RegionId::new(5))),
        &registry,
    );
    let detail = match state.view(&registry, &scale) {
        PanelView::Detail(detail) => detail,
        other => panic!("expected detail panel, got {other:?}"),
    };
    assert_eq!(detail.region.category, WaterAccessCategory::Critical);
    assert_eq!(detail.recommendations.len(), 4);

    let wet = reduce(&state, Action::SelectSeason(SeasonType::Wet), &registry);
    match wet.view(&registry, &scale) {
        PanelView::Detail(detail) => assert_eq!(detail.recommendations.len(), 3),
        other => panic!("expected detail panel, got {other:?}"),
    }
}
