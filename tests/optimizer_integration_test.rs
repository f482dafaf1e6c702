// ==========================================
// 优化器集成测试
// ==========================================
// 覆盖: 全年各月最小化可行性 / 季节边界 / 差分进化与局部搜索对比
// ==========================================

use salt_waste_twin::config::{CompositionParams, OptimizerConfig, ScoreWeights};
use salt_waste_twin::{
    CalibratedPredictor, CalibrationFactor, FeatureName, OptimizationMethod, OptimizeOptions,
    Season, SeasonalConstraintProvider, WasteCategory, WasteOptimizer,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn create_optimizer(config: OptimizerConfig) -> WasteOptimizer {
    let predictor = CalibratedPredictor::new(
        ScoreWeights::default(),
        CompositionParams::default(),
        CalibrationFactor::new(0.04),
    );
    WasteOptimizer::new(Arc::new(predictor), config)
}

#[test]
fn test_minimize_is_feasible_for_every_month() {
    let optimizer = create_optimizer(OptimizerConfig::default());
    let provider = SeasonalConstraintProvider::new();

    for month in 1..=12u32 {
        let result = optimizer.optimize_minimize_waste(month, &OptimizeOptions::default());
        let bounds = provider.get_seasonal_bounds(month);

        assert_eq!(result.optimal_features.month, month);
        assert!(bounds.contains(&result.optimal_features), "month {}: {:?}", month, result.optimal_features);
        assert!(result.objective_value.is_finite());
        assert!(result.objective_value >= 0.0);
    }
}

#[test]
fn test_seasonal_bounds_nest_inside_global_bounds() {
    let provider = SeasonalConstraintProvider::new();
    for season in Season::ALL {
        for &month in season.months() {
            assert_eq!(provider.season_for(month), Some(season));
            let seasonal = provider.get_seasonal_bounds(month);
            for name in FeatureName::ORDER {
                if name == FeatureName::Month {
                    assert_eq!(seasonal.get(name), Some((month as f64, month as f64)));
                    continue;
                }
                let (lo, hi) = seasonal.get(name).unwrap();
                let (glo, ghi) = provider.get_bounds().get(name).unwrap();
                assert!(glo <= lo && lo <= hi && hi <= ghi, "{:?} in {}", name, season);
            }
        }
    }
}

#[test]
fn test_differential_evolution_matches_local_on_monotone_objective() {
    // 总量百分比对降雨与气温单调, 两种方法应落在同一角点附近
    let optimizer = create_optimizer(OptimizerConfig::default());
    let local = optimizer.optimize_minimize_waste(11, &OptimizeOptions::default());
    let global = optimizer.optimize_minimize_waste(
        11,
        &OptimizeOptions {
            method: OptimizationMethod::DifferentialEvolution,
            ..OptimizeOptions::default()
        },
    );

    assert_eq!(global.method, "differential_evolution");
    assert!(
        global.objective_value <= local.objective_value * 1.05,
        "global {} local {}",
        global.objective_value,
        local.objective_value
    );
    assert!(optimizer
        .constraints()
        .get_seasonal_bounds(11)
        .contains(&global.optimal_features));
}

#[test]
fn test_sequential_and_parallel_target_runs_agree() {
    let mut targets = BTreeMap::new();
    targets.insert(WasteCategory::TotalWaste, 2.0);
    targets.insert(WasteCategory::Bittern, 30.0);

    let mut sequential = OptimizerConfig::default();
    sequential.parallel_evaluation = false;
    let mut parallel = OptimizerConfig::default();
    parallel.parallel_evaluation = true;

    let a = create_optimizer(sequential).optimize_target_waste(&targets, 6, None, &OptimizeOptions::default());
    let b = create_optimizer(parallel).optimize_target_waste(&targets, 6, None, &OptimizeOptions::default());

    assert_eq!(a.optimal_features, b.optimal_features);
    assert_eq!(a.objective_value, b.objective_value);
}

#[test]
fn test_result_percentages_match_direct_prediction() {
    let optimizer = create_optimizer(OptimizerConfig::default());
    let result = optimizer.optimize_minimize_waste(5, &OptimizeOptions::default());
    let direct = optimizer.predict_waste_percentages(&result.optimal_features);

    assert_eq!(direct.len(), result.predicted_waste.len());
    for (category, pct) in &result.predicted_waste {
        assert!((direct[category] - pct).abs() < 1e-12, "{:?}", category);
    }
}
