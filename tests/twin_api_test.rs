// ==========================================
// TwinApi 集成测试
// ==========================================
// 覆盖: 健康检查 / 单月预测 / 区间模拟 / 优化请求 / 结果归档
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use salt_waste_twin::api::{OptimizationMode, OptimizationRequest, PredictionRequest};
use salt_waste_twin::importer::ResultArchive;
use salt_waste_twin::{ApiError, FeatureName, ModelConfig, TwinApi, WasteCategory};
use std::collections::BTreeMap;
use test_helpers::*;

// ==========================================
// 测试辅助函数
// ==========================================

fn calibrated_api() -> TwinApi {
    let config = ModelConfig::default();
    let monthly = synthetic_monthly(&[2023, 2024]);
    let annual = synthetic_annual(&monthly, &config.score_weights, 0.04);
    TwinApi::from_history(&config, &annual, &monthly)
}

fn sample_prediction() -> PredictionRequest {
    PredictionRequest {
        production_volume_kg: 50_000.0,
        production_capacity_kg: Some(62_500.0),
        rain_sum_mm: 100.0,
        temperature_mean_c: 28.0,
        humidity_mean_percent: 75.0,
        wind_speed_mean_kmh: 15.0,
    }
}

// ==========================================
// 健康检查与预测
// ==========================================

#[test]
fn test_health_after_calibration() {
    let api = calibrated_api();
    let health = api.health();
    assert_eq!(health.status, "healthy");
    assert!(health.calibrated);
    assert!((health.calibration_factor - 0.04).abs() < 1e-9);
}

#[test]
fn test_predict_single_is_consistent() {
    let api = calibrated_api();
    let response = api.predict_single(&sample_prediction()).unwrap();

    assert!(response.calibrated);
    let prediction = response.prediction;
    assert!(prediction.total_waste_kg > 0.0);
    assert!(
        (prediction.composition.solid_total() - prediction.total_waste_kg).abs()
            <= 1e-6 * prediction.total_waste_kg
    );

    let total_pct = response.percentages[&WasteCategory::TotalWaste];
    assert!((total_pct - prediction.total_waste_kg / 50_000.0 * 100.0).abs() < 1e-9);
    assert_eq!(response.percentages.len(), WasteCategory::ALL.len());
}

#[test]
fn test_predict_single_scales_with_production() {
    let api = calibrated_api();
    let small = api.predict_single(&sample_prediction()).unwrap();
    let large = api
        .predict_single(&PredictionRequest {
            production_volume_kg: 100_000.0,
            production_capacity_kg: Some(125_000.0),
            ..sample_prediction()
        })
        .unwrap();
    assert!(large.prediction.total_waste_kg > small.prediction.total_waste_kg);
}

#[test]
fn test_predict_single_rejects_out_of_bounds_rain() {
    let api = calibrated_api();
    let err = api
        .predict_single(&PredictionRequest {
            rain_sum_mm: 650.0,
            ..sample_prediction()
        })
        .unwrap_err();
    match err {
        ApiError::FeatureOutOfBounds { field, value, min, max } => {
            assert_eq!(field, FeatureName::Rainfall);
            assert_eq!(value, 650.0);
            assert_eq!((min, max), (0.0, 500.0));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_prediction_request_from_json() {
    let raw = r#"{
        "production_volume_kg": 50000,
        "rain_sum_mm": 100,
        "temperature_mean_c": 28,
        "humidity_mean_percent": 75,
        "wind_speed_mean_kmh": 15
    }"#;
    let req: PredictionRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(req.production_capacity_kg, None);

    let response = calibrated_api().predict_single(&req).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("Total_Waste_kg").is_some());
    assert!(json.get("Liquid_Waste_Bittern_Liters").is_some());
    assert_eq!(json["calibrated"], true);
}

// ==========================================
// 区间模拟
// ==========================================

#[test]
fn test_simulate_range_is_inclusive_and_sorted() {
    let api = calibrated_api();
    let mut records = synthetic_monthly(&[2023, 2024]);
    records.reverse();

    let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let rows = api.simulate_range(&records, start, end).unwrap();

    let months: Vec<(i32, u32)> = rows.iter().map(|r| (r.year, r.month)).collect();
    assert_eq!(months, vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]);
    assert!(rows.iter().all(|r| r.prediction.total_waste_kg > 0.0));
}

#[test]
fn test_simulate_range_without_matches_is_empty() {
    let api = calibrated_api();
    let records = synthetic_monthly(&[2023]);
    let start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2030, 12, 1).unwrap();
    assert!(api.simulate_range(&records, start, end).unwrap().is_empty());
}

#[test]
fn test_data_range_filters_distributed_rows() {
    let config = ModelConfig::default();
    let monthly = synthetic_monthly(&[2023, 2024]);
    let annual = synthetic_annual(&monthly, &config.score_weights, 0.04);
    let api = TwinApi::from_history(&config, &annual, &monthly);

    let mut rows = api.distribute(&annual, &monthly);
    rows.reverse();

    let start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let selected = api.data_range(&rows, start, end).unwrap();

    let months: Vec<(i32, u32)> = selected
        .iter()
        .map(|r| (r.features.year, r.features.month))
        .collect();
    assert_eq!(months, vec![(2023, 12), (2024, 1), (2024, 2), (2024, 3)]);
    assert!(selected.iter().all(|r| r.predicted_waste_kg > 0.0));

    let empty_start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let empty_end = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    assert!(api.data_range(&rows, empty_start, empty_end).unwrap().is_empty());
    assert!(matches!(
        api.data_range(&rows, end, start),
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// 优化请求
// ==========================================

#[test]
fn test_optimize_minimize_request() {
    let api = calibrated_api();
    let result = api.optimize(&OptimizationRequest::minimize(7)).unwrap();

    assert!(result.success, "{}", result.message);
    assert_eq!(result.optimal_features.month, 7);
    assert!(api
        .optimizer()
        .constraints()
        .get_seasonal_bounds(7)
        .contains(&result.optimal_features));
    assert!(result.to_string().contains("OPTIMIZATION RESULTS"));
}

#[test]
fn test_optimize_target_request_from_json() {
    let raw = r#"{
        "mode": "target",
        "month": 4,
        "targets": { "Solid_Waste_Gypsum_kg": 0.5, "potential_potash_kg": 0.1 },
        "weights": { "solid_waste_gypsum_kg": 2.0 }
    }"#;
    let req: OptimizationRequest = serde_json::from_str(raw).unwrap();
    assert!(req.use_seasonal_constraints);
    assert!(matches!(req.mode, OptimizationMode::Target { .. }));

    let api = calibrated_api();
    let result = api.optimize(&req).unwrap();
    let targets = result.target_waste.as_ref().unwrap();
    assert_eq!(targets[&WasteCategory::Gypsum], 0.5);
    assert_eq!(targets[&WasteCategory::Potash], 0.1);
    assert_eq!(result.deviations().len(), 2);
    assert!(result.method.starts_with("differential_evolution"));
}

#[test]
fn test_optimize_rejects_bad_requests() {
    let api = calibrated_api();

    let mut fractional = OptimizationRequest::minimize(7);
    fractional.month = 7.5;
    assert!(matches!(api.optimize(&fractional), Err(ApiError::InvalidMonth(m)) if m == 7.5));

    let mut thirteen = OptimizationRequest::minimize(7);
    thirteen.month = 13.0;
    assert!(matches!(api.optimize(&thirteen), Err(ApiError::InvalidMonth(_))));

    let empty = OptimizationRequest::target(7, BTreeMap::new());
    assert!(matches!(api.optimize(&empty), Err(ApiError::EmptyTarget)));

    let mut unknown = BTreeMap::new();
    unknown.insert("plutonium_kg".to_string(), 1.0);
    assert!(matches!(
        api.optimize(&OptimizationRequest::target(7, unknown)),
        Err(ApiError::UnknownCategory(name)) if name == "plutonium_kg"
    ));

    let mut negative = BTreeMap::new();
    negative.insert("total_waste_kg".to_string(), -1.0);
    assert!(matches!(
        api.optimize(&OptimizationRequest::target(7, negative)),
        Err(ApiError::InvalidTargetValue { .. })
    ));

    let mut huge_plant = OptimizationRequest::minimize(7);
    huge_plant.production_kg = Some(5.0e7);
    assert!(matches!(
        api.optimize(&huge_plant),
        Err(ApiError::FeatureOutOfBounds { field: FeatureName::Production, .. })
    ));

    let mut bad_method = OptimizationRequest::minimize(7);
    bad_method.method = Some("simulated_annealing".to_string());
    assert!(matches!(api.optimize(&bad_method), Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_optimize_accepts_legacy_method_names() {
    let api = calibrated_api();
    let mut req = OptimizationRequest::minimize(2);
    req.method = Some("SLSQP".to_string());
    assert_eq!(api.optimize(&req).unwrap().method, "local_gradient");
}

// ==========================================
// 结果归档
// ==========================================

#[test]
fn test_archive_records_each_optimization() {
    let dir = tempfile::tempdir().unwrap();
    let archive = ResultArchive::open(dir.path().join("results")).unwrap();
    let api = calibrated_api().with_archive(archive);

    let first = api.optimize(&OptimizationRequest::minimize(1)).unwrap();
    let mut targets = BTreeMap::new();
    targets.insert("total_waste_kg".to_string(), 1.0);
    api.optimize(&OptimizationRequest::target(8, targets)).unwrap();

    let history = api.history(10).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|h| h.kind == "minimize"));
    assert!(history.iter().any(|h| h.kind == "target"));
    assert_eq!(api.history(1).unwrap().len(), 1);

    let minimize_entry = history.iter().find(|h| h.kind == "minimize").unwrap();
    let archive = ResultArchive::open(dir.path().join("results")).unwrap();
    let loaded = archive.load(&minimize_entry.file_name).unwrap();
    assert_eq!(loaded.run_id, first.run_id);
    assert_eq!(loaded.optimal_features.month, first.optimal_features.month);
    assert!((loaded.objective_value - first.objective_value).abs() <= 1e-9 * first.objective_value.abs().max(1.0));
}

#[test]
fn test_history_without_archive_is_empty() {
    assert!(calibrated_api().history(5).unwrap().is_empty());
}
