// ==========================================
// 盐田废弃物数字孪生 - 请求校验器
// ==========================================
// 职责: 在调用引擎前拒绝非法请求（引擎本身不做校验）
// 规则:
// - 气象四项: 全局边界
// - 产量/产能 (预测): 有限正数; 优化请求中的固定产量: 全局边界
// - 月份: 1-12 的整数
// - 目标模式: 目标非空, 类别可识别, 目标值/权重为有限非负数
// 只报告首个违规
// ==========================================

use crate::api::dto::{OptimizationMode, OptimizationRequest, PredictionRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::feature::FeatureVector;
use crate::domain::optimization::OptimizationMethod;
use crate::domain::types::{FeatureName, WasteCategory};
use crate::engine::constraints::SeasonalConstraintProvider;
use crate::engine::optimizer::OptimizeOptions;
use std::collections::BTreeMap;

/// 校验通过的目标模式参数
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTargets {
    pub targets: BTreeMap<WasteCategory, f64>,
    pub weights: Option<BTreeMap<WasteCategory, f64>>,
}

/// 校验通过的优化请求
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptimization {
    pub month: u32,
    pub options: OptimizeOptions,
    /// None 表示最小化模式
    pub targets: Option<ValidatedTargets>,
}

// ==========================================
// RequestValidator - 请求校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator {
    constraints: SeasonalConstraintProvider,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self {
            constraints: SeasonalConstraintProvider::new(),
        }
    }

    /// 校验单月预测请求
    pub fn validate_prediction(&self, req: &PredictionRequest) -> ApiResult<()> {
        let weather: BTreeMap<FeatureName, f64> = [
            (FeatureName::Temperature, req.temperature_mean_c),
            (FeatureName::Humidity, req.humidity_mean_percent),
            (FeatureName::Rainfall, req.rain_sum_mm),
            (FeatureName::WindSpeed, req.wind_speed_mean_kmh),
        ]
        .into_iter()
        .collect();
        self.constraints.validate_feature_map(&weather)?;

        require_positive("production_volume_kg", req.production_volume_kg)?;
        if let Some(capacity) = req.production_capacity_kg {
            require_positive("production_capacity_kg", capacity)?;
        }
        Ok(())
    }

    /// 校验完整特征向量（全局边界）
    pub fn validate_features(&self, features: &FeatureVector) -> ApiResult<()> {
        self.constraints.validate_features(features)?;
        Ok(())
    }

    /// 校验优化请求并转换为引擎参数
    pub fn validate_optimization(&self, req: &OptimizationRequest) -> ApiResult<ValidatedOptimization> {
        let month = validate_month(req.month)?;

        if let Some(production) = req.production_kg {
            let mut map = BTreeMap::new();
            map.insert(FeatureName::Production, production);
            self.constraints.validate_feature_map(&map)?;
        }

        let method = match req.method.as_deref() {
            None => OptimizationMethod::default(),
            Some(name) => name.parse::<OptimizationMethod>().map_err(ApiError::InvalidInput)?,
        };

        let targets = match &req.mode {
            OptimizationMode::Minimize => None,
            OptimizationMode::Target { targets, weights } => {
                if targets.is_empty() {
                    return Err(ApiError::EmptyTarget);
                }
                let targets = parse_category_map(targets)?;
                let weights = weights.as_ref().map(parse_category_map).transpose()?;
                Some(ValidatedTargets { targets, weights })
            }
        };

        Ok(ValidatedOptimization {
            month,
            options: OptimizeOptions {
                production_kg: req.production_kg,
                method,
                use_seasonal_constraints: req.use_seasonal_constraints,
            },
            targets,
        })
    }
}

/// 月份必须是 1-12 的整数
pub fn validate_month(month: f64) -> ApiResult<u32> {
    if month.is_finite() && month.fract() == 0.0 && (1.0..=12.0).contains(&month) {
        Ok(month as u32)
    } else {
        Err(ApiError::InvalidMonth(month))
    }
}

fn require_positive(field: &str, value: f64) -> ApiResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "{} 必须为有限正数, 实际 {}",
            field, value
        )))
    }
}

/// 类别名 → 数值; 名称可为 snake_case 键或历史列名
fn parse_category_map(raw: &BTreeMap<String, f64>) -> ApiResult<BTreeMap<WasteCategory, f64>> {
    raw.iter()
        .map(|(name, &value)| {
            let category = name
                .parse::<WasteCategory>()
                .map_err(|_| ApiError::UnknownCategory(name.clone()))?;
            if !value.is_finite() || value < 0.0 {
                return Err(ApiError::InvalidTargetValue {
                    category: name.clone(),
                    value,
                });
            }
            Ok((category, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction() -> PredictionRequest {
        PredictionRequest {
            production_volume_kg: 50_000.0,
            production_capacity_kg: Some(62_500.0),
            rain_sum_mm: 100.0,
            temperature_mean_c: 28.0,
            humidity_mean_percent: 75.0,
            wind_speed_mean_kmh: 15.0,
        }
    }

    #[test]
    fn test_prediction_accepts_small_plant() {
        // 产量低于优化边界下限也允许预测
        assert!(RequestValidator::new().validate_prediction(&prediction()).is_ok());
    }

    #[test]
    fn test_prediction_rejects_out_of_bounds_weather() {
        let req = PredictionRequest {
            humidity_mean_percent: 120.0,
            ..prediction()
        };
        let err = RequestValidator::new().validate_prediction(&req).unwrap_err();
        assert!(matches!(
            err,
            ApiError::FeatureOutOfBounds {
                field: FeatureName::Humidity,
                max,
                ..
            } if max == 98.0
        ));
    }

    #[test]
    fn test_prediction_rejects_non_positive_production() {
        let req = PredictionRequest {
            production_volume_kg: 0.0,
            ..prediction()
        };
        assert!(matches!(
            RequestValidator::new().validate_prediction(&req),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_month_validation() {
        assert_eq!(validate_month(7.0).unwrap(), 7);
        assert!(matches!(validate_month(0.0), Err(ApiError::InvalidMonth(_))));
        assert!(matches!(validate_month(6.5), Err(ApiError::InvalidMonth(_))));
        assert!(matches!(validate_month(f64::NAN), Err(ApiError::InvalidMonth(_))));
    }

    #[test]
    fn test_target_validation() {
        let v = RequestValidator::new();

        let empty = OptimizationRequest::target(7, BTreeMap::new());
        assert!(matches!(v.validate_optimization(&empty), Err(ApiError::EmptyTarget)));

        let mut targets = BTreeMap::new();
        targets.insert("salt_dust_kg".to_string(), 1.0);
        let unknown = OptimizationRequest::target(7, targets);
        assert!(matches!(
            v.validate_optimization(&unknown),
            Err(ApiError::UnknownCategory(name)) if name == "salt_dust_kg"
        ));

        let mut targets = BTreeMap::new();
        targets.insert("Solid_Waste_Gypsum_kg".to_string(), 0.4);
        let ok = v.validate_optimization(&OptimizationRequest::target(7, targets)).unwrap();
        let parsed = ok.targets.unwrap();
        assert_eq!(parsed.targets.get(&WasteCategory::Gypsum), Some(&0.4));
    }

    #[test]
    fn test_fixed_production_uses_global_bounds() {
        let v = RequestValidator::new();
        let req = OptimizationRequest {
            production_kg: Some(100.0),
            ..OptimizationRequest::minimize(7)
        };
        assert!(matches!(
            v.validate_optimization(&req),
            Err(ApiError::FeatureOutOfBounds {
                field: FeatureName::Production,
                ..
            })
        ));

        let req = OptimizationRequest {
            method: Some("nelder-mead".to_string()),
            ..OptimizationRequest::minimize(7)
        };
        assert!(matches!(v.validate_optimization(&req), Err(ApiError::InvalidInput(_))));
    }
}
