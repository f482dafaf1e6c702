// ==========================================
// 盐田废弃物数字孪生 - 季节约束
// ==========================================
// 职责: 提供全局/季节特征边界, 校验特征取值
// 依据: 普塔勒姆 2023-2025 历史气候与产量
// ==========================================

use crate::domain::feature::{FeatureBounds, FeatureVector};
use crate::domain::types::{FeatureName, Season};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// 全局边界（设计常量, 与既有校准保持一致）
// ==========================================
pub const TEMPERATURE_BOUNDS: (f64, f64) = (23.0, 35.0);
pub const HUMIDITY_BOUNDS: (f64, f64) = (45.0, 98.0);
pub const RAINFALL_BOUNDS: (f64, f64) = (0.0, 500.0);
pub const WIND_SPEED_BOUNDS: (f64, f64) = (2.0, 30.0);
pub const PRODUCTION_BOUNDS: (f64, f64) = (500_000.0, 10_000_000.0);
pub const MONTH_BOUNDS: (f64, f64) = (1.0, 12.0);

/// 季节气象子区间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalPattern {
    pub temperature_c: (f64, f64),
    pub humidity_pct: (f64, f64),
    pub rainfall_mm: (f64, f64),
    pub wind_speed_kmh: (f64, f64),
}

/// 季节边界表
pub fn seasonal_pattern(season: Season) -> SeasonalPattern {
    match season {
        // 旱季 12-3 月（产量高峰）
        Season::Dry => SeasonalPattern {
            temperature_c: (25.0, 32.0),
            humidity_pct: (50.0, 85.0),
            rainfall_mm: (20.0, 160.0),
            wind_speed_kmh: (8.0, 20.0),
        },
        // 第一季间 4-5 月
        Season::InterMonsoon1 => SeasonalPattern {
            temperature_c: (27.0, 33.0),
            humidity_pct: (70.0, 90.0),
            rainfall_mm: (100.0, 420.0),
            wind_speed_kmh: (12.0, 27.0),
        },
        // 西南季风 6-9 月
        Season::SouthwestMonsoon => SeasonalPattern {
            temperature_c: (26.0, 32.0),
            humidity_pct: (70.0, 90.0),
            rainfall_mm: (80.0, 220.0),
            wind_speed_kmh: (15.0, 26.0),
        },
        // 第二季间 10-11 月
        Season::InterMonsoon2 => SeasonalPattern {
            temperature_c: (25.0, 30.0),
            humidity_pct: (80.0, 98.0),
            rainfall_mm: (200.0, 500.0),
            wind_speed_kmh: (8.0, 18.0),
        },
    }
}

/// 单个特征的越界信息（只报告首个违规）
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    OutOfBounds {
        field: FeatureName,
        value: f64,
        min: f64,
        max: f64,
    },
    InvalidMonth(f64),
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::OutOfBounds {
                field,
                value,
                min,
                max,
            } => write!(f, "{}={:.2} outside bounds [{}, {}]", field, value, min, max),
            ConstraintViolation::InvalidMonth(v) => {
                write!(f, "month must be integer 1-12, got {}", v)
            }
        }
    }
}

/// 特征说明
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureInfo {
    pub feature: FeatureName,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub bounds: (f64, f64),
    pub typical: f64,
}

// ==========================================
// SeasonalConstraintProvider - 季节约束
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalConstraintProvider;

impl SeasonalConstraintProvider {
    pub fn new() -> Self {
        Self
    }

    /// 全局（全年）边界
    pub fn get_bounds(&self) -> FeatureBounds {
        FeatureBounds::from_entries(&[
            (FeatureName::Temperature, TEMPERATURE_BOUNDS.0, TEMPERATURE_BOUNDS.1),
            (FeatureName::Humidity, HUMIDITY_BOUNDS.0, HUMIDITY_BOUNDS.1),
            (FeatureName::Rainfall, RAINFALL_BOUNDS.0, RAINFALL_BOUNDS.1),
            (FeatureName::WindSpeed, WIND_SPEED_BOUNDS.0, WIND_SPEED_BOUNDS.1),
            (FeatureName::Production, PRODUCTION_BOUNDS.0, PRODUCTION_BOUNDS.1),
            (FeatureName::Month, MONTH_BOUNDS.0, MONTH_BOUNDS.1),
        ])
    }

    /// 月份所属季节
    pub fn season_for(&self, month: u32) -> Option<Season> {
        Season::from_month(month)
    }

    /// 季节边界
    ///
    /// 气象四项取季节子区间, 产量取全局边界, 月份钉死为 (month, month)
    /// 月份不属于任何季节时退化为全局边界
    pub fn get_seasonal_bounds(&self, month: u32) -> FeatureBounds {
        let Some(season) = self.season_for(month) else {
            tracing::warn!(month, "月份不属于任何季节, 使用全局边界");
            return self.get_bounds();
        };

        let p = seasonal_pattern(season);
        let m = month as f64;
        FeatureBounds::from_entries(&[
            (FeatureName::Temperature, p.temperature_c.0, p.temperature_c.1),
            (FeatureName::Humidity, p.humidity_pct.0, p.humidity_pct.1),
            (FeatureName::Rainfall, p.rainfall_mm.0, p.rainfall_mm.1),
            (FeatureName::WindSpeed, p.wind_speed_kmh.0, p.wind_speed_kmh.1),
            (FeatureName::Production, PRODUCTION_BOUNDS.0, PRODUCTION_BOUNDS.1),
            (FeatureName::Month, m, m),
        ])
    }

    /// 校验特征向量是否在全局边界内
    pub fn validate_features(&self, features: &FeatureVector) -> Result<(), ConstraintViolation> {
        let map: BTreeMap<FeatureName, f64> = FeatureName::ORDER
            .iter()
            .map(|&name| (name, features.get(name)))
            .collect();
        self.validate_feature_map(&map)
    }

    /// 校验部分特征（名 → 值）
    ///
    /// 依次检查每个给出的特征, 返回首个越界; 月份另需为整数
    pub fn validate_feature_map(
        &self,
        features: &BTreeMap<FeatureName, f64>,
    ) -> Result<(), ConstraintViolation> {
        let bounds = self.get_bounds();
        for (&name, &value) in features {
            let Some((min, max)) = bounds.get(name) else {
                continue;
            };
            if !(value >= min && value <= max) {
                return Err(ConstraintViolation::OutOfBounds {
                    field: name,
                    value,
                    min,
                    max,
                });
            }
        }

        if let Some(&month) = features.get(&FeatureName::Month) {
            if month.fract() != 0.0 || !(1.0..=12.0).contains(&month) {
                return Err(ConstraintViolation::InvalidMonth(month));
            }
        }

        Ok(())
    }

    /// 典型工况: 季节区间中点, 月份取给定值
    pub fn get_typical_values(&self, month: u32) -> BTreeMap<FeatureName, f64> {
        self.get_seasonal_bounds(month)
            .iter()
            .map(|(name, (lo, hi))| {
                let v = if name == FeatureName::Month {
                    month as f64
                } else {
                    (lo + hi) / 2.0
                };
                (name, v)
            })
            .collect()
    }

    /// 各特征说明
    pub fn feature_info(&self) -> Vec<FeatureInfo> {
        vec![
            FeatureInfo {
                feature: FeatureName::Temperature,
                name: "Temperature",
                unit: "°C",
                description: "Monthly average temperature",
                bounds: TEMPERATURE_BOUNDS,
                typical: 28.0,
            },
            FeatureInfo {
                feature: FeatureName::Humidity,
                name: "Humidity",
                unit: "%",
                description: "Monthly average relative humidity",
                bounds: HUMIDITY_BOUNDS,
                typical: 80.0,
            },
            FeatureInfo {
                feature: FeatureName::Rainfall,
                name: "Rainfall",
                unit: "mm",
                description: "Monthly total rainfall",
                bounds: RAINFALL_BOUNDS,
                typical: 150.0,
            },
            FeatureInfo {
                feature: FeatureName::WindSpeed,
                name: "Wind Speed",
                unit: "km/h",
                description: "Monthly average wind speed",
                bounds: WIND_SPEED_BOUNDS,
                typical: 15.0,
            },
            FeatureInfo {
                feature: FeatureName::Production,
                name: "Production",
                unit: "kg",
                description: "Monthly salt production",
                bounds: PRODUCTION_BOUNDS,
                typical: 3_000_000.0,
            },
            FeatureInfo {
                feature: FeatureName::Month,
                name: "Month",
                unit: "",
                description: "Month of year (1-12)",
                bounds: MONTH_BOUNDS,
                typical: 7.0,
            },
        ]
    }
}
