// ==========================================
// 盐田废弃物数字孪生 - 特征向量与边界
// ==========================================
// FeatureVector: 六字段定长记录,构造时做结构校验
// FeatureBounds: 特征名 → (min, max)
// ==========================================

use crate::domain::types::FeatureName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// 特征向量结构错误（非有限值 / 月份越界）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("特征值非有限数: {field}={value}")]
    NonFinite { field: FeatureName, value: f64 },

    #[error("月份必须为 1-12 的整数, 实际 {0}")]
    InvalidMonth(f64),
}

// ==========================================
// FeatureVector - 单月工况
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub production_kg: f64,
    pub month: u32,
}

impl FeatureVector {
    /// 构造并校验（所有字段有限, 月份 1-12）
    ///
    /// 全局边界校验不在此处做, 见 SeasonalConstraintProvider::validate_features
    pub fn new(
        temperature_c: f64,
        humidity_pct: f64,
        rainfall_mm: f64,
        wind_speed_kmh: f64,
        production_kg: f64,
        month: u32,
    ) -> Result<Self, FeatureError> {
        let fv = Self {
            temperature_c,
            humidity_pct,
            rainfall_mm,
            wind_speed_kmh,
            production_kg,
            month,
        };

        for name in FeatureName::ORDER {
            let value = fv.get(name);
            if !value.is_finite() {
                return Err(FeatureError::NonFinite { field: name, value });
            }
        }
        if !(1..=12).contains(&month) {
            return Err(FeatureError::InvalidMonth(month as f64));
        }

        Ok(fv)
    }

    /// 由优化向量还原（按 FeatureName::ORDER 排列）
    ///
    /// 月份取最近整数, 吸收求解器在固定边界上的浮点漂移
    pub fn from_array(x: &[f64; 6]) -> Result<Self, FeatureError> {
        let month = x[5];
        if !month.is_finite() || month.round() < 1.0 || month.round() > 12.0 {
            return Err(FeatureError::InvalidMonth(month));
        }
        Self::new(x[0], x[1], x[2], x[3], x[4], month.round() as u32)
    }

    /// 转为优化向量
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.temperature_c,
            self.humidity_pct,
            self.rainfall_mm,
            self.wind_speed_kmh,
            self.production_kg,
            self.month as f64,
        ]
    }

    /// 按特征名取值
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Temperature => self.temperature_c,
            FeatureName::Humidity => self.humidity_pct,
            FeatureName::Rainfall => self.rainfall_mm,
            FeatureName::WindSpeed => self.wind_speed_kmh,
            FeatureName::Production => self.production_kg,
            FeatureName::Month => self.month as f64,
        }
    }
}

// ==========================================
// FeatureBounds - 特征边界
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    bounds: BTreeMap<FeatureName, (f64, f64)>,
}

impl FeatureBounds {
    /// 从 (特征, min, max) 列表构造
    ///
    /// min > max 的条目会被交换, 保证 min ≤ max
    pub fn from_entries(entries: &[(FeatureName, f64, f64)]) -> Self {
        let bounds = entries
            .iter()
            .map(|&(name, lo, hi)| (name, if lo <= hi { (lo, hi) } else { (hi, lo) }))
            .collect();
        Self { bounds }
    }

    pub fn get(&self, name: FeatureName) -> Option<(f64, f64)> {
        self.bounds.get(&name).copied()
    }

    /// 将某个特征钉死为单值
    pub fn pin(&mut self, name: FeatureName, value: f64) {
        self.bounds.insert(name, (value, value));
    }

    /// 按 FeatureName::ORDER 展开; 缺失项返回 None
    pub fn to_array(&self) -> Option<[(f64, f64); 6]> {
        let mut out = [(0.0, 0.0); 6];
        for name in FeatureName::ORDER {
            out[name.index()] = self.get(name)?;
        }
        Some(out)
    }

    /// 判断特征向量是否落在边界内（含端点）
    pub fn contains(&self, fv: &FeatureVector) -> bool {
        self.bounds.iter().all(|(name, &(lo, hi))| {
            let v = fv.get(*name);
            v >= lo && v <= hi
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, (f64, f64))> + '_ {
        self.bounds.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for FeatureBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bounds
            .iter()
            .map(|(name, (lo, hi))| format!("{}=[{}, {}]", name, lo, hi))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
