// ==========================================
// 盐田废弃物数字孪生 - API 请求/响应结构
// ==========================================
// 字段名与既有调用方的 JSON 约定保持一致
// ==========================================

use crate::domain::composition::{WastePercentages, WastePrediction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 单月预测
// ==========================================

/// 单月预测请求
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub production_volume_kg: f64,
    /// 缺省时按基准利用率由产量估算
    #[serde(default)]
    pub production_capacity_kg: Option<f64>,
    pub rain_sum_mm: f64,
    pub temperature_mean_c: f64,
    pub humidity_mean_percent: f64,
    pub wind_speed_mean_kmh: f64,
}

/// 单月预测响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub prediction: WastePrediction,
    /// 各类别占产量百分比
    pub percentages: WastePercentages,
    /// 预测所用校准系数是否为有效校准
    pub calibrated: bool,
}

// ==========================================
// 区间模拟
// ==========================================

/// 区间模拟单行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRow {
    pub month_start: NaiveDate,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub prediction: WastePrediction,
}

// ==========================================
// 优化
// ==========================================

/// 优化模式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OptimizationMode {
    /// 最小化总废弃物百分比
    Minimize,
    /// 逼近目标百分比（类别名 → 百分比）
    Target {
        targets: BTreeMap<String, f64>,
        #[serde(default)]
        weights: Option<BTreeMap<String, f64>>,
    },
}

impl OptimizationMode {
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizationMode::Minimize => "minimize",
            OptimizationMode::Target { .. } => "target",
        }
    }
}

/// 优化请求
///
/// month 以浮点接收, 以便对 7.5 之类的输入给出明确的校验错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub month: f64,
    #[serde(default)]
    pub production_kg: Option<f64>,
    #[serde(flatten)]
    pub mode: OptimizationMode,
    /// 搜索方法名; 缺省为局部梯度下降
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default = "default_true")]
    pub use_seasonal_constraints: bool,
}

fn default_true() -> bool {
    true
}

impl OptimizationRequest {
    /// 最小化请求
    pub fn minimize(month: u32) -> Self {
        Self {
            month: month as f64,
            production_kg: None,
            mode: OptimizationMode::Minimize,
            method: None,
            use_seasonal_constraints: true,
        }
    }

    /// 目标请求
    pub fn target(month: u32, targets: BTreeMap<String, f64>) -> Self {
        Self {
            mode: OptimizationMode::Target {
                targets,
                weights: None,
            },
            ..Self::minimize(month)
        }
    }
}

// ==========================================
// 健康检查
// ==========================================

/// 健康状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" 或 "degraded (uncalibrated)"
    pub status: String,
    pub service: String,
    pub calibrated: bool,
    pub calibration_factor: f64,
    pub version: String,
}
