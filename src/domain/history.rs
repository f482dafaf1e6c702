// ==========================================
// 盐田废弃物数字孪生 - 历史数据记录
// ==========================================
// 年度实测表: (年份, 废弃物总量, 袋数)
// 月度特征表: (年份, 月份, 产量, 降雨, 气温, 湿度, 风速[, 产能])
// 列名与历史数据文件保持一致
// ==========================================

use crate::domain::composition::CompositionResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 年度实测废弃物
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualWasteRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Waste_KG")]
    pub waste_kg: f64,
    #[serde(rename = "Waste_Bags", default)]
    pub waste_bags: Option<f64>,
}

/// 月度工况特征
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFeatureRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    pub production_volume: f64,
    pub rain_sum: f64,
    pub temperature_mean: f64,
    pub humidity_mean: f64,
    pub wind_speed_mean: f64,
    /// 装机产能; 缺失时按基准利用率估算
    #[serde(default)]
    pub production_capacity: Option<f64>,
}

impl MonthlyFeatureRecord {
    /// 月初日期（用于区间筛选）
    pub fn month_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// 年度总量按月分摊后的单月结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDistributionRow {
    #[serde(flatten)]
    pub features: MonthlyFeatureRecord,
    /// 实际使用的产能（已解析缺省值）
    pub resolved_capacity: f64,
    pub waste_potential: f64,
    pub waste_fraction: f64,
    pub predicted_waste_kg: f64,
    pub predicted_waste_bags: Option<f64>,
    #[serde(flatten)]
    pub composition: CompositionResult,
}

impl MonthlyDistributionRow {
    pub fn month_start(&self) -> Option<NaiveDate> {
        self.features.month_start()
    }
}
