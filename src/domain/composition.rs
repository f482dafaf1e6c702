// ==========================================
// 盐田废弃物数字孪生 - 成分结果
// ==========================================
// 固体三类: 石灰石 / 石膏 / 工业盐 (之和 = 总固体废弃物)
// 液体及衍生: 苦卤体积 + 泻盐 / 钾盐 / 镁油 潜在回收量
// ==========================================

use crate::domain::types::WasteCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 类别 → 占产量百分比
pub type WastePercentages = BTreeMap<WasteCategory, f64>;

// ==========================================
// CompositionResult - 单月成分分解
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositionResult {
    #[serde(rename = "Solid_Waste_Limestone_kg")]
    pub limestone_kg: f64,
    #[serde(rename = "Solid_Waste_Gypsum_kg")]
    pub gypsum_kg: f64,
    #[serde(rename = "Solid_Waste_Industrial_Salt_kg")]
    pub industrial_salt_kg: f64,
    #[serde(rename = "Liquid_Waste_Bittern_Liters")]
    pub bittern_liters: f64,
    #[serde(rename = "Potential_Epsom_Salt_kg")]
    pub epsom_salt_kg: f64,
    #[serde(rename = "Potential_Potash_kg")]
    pub potash_kg: f64,
    #[serde(rename = "Potential_Magnesium_Oil_Liters")]
    pub magnesium_oil_liters: f64,
}

impl CompositionResult {
    /// 固体三类之和
    pub fn solid_total(&self) -> f64 {
        self.limestone_kg + self.gypsum_kg + self.industrial_salt_kg
    }

    /// 按类别取值; TotalWaste 不属于成分本身, 返回 None
    pub fn get(&self, category: WasteCategory) -> Option<f64> {
        match category {
            WasteCategory::TotalWaste => None,
            WasteCategory::Limestone => Some(self.limestone_kg),
            WasteCategory::Gypsum => Some(self.gypsum_kg),
            WasteCategory::IndustrialSalt => Some(self.industrial_salt_kg),
            WasteCategory::Bittern => Some(self.bittern_liters),
            WasteCategory::EpsomSalt => Some(self.epsom_salt_kg),
            WasteCategory::Potash => Some(self.potash_kg),
            WasteCategory::MagnesiumOil => Some(self.magnesium_oil_liters),
        }
    }
}

// ==========================================
// WastePrediction - 总量 + 成分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WastePrediction {
    #[serde(rename = "Total_Waste_kg")]
    pub total_waste_kg: f64,
    #[serde(flatten)]
    pub composition: CompositionResult,
}

impl WastePrediction {
    pub fn get(&self, category: WasteCategory) -> f64 {
        match category {
            WasteCategory::TotalWaste => self.total_waste_kg,
            other => self.composition.get(other).unwrap_or(0.0),
        }
    }

    /// 各类别占产量的百分比 (value / production × 100)
    ///
    /// 产量非正时全部记 0, 避免除零
    pub fn percentages(&self, production_kg: f64) -> WastePercentages {
        WasteCategory::ALL
            .iter()
            .map(|&c| {
                let pct = if production_kg > 0.0 {
                    self.get(c) / production_kg * 100.0
                } else {
                    0.0
                };
                (c, pct)
            })
            .collect()
    }
}
