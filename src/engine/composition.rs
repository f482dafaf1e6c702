// ==========================================
// 盐田废弃物数字孪生 - 废弃物成分模型
// ==========================================
// 职责: (总固体废弃物, 产量, 产能, 气象) → 成分分解
// 红线: 纯函数, 无隐藏状态; 不做输入校验（校验在 API 边界）
// ==========================================
// 流程:
// 1) 固体分配: 三类评分 → 归一化分数 × 总固体废弃物 (之和严格相等)
// 2) 苦卤体积: 基础设施基线 + 产量强度, 乘以气象效率
// 3) 衍生品: 由苦卤体积 + 气象计算, 各自截断为非负
// ==========================================

use crate::config::CompositionParams;
use crate::domain::composition::CompositionResult;

/// 成分模型输入（单月）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionInput {
    /// 作为固体分配归一化目标的总量 (kg)
    pub total_solid_waste: f64,
    pub production_volume: f64,
    /// None 时按基准利用率估算
    pub production_capacity: Option<f64>,
    pub rain: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
}

/// 固体三类的原始评分（归一化前）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidScores {
    pub limestone: f64,
    pub gypsum: f64,
    pub industrial_salt: f64,
}

impl SolidScores {
    pub fn sum(&self) -> f64 {
        self.limestone + self.gypsum + self.industrial_salt
    }

    /// 归一化为分数; 和为 0 或非有限时退化为三等分
    pub fn fractions(&self) -> [f64; 3] {
        let sum = self.sum();
        let scores = [self.limestone, self.gypsum, self.industrial_salt];
        if sum <= 0.0 || !sum.is_finite() || scores.iter().any(|s| !s.is_finite()) {
            return [1.0 / 3.0; 3];
        }
        [scores[0] / sum, scores[1] / sum, scores[2] / sum]
    }
}

// ==========================================
// WasteCompositionModel - 成分模型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WasteCompositionModel {
    params: CompositionParams,
}

impl WasteCompositionModel {
    pub fn new(params: CompositionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompositionParams {
        &self.params
    }

    /// 解析产能: 显式给出则直接使用, 否则 production / baseline_utilization
    pub fn resolve_capacity(&self, production_volume: f64, capacity: Option<f64>) -> f64 {
        capacity.unwrap_or(production_volume / self.params.baseline_utilization)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单月成分分解
    pub fn calculate_composition(&self, input: &CompositionInput) -> CompositionResult {
        let capacity = self.resolve_capacity(input.production_volume, input.production_capacity);

        // 1. 固体分配
        let [limestone_f, gypsum_f, salt_f] = self.solid_scores(input).fractions();
        let total = input.total_solid_waste;

        // 2. 苦卤
        let bittern = self.bittern_volume(input.production_volume, capacity, input.temperature, input.rain);

        // 3. 衍生品
        CompositionResult {
            limestone_kg: total * limestone_f,
            gypsum_kg: total * gypsum_f,
            industrial_salt_kg: total * salt_f,
            bittern_liters: bittern,
            epsom_salt_kg: self.epsom_salt(bittern, input.wind, input.humidity),
            potash_kg: self.potash(bittern, input.temperature, input.rain),
            magnesium_oil_liters: self.magnesium_oil(bittern, input.humidity),
        }
    }

    /// 固体三类评分
    ///
    /// - 石灰石: 大规模设施分离效率更高, 评分随规模效率下降
    /// - 石膏: 高温促进生成, 规模效率按平方根缓解
    /// - 工业盐: 降雨溶解成品盐; 利用率高于基准时加剧
    pub fn solid_scores(&self, input: &CompositionInput) -> SolidScores {
        let p = &self.params;
        let capacity = self.resolve_capacity(input.production_volume, input.production_capacity);

        let scale_efficiency = (capacity / p.reference_capacity_kg).min(p.max_scale_efficiency);
        let utilization = input.production_volume / capacity;

        let limestone = p.limestone_ratio / scale_efficiency;
        let gypsum =
            p.gypsum_ratio * (1.0 + 0.01 * (input.temperature - 25.0)) / scale_efficiency.sqrt();
        let industrial_salt = p.industrial_salt_ratio
            * (1.0 + 0.02 * input.rain)
            * (1.0 + 0.1 * (utilization - p.baseline_utilization));

        SolidScores {
            limestone,
            gypsum,
            industrial_salt,
        }
    }

    /// 气象效率: 高温提升蒸发, 降雨抑制
    pub fn weather_efficiency(&self, temperature: f64, rain: f64) -> f64 {
        (1.0 + 0.01 * (temperature - 25.0)) / (1.0 + 0.002 * rain)
    }

    /// 苦卤体积 (L) = 产能基线 + 产量强度
    pub fn bittern_volume(&self, production_volume: f64, capacity: f64, temperature: f64, rain: f64) -> f64 {
        let efficiency = self.weather_efficiency(temperature, rain);
        let base = capacity * self.params.base_bittern_ratio * efficiency;
        let intensity = production_volume * self.params.intensity_bittern_ratio * efficiency;
        base + intensity
    }

    /// 泻盐 (kg): 风助蒸发; 湿度惩罚下限 40%
    pub fn epsom_salt(&self, bittern: f64, wind: f64, humidity: f64) -> f64 {
        let wind_boost = 1.0 + 0.02 * (wind / 20.0);
        let humidity_penalty = (1.0 - 0.01 * ((humidity - 50.0) / 50.0)).max(0.4);
        (bittern * self.params.epsom_recovery * wind_boost * humidity_penalty).max(0.0)
    }

    /// 钾盐 (kg): 仅 25°C 以上有蒸发增益; 降雨倒数衰减
    pub fn potash(&self, bittern: f64, temperature: f64, rain: f64) -> f64 {
        let evaporation = 1.0 + 0.02 * (temperature - 25.0).max(0.0);
        let rain_damping = 1.0 / (1.0 + 0.008 * rain);
        (bittern * self.params.potash_recovery * evaporation * rain_damping).max(0.0)
    }

    /// 镁油 (L): 吸湿, 湿度只增不减
    pub fn magnesium_oil(&self, bittern: f64, humidity: f64) -> f64 {
        let humidity_boost = 1.0 + 0.015 * (humidity / 100.0);
        (bittern * self.params.magnesium_oil_recovery * humidity_boost).max(0.0)
    }
}
