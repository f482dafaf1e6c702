// ==========================================
// 盐田废弃物数字孪生 - 校准预测器
// ==========================================
// 职责: 无量纲"废弃物潜力评分" → 校准总量 → 成分分解
// 输入: 评分权重 + 校准系数 (启动时拟合一次, 之后只读)
// 输出: 单月预测 / 年度总量按月分摊表
// ==========================================
// 两条路径共享同一评分公式:
// - predict_one_month: 单月, 总量 = 评分 × 校准系数
// - distribute: 年度实测总量按各月评分占比分摊
// 两条路径使用同一产能解析规则（显式产能优先, 否则 产量/基准利用率）
// ==========================================

use crate::config::{CompositionParams, ScoreWeights};
use crate::domain::composition::WastePrediction;
use crate::domain::history::{AnnualWasteRecord, MonthlyDistributionRow, MonthlyFeatureRecord};
use crate::engine::composition::{CompositionInput, WasteCompositionModel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

/// 降雨归一化参考最大值 (mm/月)
pub const RAIN_REFERENCE_MM: f64 = 500.0;
/// 气温归一化参考最大值 (°C)
pub const TEMP_REFERENCE_C: f64 = 35.0;

// ==========================================
// CalibrationFactor - 校准系数
// ==========================================
// 1.0 为"未校准"哨兵值, 不是有效的物理校准
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationFactor(f64);

impl CalibrationFactor {
    pub const UNCALIBRATED: CalibrationFactor = CalibrationFactor(1.0);

    /// 构造; 非正或非有限值退化为哨兵
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::UNCALIBRATED
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_calibrated(&self) -> bool {
        self.0 != 1.0
    }
}

impl Default for CalibrationFactor {
    fn default() -> Self {
        Self::UNCALIBRATED
    }
}

// ==========================================
// CalibratedPredictor - 校准预测器
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedPredictor {
    weights: ScoreWeights,
    calibration: CalibrationFactor,
    model: WasteCompositionModel,
}

impl CalibratedPredictor {
    /// 构造函数
    ///
    /// # 参数
    /// - `weights`: 评分权重
    /// - `params`: 成分模型常量
    /// - `calibration`: 已拟合的校准系数
    pub fn new(
        weights: ScoreWeights,
        params: CompositionParams,
        calibration: CalibrationFactor,
    ) -> Self {
        Self {
            weights,
            calibration,
            model: WasteCompositionModel::new(params),
        }
    }

    /// 未校准实例（降级模式）
    pub fn uncalibrated(weights: ScoreWeights, params: CompositionParams) -> Self {
        Self::new(weights, params, CalibrationFactor::UNCALIBRATED)
    }

    /// 用历史数据校准后构造
    pub fn calibrated(
        weights: ScoreWeights,
        params: CompositionParams,
        annual: &[AnnualWasteRecord],
        monthly: &[MonthlyFeatureRecord],
    ) -> Self {
        let factor = Self::calibrate(&weights, annual, monthly);
        Self::new(weights, params, factor)
    }

    pub fn calibration_factor(&self) -> CalibrationFactor {
        self.calibration
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn model(&self) -> &WasteCompositionModel {
        &self.model
    }

    // ==========================================
    // 校准
    // ==========================================

    /// 拟合校准系数
    ///
    /// k = Σ实测年度总量 / Σ月度评分, 仅统计两表共有年份, 全局单一比值
    ///
    /// # 返回
    /// - 分母为 0（如无共有年份）时返回 UNCALIBRATED 哨兵
    #[instrument(skip_all, fields(annual_rows = annual.len(), monthly_rows = monthly.len()))]
    pub fn calibrate(
        weights: &ScoreWeights,
        annual: &[AnnualWasteRecord],
        monthly: &[MonthlyFeatureRecord],
    ) -> CalibrationFactor {
        let common = common_years(annual, monthly);

        let mut total_actual = 0.0;
        let mut total_score = 0.0;
        for &year in &common {
            // 同一年份多行时取第一行
            if let Some(rec) = annual.iter().find(|r| r.year == year) {
                total_actual += rec.waste_kg;
            }
            total_score += monthly
                .iter()
                .filter(|m| m.year == year)
                .map(|m| potential_score(weights, m.production_volume, m.rain_sum, m.temperature_mean))
                .sum::<f64>();
        }

        if total_score > 0.0 && total_score.is_finite() {
            let factor = CalibrationFactor::new(total_actual / total_score);
            if !factor.is_calibrated() {
                tracing::warn!(
                    years = ?common,
                    total_actual,
                    total_score,
                    "校准失败: 拟合系数无效, 使用未校准哨兵 1.0"
                );
                return factor;
            }
            tracing::info!(
                years = ?common,
                factor = factor.value(),
                "模型校准完成: k = {:.6} kg/评分单位",
                factor.value()
            );
            factor
        } else {
            tracing::warn!(years = ?common, "校准失败: 评分总和为 0, 使用未校准哨兵 1.0");
            CalibrationFactor::UNCALIBRATED
        }
    }

    // ==========================================
    // 评分与预测
    // ==========================================

    /// 废弃物潜力评分（使用本实例权重）
    pub fn potential_score(&self, production: f64, rain: f64, temperature: f64) -> f64 {
        potential_score(&self.weights, production, rain, temperature)
    }

    /// 单月预测
    ///
    /// 校准总量作为固体分配的归一化目标; 苦卤及衍生品由产量/产能独立计算
    pub fn predict_one_month(
        &self,
        production: f64,
        rain: f64,
        temperature: f64,
        humidity: f64,
        wind: f64,
        production_capacity: Option<f64>,
    ) -> WastePrediction {
        let score = self.potential_score(production, rain, temperature);
        let predicted_total = score * self.calibration.value();

        let composition = self.model.calculate_composition(&CompositionInput {
            total_solid_waste: predicted_total,
            production_volume: production,
            production_capacity,
            rain,
            temperature,
            humidity,
            wind,
        });

        WastePrediction {
            total_waste_kg: predicted_total,
            composition,
        }
    }

    /// 对月度记录做单月预测
    pub fn predict_record(&self, record: &MonthlyFeatureRecord) -> WastePrediction {
        self.predict_one_month(
            record.production_volume,
            record.rain_sum,
            record.temperature_mean,
            record.humidity_mean,
            record.wind_speed_mean,
            record.production_capacity,
        )
    }

    // ==========================================
    // 年度分摊
    // ==========================================

    /// 年度实测总量按月分摊并计算成分
    ///
    /// 规则:
    /// 1) 仅处理两表共有年份
    /// 2) 月度分数 = 月评分 / 年评分和; 年评分和为 0 时均分 1/N
    /// 3) 月度总量 = 年度实测 × 分数; 袋数同比例分摊
    ///
    /// # 返回
    /// 按 (年, 月) 升序排列的分摊结果
    #[instrument(skip_all, fields(annual_rows = annual.len(), monthly_rows = monthly.len()))]
    pub fn distribute(
        &self,
        annual: &[AnnualWasteRecord],
        monthly: &[MonthlyFeatureRecord],
    ) -> Vec<MonthlyDistributionRow> {
        let common = common_years(annual, monthly);
        tracing::info!(years = ?common, "按月分摊年度废弃物");

        let mut rows = Vec::new();
        for &year in &common {
            let Some(actual) = annual.iter().find(|r| r.year == year) else {
                continue;
            };

            let mut months: Vec<&MonthlyFeatureRecord> =
                monthly.iter().filter(|m| m.year == year).collect();
            if months.is_empty() {
                continue;
            }
            months.sort_by_key(|m| m.month);

            let scores: Vec<f64> = months
                .iter()
                .map(|m| self.potential_score(m.production_volume, m.rain_sum, m.temperature_mean))
                .collect();
            let total_score: f64 = scores.iter().sum();
            let uniform = total_score == 0.0 || !total_score.is_finite();
            if uniform {
                tracing::warn!(year, "年评分和为 0, 按月均分");
            }

            let mut allocated = 0.0;
            for (m, score) in months.iter().zip(&scores) {
                let fraction = if uniform {
                    1.0 / months.len() as f64
                } else {
                    score / total_score
                };
                let predicted = actual.waste_kg * fraction;
                allocated += predicted;

                let resolved_capacity =
                    self.model.resolve_capacity(m.production_volume, m.production_capacity);
                let composition = self.model.calculate_composition(&CompositionInput {
                    total_solid_waste: predicted,
                    production_volume: m.production_volume,
                    production_capacity: Some(resolved_capacity),
                    rain: m.rain_sum,
                    temperature: m.temperature_mean,
                    humidity: m.humidity_mean,
                    wind: m.wind_speed_mean,
                });

                rows.push(MonthlyDistributionRow {
                    features: **m,
                    resolved_capacity,
                    waste_potential: *score,
                    waste_fraction: fraction,
                    predicted_waste_kg: predicted,
                    predicted_waste_bags: actual.waste_bags.map(|bags| bags * fraction),
                    composition,
                });
            }

            tracing::debug!(
                year,
                allocated,
                actual = actual.waste_kg,
                diff = (allocated - actual.waste_kg).abs(),
                "年度分摊核对"
            );
        }

        rows
    }
}

/// 废弃物潜力评分
///
/// score = production^pw × (1 + rw × rain/500 + tw × temp/35)
///
/// 归一化常量固定, 单个新数据点无需历史分布即可评分
pub fn potential_score(weights: &ScoreWeights, production: f64, rain: f64, temperature: f64) -> f64 {
    let base = production.powf(weights.production_weight);
    let modifier = 1.0
        + weights.rain_weight * rain / RAIN_REFERENCE_MM
        + weights.temp_weight * temperature / TEMP_REFERENCE_C;
    base * modifier
}

/// 两表共有年份（升序）
fn common_years(annual: &[AnnualWasteRecord], monthly: &[MonthlyFeatureRecord]) -> Vec<i32> {
    let annual_years: BTreeSet<i32> = annual.iter().map(|r| r.year).collect();
    let monthly_years: BTreeSet<i32> = monthly.iter().map(|m| m.year).collect();
    annual_years.intersection(&monthly_years).copied().collect()
}

/// 按年汇总分摊结果（核对用）
pub fn yearly_allocated_totals(rows: &[MonthlyDistributionRow]) -> BTreeMap<i32, f64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.features.year).or_insert(0.0) += row.predicted_waste_kg;
    }
    totals
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, production: f64, rain: f64, temp: f64) -> MonthlyFeatureRecord {
        MonthlyFeatureRecord {
            year,
            month,
            production_volume: production,
            rain_sum: rain,
            temperature_mean: temp,
            humidity_mean: 75.0,
            wind_speed_mean: 15.0,
            production_capacity: None,
        }
    }

    fn synthetic_year(year: i32) -> Vec<MonthlyFeatureRecord> {
        (1..=12)
            .map(|m| {
                month(
                    year,
                    m,
                    1.0e6 + 1.5e5 * m as f64,
                    20.0 * m as f64,
                    25.0 + (m % 5) as f64,
                )
            })
            .collect()
    }

    #[test]
    fn test_potential_score_formula() {
        let w = ScoreWeights {
            production_weight: 1.0,
            rain_weight: 0.5,
            temp_weight: 0.1,
        };
        let s = potential_score(&w, 1000.0, 250.0, 35.0);
        assert!((s - 1000.0 * (1.0 + 0.25 + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_calibration_recovers_known_factor() {
        let weights = ScoreWeights::default();
        let k_true = 0.0421;
        let mut monthly = synthetic_year(2023);
        monthly.extend(synthetic_year(2024));

        let annual: Vec<AnnualWasteRecord> = [2023, 2024]
            .iter()
            .map(|&y| AnnualWasteRecord {
                year: y,
                waste_kg: monthly
                    .iter()
                    .filter(|m| m.year == y)
                    .map(|m| potential_score(&weights, m.production_volume, m.rain_sum, m.temperature_mean))
                    .sum::<f64>()
                    * k_true,
                waste_bags: None,
            })
            .collect();

        let k = CalibratedPredictor::calibrate(&weights, &annual, &monthly);
        assert!(k.is_calibrated());
        assert!((k.value() - k_true).abs() / k_true < 1e-9);
    }

    #[test]
    fn test_calibration_without_common_years_is_sentinel() {
        let weights = ScoreWeights::default();
        let annual = vec![AnnualWasteRecord {
            year: 2019,
            waste_kg: 1.0e5,
            waste_bags: None,
        }];
        let k = CalibratedPredictor::calibrate(&weights, &annual, &synthetic_year(2024));
        assert_eq!(k, CalibrationFactor::UNCALIBRATED);
        assert!(!k.is_calibrated());
    }

    #[test]
    fn test_calibration_with_zero_actuals_is_sentinel() {
        let weights = ScoreWeights::default();
        let annual = vec![AnnualWasteRecord {
            year: 2024,
            waste_kg: 0.0,
            waste_bags: None,
        }];
        let k = CalibratedPredictor::calibrate(&weights, &annual, &synthetic_year(2024));
        assert_eq!(k, CalibrationFactor::UNCALIBRATED);
    }

    #[test]
    fn test_calibration_factor_rejects_non_positive() {
        assert_eq!(CalibrationFactor::new(0.0), CalibrationFactor::UNCALIBRATED);
        assert_eq!(CalibrationFactor::new(f64::NAN), CalibrationFactor::UNCALIBRATED);
        assert_eq!(CalibrationFactor::new(0.5).value(), 0.5);
    }

    #[test]
    fn test_predict_one_month_uses_calibrated_total() {
        let predictor = CalibratedPredictor::new(
            ScoreWeights::default(),
            CompositionParams::default(),
            CalibrationFactor::new(0.05),
        );
        let p = predictor.predict_one_month(2.0e6, 100.0, 28.0, 75.0, 15.0, None);
        let expected = predictor.potential_score(2.0e6, 100.0, 28.0) * 0.05;
        assert!((p.total_waste_kg - expected).abs() < 1e-6);
        assert!((p.composition.solid_total() - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn test_distribute_preserves_annual_totals() {
        let predictor =
            CalibratedPredictor::uncalibrated(ScoreWeights::default(), CompositionParams::default());
        let monthly = synthetic_year(2024);
        let annual = vec![AnnualWasteRecord {
            year: 2024,
            waste_kg: 1.2e6,
            waste_bags: Some(24_000.0),
        }];

        let rows = predictor.distribute(&annual, &monthly);
        assert_eq!(rows.len(), 12);
        let totals = yearly_allocated_totals(&rows);
        assert!((totals[&2024] - 1.2e6).abs() < 1e-6);

        let bags: f64 = rows.iter().filter_map(|r| r.predicted_waste_bags).sum();
        assert!((bags - 24_000.0).abs() < 1e-6);

        let fractions: f64 = rows.iter().map(|r| r.waste_fraction).sum();
        assert!((fractions - 1.0).abs() < 1e-12);
        for row in &rows {
            assert!((row.composition.solid_total() - row.predicted_waste_kg).abs() < 1e-6);
            assert!((row.resolved_capacity - row.features.production_volume / 0.8).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distribute_uniform_when_scores_zero() {
        let predictor =
            CalibratedPredictor::uncalibrated(ScoreWeights::default(), CompositionParams::default());
        let monthly: Vec<MonthlyFeatureRecord> =
            (1..=4).map(|m| month(2024, m, 0.0, 10.0, 28.0)).collect();
        let annual = vec![AnnualWasteRecord {
            year: 2024,
            waste_kg: 400.0,
            waste_bags: None,
        }];

        let rows = predictor.distribute(&annual, &monthly);
        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert!((row.waste_fraction - 0.25).abs() < 1e-12);
            assert!((row.predicted_waste_kg - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distribute_honours_supplied_capacity() {
        let predictor =
            CalibratedPredictor::uncalibrated(ScoreWeights::default(), CompositionParams::default());
        let mut rec = month(2024, 1, 1.0e6, 50.0, 28.0);
        rec.production_capacity = Some(2.0e6);
        let annual = vec![AnnualWasteRecord {
            year: 2024,
            waste_kg: 5.0e4,
            waste_bags: None,
        }];

        let rows = predictor.distribute(&annual, &[rec]);
        assert_eq!(rows[0].resolved_capacity, 2.0e6);
    }
}
