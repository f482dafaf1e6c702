// ==========================================
// 盐田废弃物数字孪生 - 孪生 API
// ==========================================
// 职责: 预测 / 区间模拟 / 优化 的统一入口
// 架构: API 层 (校验) → 引擎层 (纯计算) ; 导入层负责文件
// 状态: 启动时构造一次, 之后只读; 校准系数显式传入
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::dto::{
    HealthStatus, OptimizationRequest, PredictionRequest, PredictionResponse, SimulationRow,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::RequestValidator;
use crate::config::ModelConfig;
use crate::domain::history::{AnnualWasteRecord, MonthlyDistributionRow, MonthlyFeatureRecord};
use crate::domain::optimization::OptimizationResult;
use crate::engine::optimizer::WasteOptimizer;
use crate::engine::predictor::{CalibratedPredictor, CalibrationFactor};
use crate::importer::{ArchivedResult, ResultArchive};

/// 服务名
pub const SERVICE_NAME: &str = "Salt Waste Digital Twin";

// ==========================================
// TwinApi - 孪生 API
// ==========================================

/// 孪生 API 上下文
///
/// 持有只读的预测器与优化器; 可选挂载结果归档目录
pub struct TwinApi {
    predictor: Arc<CalibratedPredictor>,
    optimizer: WasteOptimizer,
    validator: RequestValidator,
    archive: Option<ResultArchive>,
}

impl TwinApi {
    /// 用给定校准系数构造
    ///
    /// # 参数
    /// - config: 模型配置
    /// - calibration: 校准系数（UNCALIBRATED 表示降级运行）
    pub fn new(config: &ModelConfig, calibration: CalibrationFactor) -> Self {
        let predictor = Arc::new(CalibratedPredictor::new(
            config.score_weights,
            config.composition,
            calibration,
        ));
        Self::from_predictor(predictor, config)
    }

    /// 用历史数据校准后构造
    pub fn from_history(
        config: &ModelConfig,
        annual: &[AnnualWasteRecord],
        monthly: &[MonthlyFeatureRecord],
    ) -> Self {
        let factor = CalibratedPredictor::calibrate(&config.score_weights, annual, monthly);
        Self::new(config, factor)
    }

    fn from_predictor(predictor: Arc<CalibratedPredictor>, config: &ModelConfig) -> Self {
        let optimizer = WasteOptimizer::new(Arc::clone(&predictor), config.optimizer);
        Self {
            predictor,
            optimizer,
            validator: RequestValidator::new(),
            archive: None,
        }
    }

    /// 挂载结果归档（每次优化后自动保存）
    pub fn with_archive(mut self, archive: ResultArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn predictor(&self) -> &CalibratedPredictor {
        &self.predictor
    }

    pub fn optimizer(&self) -> &WasteOptimizer {
        &self.optimizer
    }

    pub fn validator(&self) -> &RequestValidator {
        &self.validator
    }

    // ==========================================
    // 健康检查
    // ==========================================

    /// 校准状态
    pub fn health(&self) -> HealthStatus {
        let factor = self.predictor.calibration_factor();
        let calibrated = factor.is_calibrated();
        HealthStatus {
            status: if calibrated {
                "healthy".to_string()
            } else {
                "degraded (uncalibrated)".to_string()
            },
            service: SERVICE_NAME.to_string(),
            calibrated,
            calibration_factor: factor.value(),
            version: crate::VERSION.to_string(),
        }
    }

    // ==========================================
    // 预测
    // ==========================================

    /// 单月预测
    pub fn predict_single(&self, req: &PredictionRequest) -> ApiResult<PredictionResponse> {
        self.validator.validate_prediction(req)?;

        let prediction = self.predictor.predict_one_month(
            req.production_volume_kg,
            req.rain_sum_mm,
            req.temperature_mean_c,
            req.humidity_mean_percent,
            req.wind_speed_mean_kmh,
            req.production_capacity_kg,
        );
        Ok(PredictionResponse {
            percentages: prediction.percentages(req.production_volume_kg),
            prediction,
            calibrated: self.predictor.calibration_factor().is_calibrated(),
        })
    }

    /// 区间模拟: 对月初日期落在 [start, end] 内的历史记录逐月预测
    ///
    /// # 返回
    /// 按月初日期升序; 无匹配记录时返回空列表
    pub fn simulate_range(
        &self,
        records: &[MonthlyFeatureRecord],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<SimulationRow>> {
        check_range(start, end)?;

        let mut rows: Vec<SimulationRow> = records
            .iter()
            .filter_map(|r| r.month_start().map(|d| (d, r)))
            .filter(|(d, _)| *d >= start && *d <= end)
            .map(|(month_start, r)| SimulationRow {
                month_start,
                year: r.year,
                month: r.month,
                prediction: self.predictor.predict_record(r),
            })
            .collect();
        rows.sort_by_key(|r| r.month_start);

        tracing::info!(%start, %end, rows = rows.len(), "区间模拟完成");
        Ok(rows)
    }

    /// 已分摊结果的区间查询: 月初日期落在 [start, end] 内的行
    ///
    /// # 返回
    /// 按月初日期升序; 无匹配时返回空列表
    pub fn data_range(
        &self,
        rows: &[MonthlyDistributionRow],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<MonthlyDistributionRow>> {
        check_range(start, end)?;

        let mut matched: Vec<(NaiveDate, &MonthlyDistributionRow)> = rows
            .iter()
            .filter_map(|r| r.month_start().map(|d| (d, r)))
            .filter(|(d, _)| *d >= start && *d <= end)
            .collect();
        matched.sort_by_key(|(d, _)| *d);

        if matched.is_empty() {
            tracing::info!(%start, %end, "区间内无分摊数据");
        }
        Ok(matched.into_iter().map(|(_, r)| r.clone()).collect())
    }

    /// 年度实测按月分摊
    pub fn distribute(
        &self,
        annual: &[AnnualWasteRecord],
        monthly: &[MonthlyFeatureRecord],
    ) -> Vec<MonthlyDistributionRow> {
        self.predictor.distribute(annual, monthly)
    }

    // ==========================================
    // 优化
    // ==========================================

    /// 执行优化请求
    ///
    /// 求解器未收敛不视为错误, 以 success = false 返回
    pub fn optimize(&self, req: &OptimizationRequest) -> ApiResult<OptimizationResult> {
        let validated = self.validator.validate_optimization(req)?;

        let result = match &validated.targets {
            None => self
                .optimizer
                .optimize_minimize_waste(validated.month, &validated.options),
            Some(t) => self.optimizer.optimize_target_waste(
                &t.targets,
                validated.month,
                t.weights.as_ref(),
                &validated.options,
            ),
        };

        if !result.success {
            tracing::warn!(method = %result.method, message = %result.message, "优化未收敛");
        }

        if let Some(archive) = &self.archive {
            archive.save(req.mode.kind(), &result)?;
        }
        Ok(result)
    }

    /// 最近的归档结果; 未挂载归档时为空
    pub fn history(&self, limit: usize) -> ApiResult<Vec<ArchivedResult>> {
        match &self.archive {
            Some(archive) => Ok(archive.list(limit)?),
            None => Ok(Vec::new()),
        }
    }
}

/// 起始日期不得晚于结束日期
fn check_range(start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
    if start > end {
        return Err(ApiError::InvalidInput(format!(
            "起始日期 {} 晚于结束日期 {}",
            start, end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_reflects_calibration_sentinel() {
        let config = ModelConfig::default();
        let degraded = TwinApi::new(&config, CalibrationFactor::UNCALIBRATED);
        assert_eq!(degraded.health().status, "degraded (uncalibrated)");
        assert!(!degraded.health().calibrated);

        let healthy = TwinApi::new(&config, CalibrationFactor::new(0.042));
        assert_eq!(healthy.health().status, "healthy");
        assert_eq!(healthy.health().calibration_factor, 0.042);
    }

    #[test]
    fn test_simulate_range_rejects_inverted_range() {
        let api = TwinApi::new(&ModelConfig::default(), CalibrationFactor::new(0.04));
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            api.simulate_range(&[], start, end),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
