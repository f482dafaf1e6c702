// ==========================================
// 盐田废弃物数字孪生 - 核心库
// ==========================================
// 系统定位: 盐田废弃物成分预测 + 工况逆向优化
// 技术栈: Rust (纯计算核心) + CSV/JSON 数据交换
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 数据类型
pub mod domain;

// 引擎层 - 成分模型 / 校准 / 约束 / 优化
pub mod engine;

// 导入层 - 历史数据与结果归档
pub mod importer;

// 配置层 - 模型与优化器参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 校验与编排
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FeatureName, Season, WasteCategory};

// 领域实体
pub use domain::{
    AnnualWasteRecord, CompositionResult, FeatureBounds, FeatureVector, MonthlyDistributionRow,
    MonthlyFeatureRecord, OptimizationMethod, OptimizationResult, WastePercentages,
    WastePrediction,
};

// 引擎
pub use engine::{
    CalibratedPredictor, CalibrationFactor, OptimizeOptions, SeasonalConstraintProvider,
    WasteCompositionModel, WasteOptimizer,
};

// 配置
pub use config::{ConfigManager, ModelConfig};

// API
pub use api::{ApiError, ApiResult, TwinApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "盐田废弃物数字孪生";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
