// ==========================================
// 盐田废弃物数字孪生 - 引擎层
// ==========================================
// 职责: 成分模型、校准预测、季节约束、工况优化
// 红线: 引擎不做 I/O, 不做边界校验（校验在 API 层）
// 红线: 数值有效输入下均为全函数, 不返回错误
// ==========================================

pub mod composition;
pub mod constraints;
pub mod optimizer;
pub mod predictor;

// 重导出核心引擎
pub use composition::{CompositionInput, SolidScores, WasteCompositionModel};
pub use constraints::{ConstraintViolation, FeatureInfo, SeasonalConstraintProvider};
pub use optimizer::{OptimizeOptions, WasteOptimizer};
pub use predictor::{potential_score, CalibratedPredictor, CalibrationFactor};
