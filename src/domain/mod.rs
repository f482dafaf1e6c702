// ==========================================
// 盐田废弃物数字孪生 - 领域模型层
// ==========================================
// 职责: 定义特征、边界、成分结果、历史记录、优化结果
// 红线: 不含 I/O, 不含引擎逻辑
// ==========================================

pub mod composition;
pub mod feature;
pub mod history;
pub mod optimization;
pub mod types;

// 重导出核心类型
pub use composition::{CompositionResult, WastePercentages, WastePrediction};
pub use feature::{FeatureBounds, FeatureError, FeatureVector};
pub use history::{AnnualWasteRecord, MonthlyDistributionRow, MonthlyFeatureRecord};
pub use optimization::{OptimizationMethod, OptimizationResult};
pub use types::{FeatureName, Season, WasteCategory};
