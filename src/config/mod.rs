// ==========================================
// 盐田废弃物数字孪生 - 配置层
// ==========================================
// 职责: 模型常量、评分权重、优化器参数
// 存储: JSON 文件, 缺省项取默认值
// ==========================================

pub mod config_manager;
pub mod model_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use model_config::{
    CompositionParams, DifferentialEvolutionConfig, LocalSearchConfig, ModelConfig,
    OptimizerConfig, ScoreWeights,
};
