// ==========================================
// 盐田废弃物数字孪生 - API层错误类型
// ==========================================
// 职责: 边界校验错误 + 下层错误转换
// 要求: 错误信息必须指明字段、取值与违反的边界
// ==========================================

use crate::config::ConfigError;
use crate::domain::feature::FeatureError;
use crate::domain::types::FeatureName;
use crate::engine::constraints::ConstraintViolation;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求校验错误
    // ==========================================
    #[error("特征越界: {field}={value:.2} outside bounds [{min}, {max}]")]
    FeatureOutOfBounds {
        field: FeatureName,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("月份非法: month must be integer 1-12, got {0}")]
    InvalidMonth(f64),

    #[error("目标模式需要至少一个目标类别")]
    EmptyTarget,

    #[error("未知废弃物类别: {0}")]
    UnknownCategory(String),

    #[error("目标值非法: {category}={value}")]
    InvalidTargetValue { category: String, value: f64 },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 下层错误
    // ==========================================
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("特征向量非法: {0}")]
    Feature(#[from] FeatureError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ConstraintViolation 转换
// ==========================================
impl From<ConstraintViolation> for ApiError {
    fn from(v: ConstraintViolation) -> Self {
        match v {
            ConstraintViolation::OutOfBounds {
                field,
                value,
                min,
                max,
            } => ApiError::FeatureOutOfBounds {
                field,
                value,
                min,
                max,
            },
            ConstraintViolation::InvalidMonth(m) => ApiError::InvalidMonth(m),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
