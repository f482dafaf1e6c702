// ==========================================
// 盐田废弃物数字孪生 - API 层
// ==========================================
// 职责: 请求校验 + 引擎调用编排, 供二进制入口或上层服务调用
// ==========================================

pub mod dto;
pub mod error;
pub mod twin_api;
pub mod validator;

// 重导出核心类型
pub use dto::{
    HealthStatus, OptimizationMode, OptimizationRequest, PredictionRequest, PredictionResponse,
    SimulationRow,
};
pub use error::{ApiError, ApiResult};
pub use twin_api::TwinApi;
pub use validator::{RequestValidator, ValidatedOptimization, ValidatedTargets};
