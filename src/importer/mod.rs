// ==========================================
// 盐田废弃物数字孪生 - 导入层
// ==========================================
// 职责: 读取校准用历史数据, 写出分摊结果, 归档优化结果
// 支持: CSV / JSON
// 红线: 引擎层不做 I/O, 文件读写只在此处
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod result_archive;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{load_annual_records, load_monthly_records, write_distribution_csv};
pub use result_archive::{ArchivedResult, ResultArchive};
