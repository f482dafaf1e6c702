// ==========================================
// 盐田废弃物数字孪生 - 工况优化器
// ==========================================
// 职责: 固定月份（可选固定产量）, 在六维有界特征空间中搜索
// 输入: 校准预测器 (黑盒目标函数) + 季节/全局边界
// 输出: OptimizationResult（最优工况 + 该点的成分百分比）
// ==========================================
// 两种目标:
// - 最小化: 总废弃物 / 产量 × 100
// - 逼近目标: Σ w × (预测 - 目标)², 双侧罚分
// 每次调用独立, 无跨调用状态
// ==========================================

mod core;
mod differential_evolution;
mod local_search;
mod objective;
mod outcome;
mod search_space;


pub use core::{OptimizeOptions, WasteOptimizer};
