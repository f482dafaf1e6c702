// ==========================================
// 盐田废弃物数字孪生 - 优化结果
// ==========================================
// 每次优化调用产出一次, 产出后不可变
// ==========================================

use crate::domain::composition::WastePercentages;
use crate::domain::feature::FeatureVector;
use crate::domain::types::{FeatureName, WasteCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ==========================================
// 搜索方法 (Optimization Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMethod {
    /// 有界局部梯度下降（中点起步）
    #[default]
    LocalGradient,
    /// 差分进化（全局种群搜索, 固定种子）
    DifferentialEvolution,
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationMethod::LocalGradient => write!(f, "local_gradient"),
            OptimizationMethod::DifferentialEvolution => write!(f, "differential_evolution"),
        }
    }
}

impl FromStr for OptimizationMethod {
    type Err = String;

    /// 兼容历史调用方传入的 scipy 方法名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slsqp" | "l-bfgs-b" | "trust-constr" | "local" | "local_gradient" => {
                Ok(OptimizationMethod::LocalGradient)
            }
            "differential_evolution" | "de" | "global" => {
                Ok(OptimizationMethod::DifferentialEvolution)
            }
            other => Err(format!("未知优化方法: {}", other)),
        }
    }
}

// ==========================================
// OptimizationResult - 优化结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub run_id: Uuid,
    pub success: bool,
    pub optimal_features: FeatureVector,
    /// 最优点处各类别占产量百分比
    pub predicted_waste: WastePercentages,
    /// 目标模式下的目标百分比
    pub target_waste: Option<WastePercentages>,
    pub objective_value: f64,
    pub iterations: u64,
    /// 目标函数调用次数
    pub evaluations: u64,
    /// 实际产出结果的搜索阶段
    pub method: String,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "OPTIMIZATION RESULTS")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Status: {}",
            if self.success { "SUCCESS" } else { "FAILED" }
        )?;
        writeln!(f, "Method: {}", self.method)?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Evaluations: {}", self.evaluations)?;
        writeln!(f, "Objective Value: {:.6}", self.objective_value)?;
        if !self.message.is_empty() {
            writeln!(f, "Message: {}", self.message)?;
        }

        writeln!(f, "{}", rule)?;
        writeln!(f, "OPTIMAL FEATURES")?;
        for name in FeatureName::ORDER {
            if name == FeatureName::Month {
                writeln!(f, "{:<20} {:>14}", name.as_str(), self.optimal_features.month)?;
            } else {
                writeln!(
                    f,
                    "{:<20} {:>14.2}",
                    name.as_str(),
                    self.optimal_features.get(name)
                )?;
            }
        }

        writeln!(f, "{}", rule)?;
        writeln!(f, "PREDICTED WASTE (% of production)")?;
        for (category, pct) in &self.predicted_waste {
            let target = self
                .target_waste
                .as_ref()
                .and_then(|t| t.get(category))
                .map(|t| format!(" (Target: {:.4}%, Diff: {:+.4}%)", t, pct - t))
                .unwrap_or_default();
            writeln!(f, "{:<20} {:>12.4}%{}", category.label(), pct, target)?;
        }
        write!(f, "{}", rule)
    }
}

impl OptimizationResult {
    /// 目标类别的实际偏差（预测 - 目标）
    pub fn deviations(&self) -> Vec<(WasteCategory, f64)> {
        match &self.target_waste {
            Some(targets) => targets
                .iter()
                .map(|(c, t)| (*c, self.predicted_waste.get(c).copied().unwrap_or(0.0) - t))
                .collect(),
            None => Vec::new(),
        }
    }
}
