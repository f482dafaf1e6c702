use super::differential_evolution;
use super::local_search;
use super::objective::{predict_percentages, Objective, ObjectiveKind};
use super::outcome::SearchOutcome;
use super::search_space::SearchSpace;
use crate::config::OptimizerConfig;
use crate::domain::composition::WastePercentages;
use crate::domain::feature::{FeatureBounds, FeatureVector};
use crate::domain::optimization::{OptimizationMethod, OptimizationResult};
use crate::domain::types::{FeatureName, WasteCategory};
use crate::engine::constraints::SeasonalConstraintProvider;
use crate::engine::predictor::CalibratedPredictor;
use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// 细化阶段随机起点的种子偏移（与全局搜索种子错开）
const REFINEMENT_SEED_OFFSET: u64 = 0x5EED;

/// 单次优化调用的选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizeOptions {
    /// 固定产量 (kg); None 时产量参与搜索
    pub production_kg: Option<f64>,
    /// 最小化模式的搜索策略（目标模式固定先全局后细化）
    pub method: OptimizationMethod,
    /// true: 季节边界; false: 全局边界
    pub use_seasonal_constraints: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            production_kg: None,
            method: OptimizationMethod::LocalGradient,
            use_seasonal_constraints: true,
        }
    }
}

// ==========================================
// WasteOptimizer - 工况优化器
// ==========================================
#[derive(Debug, Clone)]
pub struct WasteOptimizer {
    predictor: Arc<CalibratedPredictor>,
    constraints: SeasonalConstraintProvider,
    config: OptimizerConfig,
}

impl WasteOptimizer {
    /// 构造函数
    ///
    /// # 参数
    /// - `predictor`: 已校准的预测器（只读共享）
    /// - `config`: 优化器参数
    pub fn new(predictor: Arc<CalibratedPredictor>, config: OptimizerConfig) -> Self {
        Self {
            predictor,
            constraints: SeasonalConstraintProvider::new(),
            config,
        }
    }

    pub fn predictor(&self) -> &CalibratedPredictor {
        &self.predictor
    }

    pub fn constraints(&self) -> &SeasonalConstraintProvider {
        &self.constraints
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 任意工况下各类别占产量百分比
    pub fn predict_waste_percentages(&self, features: &FeatureVector) -> WastePercentages {
        predict_percentages(&self.predictor, &features.to_array())
    }

    /// 本次搜索使用的边界: 季节/全局, 月份钉死, 可选固定产量
    pub fn search_bounds(&self, month: u32, options: &OptimizeOptions) -> FeatureBounds {
        let mut bounds = if options.use_seasonal_constraints {
            self.constraints.get_seasonal_bounds(month)
        } else {
            self.constraints.get_bounds()
        };
        if let Some(production) = options.production_kg {
            bounds.pin(FeatureName::Production, production);
        }
        bounds.pin(FeatureName::Month, month as f64);
        bounds
    }

    // ==========================================
    // 最小化模式
    // ==========================================

    /// 最小化总废弃物百分比
    ///
    /// - LocalGradient: 从边界中点出发做有界局部下降
    /// - DifferentialEvolution: 固定种子的全局搜索
    ///
    /// 求解器未收敛时 success = false, message 为求解器原因
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub fn optimize_minimize_waste(
        &self,
        month: u32,
        options: &OptimizeOptions,
    ) -> OptimizationResult {
        let bounds = self.search_bounds(month, options);
        let kind = ObjectiveKind::MinimizeTotal;

        let Some(space) = SearchSpace::from_bounds(&bounds) else {
            return self.incomplete_bounds_result(month, &bounds, None);
        };
        let objective = Objective::new(&self.predictor, &space, &kind);
        let f = |u: &[f64]| objective.eval(u);

        let outcome = match options.method {
            OptimizationMethod::LocalGradient => {
                local_search::minimize(&f, &space.midpoint(), &self.config.local)
            }
            OptimizationMethod::DifferentialEvolution => differential_evolution::minimize(
                &f,
                space.dim(),
                &self.config.minimize_global,
                &self.config.local,
                self.config.parallel_evaluation,
            ),
        };

        let result = self.finish(
            &space,
            outcome,
            objective.evaluations(),
            options.method.to_string(),
            month,
            None,
        );
        tracing::info!(
            month,
            success = result.success,
            objective = result.objective_value,
            "最小化优化完成"
        );
        result
    }

    // ==========================================
    // 目标模式
    // ==========================================

    /// 逼近目标百分比
    ///
    /// 两阶段升级:
    /// 1) 差分进化全局搜索（更大代数预算, 打磨）
    /// 2) 若目标值 > escalation_threshold, 从若干随机起点做局部细化
    ///
    /// 取所有阶段中目标值最低者; success / iterations / message / method 均来自该阶段
    ///
    /// 空目标字典由调用方拒绝, 此处按零罚分处理
    #[instrument(skip(self, targets, weights, options), fields(targets = targets.len()))]
    pub fn optimize_target_waste(
        &self,
        targets: &BTreeMap<WasteCategory, f64>,
        month: u32,
        weights: Option<&BTreeMap<WasteCategory, f64>>,
        options: &OptimizeOptions,
    ) -> OptimizationResult {
        let bounds = self.search_bounds(month, options);
        let kind = ObjectiveKind::target(targets, weights);

        let Some(space) = SearchSpace::from_bounds(&bounds) else {
            return self.incomplete_bounds_result(month, &bounds, Some(targets));
        };
        let objective = Objective::new(&self.predictor, &space, &kind);
        let f = |u: &[f64]| objective.eval(u);

        let global = differential_evolution::minimize(
            &f,
            space.dim(),
            &self.config.target_global,
            &self.config.local,
            self.config.parallel_evaluation,
        );
        tracing::debug!(fun = global.fun, success = global.success, "全局搜索阶段完成");

        let mut best = global;
        let mut method = stage_name(OptimizationMethod::DifferentialEvolution, false);

        if best.fun > self.config.escalation_threshold && space.dim() > 0 {
            tracing::warn!(
                fun = best.fun,
                threshold = self.config.escalation_threshold,
                starts = self.config.refinement_starts,
                "全局结果偏差过大, 启动多起点局部细化"
            );

            let mut rng = ChaCha8Rng::seed_from_u64(
                self.config.target_global.seed.wrapping_add(REFINEMENT_SEED_OFFSET),
            );
            let refine_cfg = self.config.local.with_ftol(self.config.refinement_ftol);
            for start in 0..self.config.refinement_starts {
                let x0: Vec<f64> = (0..space.dim()).map(|_| rng.random::<f64>()).collect();
                let refined = local_search::minimize(&f, &x0, &refine_cfg);
                tracing::debug!(start, fun = refined.fun, "局部细化");
                if refined.fun < best.fun {
                    method = stage_name(OptimizationMethod::DifferentialEvolution, true);
                    best = refined;
                }
            }
        }

        let result = self.finish(
            &space,
            best,
            objective.evaluations(),
            method,
            month,
            Some(targets),
        );
        tracing::info!(
            month,
            success = result.success,
            objective = result.objective_value,
            method = %result.method,
            "目标优化完成"
        );
        result
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 后处理: 还原物理坐标, 月份取整, 在最优点重新评估
    fn finish(
        &self,
        space: &SearchSpace,
        outcome: SearchOutcome,
        evaluations: u64,
        method: String,
        month: u32,
        targets: Option<&BTreeMap<WasteCategory, f64>>,
    ) -> OptimizationResult {
        let mut x = space.to_physical(&outcome.x);
        x[FeatureName::Month.index()] = x[FeatureName::Month.index()].round();

        let (optimal_features, success, message) = match FeatureVector::from_array(&x) {
            Ok(fv) => (fv, outcome.success, outcome.message),
            Err(e) => (
                fallback_features(&x, month),
                false,
                format!("{}; {}", outcome.message, e),
            ),
        };

        OptimizationResult {
            run_id: Uuid::new_v4(),
            success,
            predicted_waste: self.predict_waste_percentages(&optimal_features),
            optimal_features,
            target_waste: targets.cloned(),
            objective_value: outcome.fun,
            iterations: outcome.iterations,
            evaluations,
            method,
            message,
            generated_at: Utc::now(),
        }
    }

    /// 边界不完整时的失败结果（不执行搜索）
    fn incomplete_bounds_result(
        &self,
        month: u32,
        bounds: &FeatureBounds,
        targets: Option<&BTreeMap<WasteCategory, f64>>,
    ) -> OptimizationResult {
        tracing::warn!(month, bounds = %bounds, "搜索边界不完整");
        let x = [0.0, 0.0, 0.0, 0.0, 0.0, month as f64];
        let optimal_features = fallback_features(&x, month);
        OptimizationResult {
            run_id: Uuid::new_v4(),
            success: false,
            predicted_waste: self.predict_waste_percentages(&optimal_features),
            optimal_features,
            target_waste: targets.cloned(),
            objective_value: f64::INFINITY,
            iterations: 0,
            evaluations: 0,
            method: "none".to_string(),
            message: format!("incomplete search bounds: {}", bounds),
            generated_at: Utc::now(),
        }
    }
}

/// 结果中的方法名
fn stage_name(method: OptimizationMethod, refined: bool) -> String {
    if refined {
        format!("{}+local_refine", method)
    } else {
        method.to_string()
    }
}

/// 结构校验失败时仍需返回一个特征向量（月份截断到 1-12）
fn fallback_features(x: &[f64; 6], month: u32) -> FeatureVector {
    FeatureVector {
        temperature_c: x[0],
        humidity_pct: x[1],
        rainfall_mm: x[2],
        wind_speed_kmh: x[3],
        production_kg: x[4],
        month: month.clamp(1, 12),
    }
}
