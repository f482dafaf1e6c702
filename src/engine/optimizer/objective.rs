use super::search_space::SearchSpace;
use crate::domain::composition::WastePercentages;
use crate::domain::types::{FeatureName, WasteCategory};
use crate::engine::predictor::CalibratedPredictor;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 目标函数类型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ObjectiveKind {
    /// 最小化总废弃物百分比
    MinimizeTotal,
    /// Σ w × (预测 - 目标)²; 未列出的类别不计罚分
    Target {
        targets: BTreeMap<WasteCategory, f64>,
        weights: BTreeMap<WasteCategory, f64>,
    },
}

impl ObjectiveKind {
    /// 构造目标模式; 未指定权重的类别默认 1.0
    pub(crate) fn target(
        targets: &BTreeMap<WasteCategory, f64>,
        weights: Option<&BTreeMap<WasteCategory, f64>>,
    ) -> Self {
        let weights = targets
            .keys()
            .map(|c| (*c, weights.and_then(|w| w.get(c)).copied().unwrap_or(1.0)))
            .collect();
        ObjectiveKind::Target {
            targets: targets.clone(),
            weights,
        }
    }

    /// 对百分比结果计算目标值
    pub(crate) fn score(&self, percentages: &WastePercentages) -> f64 {
        let value = match self {
            ObjectiveKind::MinimizeTotal => percentages
                .get(&WasteCategory::TotalWaste)
                .copied()
                .unwrap_or(f64::INFINITY),
            ObjectiveKind::Target { targets, weights } => targets
                .iter()
                .map(|(c, target)| {
                    let predicted = percentages.get(c).copied().unwrap_or(0.0);
                    let w = weights.get(c).copied().unwrap_or(1.0);
                    w * (predicted - target).powi(2)
                })
                .sum(),
        };
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    }
}

/// 绑定到搜索空间的目标函数, 记录调用次数
///
/// 只读共享, 可在 rayon 线程间并发调用
pub(crate) struct Objective<'a> {
    predictor: &'a CalibratedPredictor,
    space: &'a SearchSpace,
    kind: &'a ObjectiveKind,
    evaluations: AtomicU64,
}

impl<'a> Objective<'a> {
    pub(crate) fn new(
        predictor: &'a CalibratedPredictor,
        space: &'a SearchSpace,
        kind: &'a ObjectiveKind,
    ) -> Self {
        Self {
            predictor,
            space,
            kind,
            evaluations: AtomicU64::new(0),
        }
    }

    /// 归一化坐标处的目标值
    pub(crate) fn eval(&self, u: &[f64]) -> f64 {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let x = self.space.to_physical(u);
        self.kind.score(&predict_percentages(self.predictor, &x))
    }

    pub(crate) fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

/// 物理特征数组处的各类别百分比
///
/// 不传产能, 由模型按基准利用率估算
pub(crate) fn predict_percentages(predictor: &CalibratedPredictor, x: &[f64; 6]) -> WastePercentages {
    let production = x[FeatureName::Production.index()];
    let prediction = predictor.predict_one_month(
        production,
        x[FeatureName::Rainfall.index()],
        x[FeatureName::Temperature.index()],
        x[FeatureName::Humidity.index()],
        x[FeatureName::WindSpeed.index()],
        None,
    );
    prediction.percentages(production)
}
