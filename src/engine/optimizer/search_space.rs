use crate::domain::feature::FeatureBounds;
use crate::domain::types::FeatureName;

/// 归一化搜索空间
///
/// 求解器只看到自由维度的 [0, 1] 坐标; lo == hi 的维度（月份、固定产量）
/// 不参与搜索, 还原时直接取边界值
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchSpace {
    lower: [f64; 6],
    upper: [f64; 6],
    free: Vec<usize>,
}

impl SearchSpace {
    /// 由完整的六维边界构造; 缺项返回 None
    pub(crate) fn from_bounds(bounds: &FeatureBounds) -> Option<Self> {
        let arr = bounds.to_array()?;
        let lower = arr.map(|(lo, _)| lo);
        let upper = arr.map(|(_, hi)| hi);
        let free = FeatureName::ORDER
            .iter()
            .map(|n| n.index())
            .filter(|&i| upper[i] > lower[i])
            .collect();
        Some(Self { lower, upper, free })
    }

    /// 自由维度数
    pub(crate) fn dim(&self) -> usize {
        self.free.len()
    }

    /// 归一化坐标 → 物理特征数组（按 FeatureName::ORDER）
    pub(crate) fn to_physical(&self, u: &[f64]) -> [f64; 6] {
        let mut x = self.lower;
        for (k, &i) in self.free.iter().enumerate() {
            let t = u.get(k).copied().unwrap_or(0.5).clamp(0.0, 1.0);
            x[i] = self.lower[i] + t * (self.upper[i] - self.lower[i]);
        }
        x
    }

    /// 物理特征数组 → 归一化坐标（截断到 [0, 1]）
    #[cfg(test)]
    pub(crate) fn to_unit(&self, x: &[f64; 6]) -> Vec<f64> {
        self.free
            .iter()
            .map(|&i| ((x[i] - self.lower[i]) / (self.upper[i] - self.lower[i])).clamp(0.0, 1.0))
            .collect()
    }

    /// 边界中点
    pub(crate) fn midpoint(&self) -> Vec<f64> {
        vec![0.5; self.dim()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> FeatureBounds {
        FeatureBounds::from_entries(&[
            (FeatureName::Temperature, 26.0, 32.0),
            (FeatureName::Humidity, 70.0, 90.0),
            (FeatureName::Rainfall, 80.0, 220.0),
            (FeatureName::WindSpeed, 15.0, 26.0),
            (FeatureName::Production, 2.0e6, 2.0e6),
            (FeatureName::Month, 7.0, 7.0),
        ])
    }

    #[test]
    fn test_fixed_dimensions_are_excluded() {
        let space = SearchSpace::from_bounds(&bounds()).unwrap();
        assert_eq!(space.dim(), 4);

        let x = space.to_physical(&space.midpoint());
        assert_eq!(x, [29.0, 80.0, 150.0, 20.5, 2.0e6, 7.0]);
        assert_eq!(space.to_unit(&x), vec![0.5; 4]);
    }

    #[test]
    fn test_incomplete_bounds_rejected() {
        let partial = FeatureBounds::from_entries(&[(FeatureName::Month, 7.0, 7.0)]);
        assert!(SearchSpace::from_bounds(&partial).is_none());
    }
}
