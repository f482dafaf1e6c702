/// 单个搜索阶段的结果（归一化坐标）
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchOutcome {
    pub x: Vec<f64>,
    pub fun: f64,
    pub iterations: u64,
    pub evaluations: u64,
    pub success: bool,
    pub message: String,
}
