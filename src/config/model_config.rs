// ==========================================
// 盐田废弃物数字孪生 - 模型配置项
// ==========================================
// 所有字段带默认值, 配置文件可只写需要覆写的部分
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};

// ==========================================
// ScoreWeights - 废弃物潜力评分权重
// ==========================================
// score = production^pw * (1 + rw * rain/500 + tw * temp/35)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub production_weight: f64,
    pub rain_weight: f64,
    pub temp_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            production_weight: 1.0,
            rain_weight: 0.5,
            temp_weight: 0.1,
        }
    }
}

// ==========================================
// CompositionParams - 成分模型常量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionParams {
    // ===== 固体分配基准比例 =====
    pub limestone_ratio: f64,
    pub gypsum_ratio: f64,
    pub industrial_salt_ratio: f64,

    // ===== 规模效应 =====
    /// 规模效率基准产能 (kg)
    pub reference_capacity_kg: f64,
    /// 规模效率上限
    pub max_scale_efficiency: f64,
    /// 基准利用率; 缺失产能时 capacity = production / baseline
    pub baseline_utilization: f64,

    // ===== 苦卤 =====
    /// 每 kg 产能的基础苦卤 (L)
    pub base_bittern_ratio: f64,
    /// 每 kg 实际产量的增量苦卤 (L)
    pub intensity_bittern_ratio: f64,

    // ===== 回收系数 (每升苦卤) =====
    pub epsom_recovery: f64,
    pub potash_recovery: f64,
    pub magnesium_oil_recovery: f64,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            limestone_ratio: 0.15,
            gypsum_ratio: 0.60,
            industrial_salt_ratio: 0.25,
            reference_capacity_kg: 50_000.0,
            max_scale_efficiency: 1.2,
            baseline_utilization: 0.8,
            base_bittern_ratio: 0.3,
            intensity_bittern_ratio: 0.7,
            epsom_recovery: 0.05,
            potash_recovery: 0.02,
            magnesium_oil_recovery: 0.10,
        }
    }
}

// ==========================================
// LocalSearchConfig - 有界局部下降
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    pub max_iterations: u64,
    /// 相对目标值变化阈值
    pub ftol: f64,
    /// 投影梯度范数阈值（归一化坐标）
    pub gtol: f64,
    /// 有限差分步长（归一化坐标）
    pub fd_step: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            ftol: 1e-8,
            gtol: 1e-10,
            fd_step: 1e-6,
        }
    }
}

impl LocalSearchConfig {
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

// ==========================================
// DifferentialEvolutionConfig - 差分进化
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialEvolutionConfig {
    /// 最大代数
    pub max_generations: u64,
    /// 种群规模系数: 种群 = popsize × 自由维度数
    pub popsize: usize,
    /// 变异因子抖动区间 [min, max)
    pub mutation_min: f64,
    pub mutation_max: f64,
    /// 交叉概率
    pub recombination: f64,
    /// 收敛判据: std(能量) ≤ atol + tol × |mean(能量)|
    pub tol: f64,
    pub atol: f64,
    pub seed: u64,
    /// 收敛后是否以局部下降打磨最优个体
    pub polish: bool,
}

impl Default for DifferentialEvolutionConfig {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            popsize: 15,
            mutation_min: 0.5,
            mutation_max: 1.0,
            recombination: 0.7,
            tol: 1e-6,
            atol: 1e-6,
            seed: 42,
            polish: false,
        }
    }
}

impl DifferentialEvolutionConfig {
    /// 目标模式默认值: 更多代数 + 更严收敛 + 打磨
    pub fn target_mode() -> Self {
        Self {
            max_generations: 2000,
            tol: 1e-7,
            atol: 1e-7,
            polish: true,
            ..Self::default()
        }
    }
}

/// 差分进化参数的部分覆写; 未给出的字段取调用方指定的基准
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DifferentialEvolutionOverrides {
    max_generations: Option<u64>,
    popsize: Option<usize>,
    mutation_min: Option<f64>,
    mutation_max: Option<f64>,
    recombination: Option<f64>,
    tol: Option<f64>,
    atol: Option<f64>,
    seed: Option<u64>,
    polish: Option<bool>,
}

impl DifferentialEvolutionOverrides {
    fn apply(self, base: DifferentialEvolutionConfig) -> DifferentialEvolutionConfig {
        DifferentialEvolutionConfig {
            max_generations: self.max_generations.unwrap_or(base.max_generations),
            popsize: self.popsize.unwrap_or(base.popsize),
            mutation_min: self.mutation_min.unwrap_or(base.mutation_min),
            mutation_max: self.mutation_max.unwrap_or(base.mutation_max),
            recombination: self.recombination.unwrap_or(base.recombination),
            tol: self.tol.unwrap_or(base.tol),
            atol: self.atol.unwrap_or(base.atol),
            seed: self.seed.unwrap_or(base.seed),
            polish: self.polish.unwrap_or(base.polish),
        }
    }
}

/// target_global 缺省字段取目标模式默认值
fn deserialize_target_global<'de, D>(deserializer: D) -> Result<DifferentialEvolutionConfig, D::Error>
where
    D: Deserializer<'de>,
{
    DifferentialEvolutionOverrides::deserialize(deserializer)
        .map(|o| o.apply(DifferentialEvolutionConfig::target_mode()))
}

// ==========================================
// OptimizerConfig - 优化器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub local: LocalSearchConfig,
    /// 最小化模式选用全局搜索时的参数
    pub minimize_global: DifferentialEvolutionConfig,
    /// 目标模式全局搜索参数（部分覆写时其余字段取 target_mode()）
    #[serde(deserialize_with = "deserialize_target_global")]
    pub target_global: DifferentialEvolutionConfig,
    /// 目标模式升级阈值: 全局结果目标值高于此值时启动多起点局部细化
    pub escalation_threshold: f64,
    /// 多起点局部细化次数
    pub refinement_starts: usize,
    /// 局部细化 ftol
    pub refinement_ftol: f64,
    /// 种群评估是否并行
    pub parallel_evaluation: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            local: LocalSearchConfig::default(),
            minimize_global: DifferentialEvolutionConfig::default(),
            target_global: DifferentialEvolutionConfig::target_mode(),
            escalation_threshold: 0.1,
            refinement_starts: 3,
            refinement_ftol: 1e-9,
            parallel_evaluation: true,
        }
    }
}

// ==========================================
// ModelConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub score_weights: ScoreWeights,
    pub composition: CompositionParams,
    pub optimizer: OptimizerConfig,
}
