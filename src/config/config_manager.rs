// ==========================================
// 盐田废弃物数字孪生 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、快照
// 存储: JSON 文件（路径显式传入或取环境变量）
// ==========================================

use crate::config::model_config::ModelConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置键 / 环境变量
pub mod config_keys {
    /// 配置文件路径
    pub const CONFIG_PATH_ENV: &str = "SALT_WASTE_TWIN_CONFIG";
    /// 关闭种群并行评估（"0"/"false"/"off"）
    pub const PARALLEL_ENV: &str = "SALT_WASTE_TWIN_PARALLEL";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(String),

    #[error("配置值非法 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ModelConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 默认配置（无文件）
    pub fn with_defaults() -> Self {
        Self {
            config: ModelConfig::default(),
            source: None,
        }
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.to_path_buf());
        tracing::info!("已加载配置文件: {}", path.display());
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        validate(&config)?;

        Ok(Self {
            config,
            source: None,
        })
    }

    /// 按环境变量加载
    ///
    /// - SALT_WASTE_TWIN_CONFIG 指向配置文件; 未设置则使用默认值
    /// - SALT_WASTE_TWIN_PARALLEL=0 关闭并行评估
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut manager = match std::env::var(config_keys::CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim()))?,
            _ => {
                tracing::info!("未指定配置文件, 使用默认配置");
                Self::with_defaults()
            }
        };

        if let Ok(v) = std::env::var(config_keys::PARALLEL_ENV) {
            manager.config.optimizer.parallel_evaluation = !is_false(&v);
        }

        Ok(manager)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 获取生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 与优化结果一同归档, 保证结果可复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.config).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn is_false(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "n" | "off"
    )
}

fn invalid(key: &str, value: impl ToString, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// 配置不变量校验
fn validate(config: &ModelConfig) -> Result<(), ConfigError> {
    let w = &config.score_weights;
    if !w.production_weight.is_finite() || w.production_weight <= 0.0 {
        return Err(invalid(
            "score_weights.production_weight",
            w.production_weight,
            "必须为正数",
        ));
    }
    for (key, v) in [
        ("score_weights.rain_weight", w.rain_weight),
        ("score_weights.temp_weight", w.temp_weight),
    ] {
        if !v.is_finite() {
            return Err(invalid(key, v, "必须为有限数"));
        }
    }

    let c = &config.composition;
    for (key, v) in [
        ("composition.limestone_ratio", c.limestone_ratio),
        ("composition.gypsum_ratio", c.gypsum_ratio),
        ("composition.industrial_salt_ratio", c.industrial_salt_ratio),
        ("composition.reference_capacity_kg", c.reference_capacity_kg),
        ("composition.max_scale_efficiency", c.max_scale_efficiency),
        ("composition.baseline_utilization", c.baseline_utilization),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(invalid(key, v, "必须为正数"));
        }
    }
    for (key, v) in [
        ("composition.base_bittern_ratio", c.base_bittern_ratio),
        ("composition.intensity_bittern_ratio", c.intensity_bittern_ratio),
        ("composition.epsom_recovery", c.epsom_recovery),
        ("composition.potash_recovery", c.potash_recovery),
        ("composition.magnesium_oil_recovery", c.magnesium_oil_recovery),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(invalid(key, v, "不能为负"));
        }
    }

    let o = &config.optimizer;
    for (name, de) in [
        ("optimizer.minimize_global", &o.minimize_global),
        ("optimizer.target_global", &o.target_global),
    ] {
        if de.popsize == 0 {
            return Err(invalid(&format!("{}.popsize", name), de.popsize, "不能为 0"));
        }
        if !(de.mutation_min > 0.0 && de.mutation_min <= de.mutation_max && de.mutation_max <= 2.0)
        {
            return Err(invalid(
                &format!("{}.mutation", name),
                format!("[{}, {}]", de.mutation_min, de.mutation_max),
                "需满足 0 < min ≤ max ≤ 2",
            ));
        }
        if !(0.0..=1.0).contains(&de.recombination) {
            return Err(invalid(
                &format!("{}.recombination", name),
                de.recombination,
                "需在 [0, 1] 内",
            ));
        }
    }
    if o.local.max_iterations == 0 {
        return Err(invalid("optimizer.local.max_iterations", 0, "不能为 0"));
    }
    if !o.escalation_threshold.is_finite() || o.escalation_threshold < 0.0 {
        return Err(invalid(
            "optimizer.escalation_threshold",
            o.escalation_threshold,
            "不能为负",
        ));
    }

    Ok(())
}
