// ==========================================
// 盐田废弃物数字孪生 - 优化结果归档
// ==========================================
// 每次优化结果存为一个 JSON 文件: {kind}_{时间戳}_{run_id 前 8 位}.json
// 历史列表按时间戳倒序
// ==========================================

use crate::domain::optimization::OptimizationResult;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 历史列表单项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedResult {
    pub file_name: String,
    /// "minimize" / "target"
    pub kind: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

// ==========================================
// ResultArchive - 结果归档目录
// ==========================================
#[derive(Debug, Clone)]
pub struct ResultArchive {
    dir: PathBuf,
}

impl ResultArchive {
    /// 打开归档目录（不存在则创建）
    pub fn open<P: AsRef<Path>>(dir: P) -> ImportResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 保存结果, 返回文件路径
    pub fn save(&self, kind: &str, result: &OptimizationResult) -> ImportResult<PathBuf> {
        let run = result.run_id.simple().to_string();
        let file_name = format!(
            "{}_{}_{}.json",
            kind,
            result.generated_at.format("%Y%m%d_%H%M%S"),
            &run[..8]
        );
        let path = self.dir.join(file_name);

        let json = serde_json::to_string_pretty(result)
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        fs::write(&path, json).map_err(|e| ImportError::FileWriteError(e.to_string()))?;

        tracing::debug!(path = %path.display(), "优化结果已归档");
        Ok(path)
    }

    /// 读取已归档结果
    ///
    /// file_name 只能是归档目录下的文件名, 不接受路径
    pub fn load(&self, file_name: &str) -> ImportResult<OptimizationResult> {
        if !is_plain_file_name(file_name) {
            return Err(ImportError::InvalidFileName(file_name.to_string()));
        }
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| ImportError::RecordError {
            row: 0,
            message: e.to_string(),
        })
    }

    /// 最近的归档记录（最多 limit 条）
    pub fn list(&self, limit: usize) -> ImportResult<Vec<ArchivedResult>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            let meta = entry.metadata()?;
            let kind = file_name
                .split('_')
                .next()
                .unwrap_or_default()
                .to_string();
            entries.push(ArchivedResult {
                file_name,
                kind,
                size_bytes: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| stamp(&b.file_name).cmp(stamp(&a.file_name)));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// 不含路径分隔符且不是 "." / ".." 的单个文件名
fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..")
        && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name)
}

/// 文件名中 kind 之后的部分（时间戳 + run_id）
fn stamp(file_name: &str) -> &str {
    file_name
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(file_name)
}
