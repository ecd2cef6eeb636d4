//! 导入结果写入服务 - 业务能力层
//!
//! 把 `ImportResult` 序列化为 JSON，交给保存练习内容的下游使用

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FileError, Result};
use crate::models::ImportResult;

pub struct ResultWriter {
    output_folder: PathBuf,
}

impl ResultWriter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// 写入 `<输出目录>/<stem>.json`，返回文件路径
    pub async fn write(&self, stem: &str, result: &ImportResult) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_folder)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.output_folder.display().to_string(),
                source,
            })?;

        let path = self.output_folder.join(format!("{}.json", stem));
        let json = serde_json::to_string_pretty(result)?;
        write_file(&path, json.as_bytes()).await?;

        debug!("导入结果已写入: {}", path.display());
        Ok(path)
    }
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}
