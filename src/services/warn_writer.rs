//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::Diagnostic;

/// 警告写入服务
///
/// 职责：
/// - 把被跳过的行、被丢弃的题目追加到 warn.txt
/// - 每次只处理一个导入任务
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一个任务的全部诊断信息
    pub async fn write_diagnostics(
        &self,
        job_name: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }

        let content: String = diagnostics
            .iter()
            .map(|d| format!("任务 {} | {}\n", job_name, d))
            .collect();
        self.append(&content).await
    }

    /// 写入一条任务级别的警告
    pub async fn write(&self, job_name: &str, message: &str) -> Result<()> {
        self.append(&format!("任务 {} | {}\n", job_name, message))
            .await
    }

    async fn append(&self, content: &str) -> Result<()> {
        debug!("写入警告: {} 字节 -> {}", content.len(), self.warn_file_path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
