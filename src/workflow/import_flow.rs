//! 导入流程 - 流程层
//!
//! 核心职责：定义"一个导入任务"的完整处理流程
//!
//! 流程顺序：
//! 1. 按格式解析文本
//! 2. 诊断信息写入 warn.txt
//! 3. 结果写入 JSON
//! 4. 没有有效题目时额外写一条警告（兜底）

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ImportError;
use crate::models::{ImportJob, ImportResult, NO_VALID_QUESTIONS};
use crate::parser::BulkImporter;
use crate::services::{ResultWriter, WarnWriter};
use crate::utils::logging::truncate_text;
use crate::workflow::import_ctx::ImportCtx;

/// 任务处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 至少导入了一道题
    Success { questions: usize, diagnostics: usize },
    /// 没有有效题目
    Skipped,
}

/// 导入流程
///
/// - 编排单个任务的处理流程
/// - 决定何时写结果、何时写警告
/// - 只依赖业务能力（parser / services）
pub struct ImportFlow {
    result_writer: ResultWriter,
    warn_writer: WarnWriter,
    verbose_logging: bool,
}

impl ImportFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            result_writer: ResultWriter::new(&config.output_folder),
            warn_writer: WarnWriter::with_path(&config.warn_file),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, job: &ImportJob, ctx: &ImportCtx) -> Result<ProcessResult> {
        if job.text.trim().is_empty() {
            let err = ImportError::EmptyJob {
                name: job.name.clone(),
            };
            warn!("{} ⚠️ {}，写入 warn.txt", ctx, err);
            self.warn_writer.write(&job.name, &err.to_string()).await?;
            return Ok(ProcessResult::Skipped);
        }

        info!("{} 文本: {}", ctx, truncate_text(job.text.trim(), 60));

        // ========== 解析 ==========
        let result = BulkImporter::new(ctx.format)
            .with_shuffle(ctx.shuffle_options)
            .parse(&job.text);

        info!(
            "{} ✓ 解析完成: {} 道题, {} 条诊断",
            ctx,
            result.imported_count,
            result.diagnostics.len()
        );

        if self.verbose_logging {
            self.log_questions(ctx, &result);
        }

        // ========== 诊断 ==========
        if !result.diagnostics.is_empty() {
            for diagnostic in &result.diagnostics {
                debug!("{} {}", ctx, diagnostic);
            }
            self.warn_writer
                .write_diagnostics(&job.name, &result.diagnostics)
                .await?;
        }

        // ========== 写结果 ==========
        let path = self.result_writer.write(&job.file_stem(), &result).await?;
        info!("{} 📄 结果已写入: {}", ctx, path.display());

        // ========== 兜底 ==========
        if let Some(message) = result.summary_message() {
            warn!("{} ⚠️ {}，写入 warn.txt", ctx, message);
            self.warn_writer.write(&job.name, NO_VALID_QUESTIONS).await?;
            return Ok(ProcessResult::Skipped);
        }

        Ok(ProcessResult::Success {
            questions: result.imported_count,
            diagnostics: result.diagnostics.len(),
        })
    }

    // ========== 日志辅助方法 ==========

    fn log_questions(&self, ctx: &ImportCtx, result: &ImportResult) {
        if let Some(intro) = &result.intro {
            info!("{}   导语: {}", ctx, truncate_text(intro, 40));
        }
        for (i, question) in result.questions.iter().enumerate() {
            info!(
                "{}   {}. [{}] {}",
                ctx,
                i + 1,
                question.id(),
                truncate_text(question.question_text(), 40)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImportFormat;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            output_folder: dir.join("out").to_string_lossy().into_owned(),
            warn_file: dir.join("warn.txt").to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_success_writes_json_and_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ImportFlow::new(&config(dir.path()));
        let job = ImportJob::new(
            "unit 3",
            ImportFormat::SimpleMc,
            "Q1: lonely\nA. only\nQ2: 2+2\nA. 3\nB. 4 *",
        );
        let ctx = ImportCtx::new(job.name.clone(), 1, ImportFormat::SimpleMc, true);

        let outcome = flow.run(&job, &ctx).await.unwrap();
        assert_eq!(
            outcome,
            ProcessResult::Success {
                questions: 1,
                diagnostics: 1
            }
        );

        let output = dir.path().join("out").join(format!("{}.json", job.file_stem()));
        let json = std::fs::read_to_string(output).unwrap();
        let result: ImportResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.imported_count, 1);

        let warn = std::fs::read_to_string(dir.path().join("warn.txt")).unwrap();
        assert!(warn.contains("第 1 行"));
    }

    #[tokio::test]
    async fn test_no_questions_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ImportFlow::new(&config(dir.path()));
        let job = ImportJob::new("prose", ImportFormat::FillBlank, "Nothing to see here.");
        let ctx = ImportCtx::new(job.name.clone(), 1, ImportFormat::FillBlank, true);

        assert_eq!(flow.run(&job, &ctx).await.unwrap(), ProcessResult::Skipped);
        let warn = std::fs::read_to_string(dir.path().join("warn.txt")).unwrap();
        assert!(warn.contains(NO_VALID_QUESTIONS));
    }

    #[tokio::test]
    async fn test_empty_job_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ImportFlow::new(&config(dir.path()));
        let job = ImportJob::new("blank", ImportFormat::FillBlank, "   ");
        let ctx = ImportCtx::new(job.name.clone(), 1, ImportFormat::FillBlank, true);

        assert_eq!(flow.run(&job, &ctx).await.unwrap(), ProcessResult::Skipped);
        assert!(!dir.path().join("out").exists());
    }
}
