//! 单个任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个导入任务，是任务级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **确定格式**：任务指定的格式优先，否则使用配置
//! 2. **流程调度**：委托 `ImportFlow` 完成解析与写入
//! 3. **文件清理**：导入成功后按配置删除输入文件
//! 4. **统计输出**：记录导入的题目和诊断数量

use crate::config::Config;
use crate::error::FileError;
use crate::models::ImportJob;
use crate::workflow::{ImportCtx, ImportFlow, ProcessResult};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// 单个任务的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JobStats {
    pub questions: usize,
    pub diagnostics: usize,
}

/// 处理单个导入任务
///
/// # 参数
/// - `job`: 任务数据
/// - `job_index`: 任务索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 导入了至少一道题时返回 `Some(统计)`，否则返回 `None`
pub async fn process_job(
    job: ImportJob,
    job_index: usize,
    config: &Config,
) -> Result<Option<JobStats>> {
    let format = job.format_or(config.default_format);
    let shuffle_options = job.shuffle_options.unwrap_or(config.shuffle_options);
    let ctx = ImportCtx::new(job.name.clone(), job_index, format, shuffle_options);

    log_job_start(&ctx, job.file_path.as_deref());

    let flow = ImportFlow::new(config);
    let outcome = flow
        .run(&job, &ctx)
        .await
        .with_context(|| format!("导入任务失败: {}", job.name))?;

    let stats = match outcome {
        ProcessResult::Success {
            questions,
            diagnostics,
        } => Some(JobStats {
            questions,
            diagnostics,
        }),
        ProcessResult::Skipped => None,
    };

    // 未导入任何题目的文件保留，便于老师修改后重新导入
    if config.remove_processed_files && stats.is_some() {
        cleanup_file(job.file_path.as_deref(), job_index).await?;
    }
    log_job_complete(&ctx, stats);

    Ok(stats)
}

/// 清理已处理的文件
async fn cleanup_file(file_path: Option<&str>, job_index: usize) -> Result<()> {
    info!("[任务 {}] 🗑️ 清理已处理的文件...", job_index);

    let Some(file_path) = file_path else {
        warn!("[任务 {}] ⚠️ 文件路径未设置", job_index);
        return Ok(());
    };

    if Path::new(file_path).exists() {
        tokio::fs::remove_file(file_path)
            .await
            .map_err(|source| FileError::DeleteFailed {
                path: file_path.to_string(),
                source,
            })?;
        info!(
            "[任务 {}] ✓ 文件已删除: {}",
            job_index,
            Path::new(file_path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
        );
    } else {
        warn!("[任务 {}] ⚠️ 文件不存在: {}", job_index, file_path);
    }

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_job_start(ctx: &ImportCtx, file_path: Option<&str>) {
    info!("{} 开始处理", ctx);
    if let Some(path) = file_path {
        info!("{} 文件: {}", ctx, path);
    }
}

fn log_job_complete(ctx: &ImportCtx, stats: Option<JobStats>) {
    match stats {
        Some(stats) => info!(
            "{} ✅ 任务完成: 导入 {} 道题, 诊断 {} 条",
            ctx, stats.questions, stats.diagnostics
        ),
        None => warn!("{} ⚠️ 任务没有导入任何题目", ctx),
    }
}
