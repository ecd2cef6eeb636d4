//! 批量任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量导入任务的调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、输出启动信息
//! 2. **批量加载**：扫描并加载所有待处理的任务（`Vec<ImportJob>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将任务分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有任务的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个任务的细节
//! - **并发安全**：任务之间不共享可变状态，通过 tokio::spawn 并发
//! - **向下委托**：委托 job_processor 处理单个任务

use crate::config::Config;
use crate::models::ImportJob;
use crate::orchestrator::job_processor::{self, JobStats};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_jobs_loaded, log_startup,
    print_final_stats,
};
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(config.max_concurrent_jobs, config.default_format.name());

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let all_jobs = self.load_jobs().await?;

        if all_jobs.is_empty() {
            warn!("⚠️ 没有找到待导入的文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_jobs_loaded(all_jobs.len(), self.config.max_concurrent_jobs);

        let stats = self.process_all_jobs(all_jobs).await?;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            stats.questions,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    async fn load_jobs(&self) -> Result<Vec<ImportJob>> {
        info!("\n📁 正在扫描待导入的文件...");
        crate::models::load_all_jobs(&self.config.input_folder).await
    }

    /// 处理所有任务
    async fn process_all_jobs(&self, all_jobs: Vec<ImportJob>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_jobs;
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_jobs = all_jobs.len();
        let total_batches = total_jobs.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_jobs,
            ..Default::default()
        };

        for (batch_idx, batch_jobs) in all_jobs.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch_jobs.len(),
                total_jobs,
            );

            let batch_result = self
                .process_batch(batch_jobs, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;
            stats.questions += batch_result.questions;

            log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_jobs: &[ImportJob],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::with_capacity(batch_jobs.len());

        for (idx, job) in batch_jobs.iter().enumerate() {
            let job_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let job = job.clone();
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                job_processor::process_job(job, job_index, &config)
                    .await
                    .inspect_err(|e| error!("[任务 {}] ❌ 处理过程中发生错误: {:#}", job_index, e))
            });
            batch_handles.push(handle);
        }

        let mut result = BatchResult::default();

        for (offset, joined) in join_all(batch_handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(Some(JobStats { questions, .. }))) => {
                    result.success += 1;
                    result.questions += questions;
                }
                Ok(Ok(None)) | Ok(Err(_)) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[任务 {}] 任务执行失败: {}", batch_start + offset + 1, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    /// 导入的题目总数
    pub questions: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
    questions: usize,
}
