//! # Question Importer
//!
//! 把老师粘贴的纯文本批量转换为结构化练习题
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 题目、导入格式、导入结果、导入任务
//! - `loaders` - 从 `*.toml` / `*.txt` 加载导入任务
//!
//! ### ② 解析层（Parser）
//! - `parser/` - 逐行状态机，`文本 + 格式 → 题目 + 诊断`
//! - `BulkImporter` - 解析入口，ID 策略可替换
//!
//! ### ③ 业务能力层（Services）
//! - `Shuffler` - 选项打乱
//! - `scoring` - 作答判分
//! - `exporter` - 导出回文本格式
//! - `ResultWriter` / `WarnWriter` - 写 JSON / 写 warn.txt
//!
//! ### ④ 流程层（Workflow）
//! - `ImportCtx` - 上下文封装（任务名 + 索引 + 格式）
//! - `ImportFlow` - 单个任务的流程（解析 → 诊断 → 写结果）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量任务处理器，管理并发
//! - `orchestrator/job_processor` - 单个任务处理器
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{ImportFormat, ImportJob, ImportResult, Question};
pub use orchestrator::{process_job, App};
pub use parser::{parse, BulkImporter};
pub use workflow::{ImportCtx, ImportFlow, ProcessResult};
