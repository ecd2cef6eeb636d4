//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量任务处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载任务（Vec<ImportJob>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `job_processor` - 单个任务处理器
//! - 确定格式和打乱设置，构建 ImportCtx
//! - 委托 ImportFlow 完成解析和写入
//! - 清理文件
//! - 输出单个任务的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ImportJob>)
//!     ↓
//! job_processor (处理单个 ImportJob)
//!     ↓
//! workflow::ImportFlow (解析 → 写诊断 → 写结果)
//!     ↓
//! parser + services (能力层：解析 / 写入)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，job_processor 管单个
//! 2. **向下依赖**：编排层 → workflow → parser / services
//! 3. **无业务逻辑**：只做调度和统计，不做具体解析判断

pub mod batch_processor;
pub mod job_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use job_processor::{process_job, JobStats};
