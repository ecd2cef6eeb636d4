//! 导入任务上下文
//!
//! 封装"我正在处理第几个任务、用什么格式"这一信息

use std::fmt::Display;

use crate::models::ImportFormat;

/// 导入任务上下文
#[derive(Debug, Clone)]
pub struct ImportCtx {
    /// 任务名称
    pub job_name: String,

    /// 任务索引（从1开始，仅用于日志显示）
    pub job_index: usize,

    /// 实际使用的导入格式
    pub format: ImportFormat,

    /// 选择题是否打乱选项
    pub shuffle_options: bool,
}

impl ImportCtx {
    pub fn new(
        job_name: String,
        job_index: usize,
        format: ImportFormat,
        shuffle_options: bool,
    ) -> Self {
        Self {
            job_name,
            job_index,
            format,
            shuffle_options,
        }
    }
}

impl Display for ImportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[任务 #{} {} 格式#{}]",
            self.job_index, self.job_name, self.format
        )
    }
}
