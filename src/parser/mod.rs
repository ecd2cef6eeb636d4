//! 批量导入解析器
//!
//! `原始文本 + 格式 → 题目列表 + 诊断信息`
//!
//! ## 处理步骤
//!
//! 1. 拆行（cloze 格式先把跨行片段合并为一行，见 `cloze`）
//! 2. 逐行分类并推进状态机（`classifier` + `state`）
//! 3. 每道草稿题规范化（`finalize`），不合格的题目只产生诊断
//!
//! 解析永远不会失败：最坏的结果是零道题。

pub mod brackets;
pub mod classifier;
pub mod cloze;
pub mod finalize;
pub mod ids;
pub mod state;
pub mod text;

pub use ids::{BatchIdGenerator, IdSource, SequentialIds};
pub use state::{Phase, SourceLine};

use tracing::debug;

use crate::models::{FormatDescriptor, ImportFormat, ImportResult};
use state::ParserState;

/// 批量导入器
///
/// 每次 `parse` 都使用独立的状态；ID 来源在多次调用之间共享，
/// 因此同一个导入器多次导入也不会产生重复 ID。
#[derive(Debug, Clone)]
pub struct BulkImporter<I: IdSource = BatchIdGenerator> {
    descriptor: FormatDescriptor,
    ids: I,
}

impl BulkImporter<BatchIdGenerator> {
    pub fn new(format: ImportFormat) -> Self {
        Self {
            descriptor: format.descriptor(),
            ids: BatchIdGenerator::new(),
        }
    }
}

impl<I: IdSource> BulkImporter<I> {
    /// 使用自定义的 ID 生成策略
    pub fn with_ids<J: IdSource>(self, ids: J) -> BulkImporter<J> {
        BulkImporter {
            descriptor: self.descriptor,
            ids,
        }
    }

    /// 覆盖选择题默认的打乱设置
    pub fn with_shuffle(mut self, shuffle_options: bool) -> Self {
        self.descriptor = self.descriptor.with_shuffle(shuffle_options);
        self
    }

    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    /// 解析一整块文本
    pub fn parse(&mut self, text: &str) -> ImportResult {
        if text.trim().is_empty() {
            return ImportResult::default();
        }

        let lines = if self.descriptor.cloze_spans {
            cloze::merge_lines(text)
        } else {
            state::split_lines(text)
        };

        let mut state = ParserState::new(self.descriptor);
        for line in &lines {
            state.feed(line);
        }
        let block = state.finish();

        let mut diagnostics = block.diagnostics;
        let mut questions = Vec::with_capacity(block.drafts.len());
        for draft in block.drafts {
            match finalize::finalize(draft, &self.descriptor, &mut self.ids) {
                Ok(question) => questions.push(question),
                Err(diagnostic) => {
                    debug!("丢弃题目 {}", diagnostic);
                    diagnostics.push(diagnostic);
                }
            }
        }
        diagnostics.sort_by_key(|d| d.line);

        debug!(
            "{} 解析完成: {} 行, {} 道题, {} 条诊断",
            self.descriptor.format,
            lines.len(),
            questions.len(),
            diagnostics.len()
        );

        ImportResult::new(questions, block.intro, diagnostics)
    }
}

/// 使用默认 ID 策略解析一块文本
pub fn parse(text: &str, format: ImportFormat) -> ImportResult {
    BulkImporter::new(format).parse(text)
}
