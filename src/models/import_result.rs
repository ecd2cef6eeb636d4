use serde::{Deserialize, Serialize};

use super::question::Question;

/// 没有导入任何题目时展示给作者的提示
pub const NO_VALID_QUESTIONS: &str = "No valid questions found";

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SkipReason {
    /// 选项行之前没有题目
    OrphanOption,
    /// 解释行之前没有题目
    OrphanExplanation,
    /// 干扰项行之前没有题目
    OrphanDistractors,
    /// 选择题选项少于 2 个
    TooFewOptions { found: usize },
    /// 答案括号全部为空
    EmptyBrackets,
    /// 下拉框选项少于 2 个
    InvalidDropdown,
    /// 题目没有任何可接受的答案
    NoAnswer,
    /// 同一道题出现了多个 cloze 片段，只使用第一个
    ExtraClozeSpan,
    /// 括号没有闭合
    UnclosedBracket,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OrphanOption => write!(f, "选项行之前没有题目"),
            SkipReason::OrphanExplanation => write!(f, "解释行之前没有题目"),
            SkipReason::OrphanDistractors => write!(f, "干扰项行之前没有题目"),
            SkipReason::TooFewOptions { found } => {
                write!(f, "选项不足 2 个 (实际 {} 个)", found)
            }
            SkipReason::EmptyBrackets => write!(f, "答案括号全部为空"),
            SkipReason::InvalidDropdown => write!(f, "下拉框选项不足 2 个"),
            SkipReason::NoAnswer => write!(f, "没有可接受的答案"),
            SkipReason::ExtraClozeSpan => write!(f, "多余的 cloze 片段已忽略"),
            SkipReason::UnclosedBracket => write!(f, "括号没有闭合"),
        }
    }
}

/// 诊断信息（行号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub reason: SkipReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "第 {} 行: {}", self.line, self.reason)
    }
}

/// 一次批量导入的结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub questions: Vec<Question>,
    pub imported_count: usize,
    /// 第一道题之前的导语
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportResult {
    pub fn new(
        questions: Vec<Question>,
        intro: Option<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            imported_count: questions.len(),
            questions,
            intro,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imported_count == 0
    }

    /// 没有导入任何题目时返回提示语
    pub fn summary_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_VALID_QUESTIONS)
    }
}
