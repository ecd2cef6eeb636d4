//! 解析状态机
//!
//! 逐行推进，所有跨行的可变状态（当前段落说明、当前题目、导语）
//! 都保存在 `ParserState` 里，而不是散落在循环的局部变量中。

use tracing::debug;

use super::brackets::{self, BracketLine};
use super::classifier::{self, classify, ClassifyContext, LineKind, OptionStyle};
use super::cloze;
use crate::models::{ChoiceLayout, Diagnostic, FormatDescriptor, SkipReason};

/// 一个逻辑行（行号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// 按换行拆分（不处理 cloze 合并）
pub fn split_lines(text: &str) -> Vec<SourceLine> {
    text.lines()
        .enumerate()
        .map(|(i, line)| SourceLine::new(i + 1, line))
        .collect()
}

/// 解析阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// 没有打开的题目
    #[default]
    AwaitingQuestion,
    /// 正在累积题干
    InQuestionBody,
    /// 已经出现选项（或 cloze 片段）
    InOptions,
    /// 已经出现解释
    InExplanation,
}

/// 解析中的选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOption {
    pub text: String,
    pub correct: bool,
    pub explanation: String,
}

/// 一道正在累积的题目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    /// 题目开始的行号
    pub line: usize,
    /// 是否由 `Q1:` 之类的编号打开
    pub opened_by_marker: bool,
    /// 打开题目时的段落说明
    pub instruction: Option<String>,
    pub body: Vec<String>,
    pub options: Vec<DraftOption>,
    /// 第一个带编号的选项决定后续选项的编号方式
    pub option_style: Option<OptionStyle>,
    pub explanation: Vec<String>,
    /// 每个答案片段的备选项
    pub spans: Vec<Vec<String>>,
    pub empty_spans: usize,
    pub distractors: Vec<String>,
    pub layout: Option<ChoiceLayout>,
}

/// 状态机输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBlock {
    pub drafts: Vec<Draft>,
    pub intro: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// 解析状态
#[derive(Debug, Clone)]
pub struct ParserState {
    descriptor: FormatDescriptor,
    phase: Phase,
    instruction: Option<String>,
    current: Option<Draft>,
    drafts: Vec<Draft>,
    intro: Vec<String>,
    seen_question: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ParserState {
    pub fn new(descriptor: FormatDescriptor) -> Self {
        Self {
            descriptor,
            phase: Phase::AwaitingQuestion,
            instruction: None,
            current: None,
            drafts: Vec::new(),
            intro: Vec::new(),
            seen_question: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    pub fn current(&self) -> Option<&Draft> {
        self.current.as_ref()
    }

    /// 处理一个逻辑行
    pub fn feed(&mut self, line: &SourceLine) {
        let ctx = ClassifyContext {
            descriptor: &self.descriptor,
            phase: self.phase,
            option_count: self.current.as_ref().map_or(0, |d| d.options.len()),
            option_style: self.current.as_ref().and_then(|d| d.option_style),
        };

        match classify(&line.text, &ctx) {
            LineKind::Blank => {}
            LineKind::Instruction(text) => {
                self.close_question();
                self.instruction = Some(text.to_string());
            }
            LineKind::QuestionStart(rest) => {
                self.close_question();
                self.open_question(line.number, true);
                if !rest.is_empty() {
                    self.feed_content(line.number, rest);
                }
            }
            LineKind::Option(option) => match self.current.as_mut() {
                Some(draft) => {
                    if draft.option_style.is_none() {
                        draft.option_style = classifier::option_style(&line.text);
                    }
                    draft.options.push(option);
                    self.phase = Phase::InOptions;
                }
                None => self.skip(line.number, SkipReason::OrphanOption),
            },
            LineKind::Explanation(text) => match self.current.as_mut() {
                Some(draft) => {
                    draft.explanation.push(text.to_string());
                    self.phase = Phase::InExplanation;
                }
                None => self.skip(line.number, SkipReason::OrphanExplanation),
            },
            LineKind::Distractors(items) => match self.current.as_mut() {
                Some(draft) => draft.distractors.extend(items),
                None => self.skip(line.number, SkipReason::OrphanDistractors),
            },
            LineKind::Content(text) => self.feed_content(line.number, text),
        }
    }

    /// 结束解析，关闭最后一道题
    pub fn finish(mut self) -> ParsedBlock {
        self.close_question();

        let intro = self.intro.join("\n");
        ParsedBlock {
            drafts: self.drafts,
            intro: (!intro.is_empty()).then_some(intro),
            diagnostics: self.diagnostics,
        }
    }

    /// 记录一条诊断（题目级别的丢弃由收尾阶段记录）
    pub fn skip(&mut self, line: usize, reason: SkipReason) {
        debug!("跳过第 {} 行: {}", line, reason);
        self.diagnostics.push(Diagnostic { line, reason });
    }

    fn feed_content(&mut self, number: usize, text: &str) {
        if self.descriptor.cloze_spans && cloze::contains_span(text) {
            self.feed_cloze(number, text);
            return;
        }

        if self.descriptor.bracket_spans && brackets::contains_span(text) {
            let parsed = brackets::extract(text, self.descriptor.placeholder);
            if parsed.unclosed {
                self.skip(number, SkipReason::UnclosedBracket);
            }
            if parsed.has_brackets() {
                self.feed_bracketed(number, parsed);
                return;
            }
        }

        self.feed_text(number, text);
    }

    /// cloze 行：片段前的文字是题干，第一个片段提供选项
    fn feed_cloze(&mut self, number: usize, text: &str) {
        let (body, spans) = cloze::extract(text);

        let completed = matches!(self.phase, Phase::InOptions | Phase::InExplanation);
        if self.current.is_none() || completed {
            self.close_question();
            self.open_question(number, false);
        }

        let mut spans = spans.into_iter();
        if let Some(draft) = self.current.as_mut() {
            if !body.is_empty() {
                draft.body.push(body);
            }
            if let Some(first) = spans.next() {
                draft.layout = Some(first.layout);
                draft.options = first.options;
            }
        }
        self.phase = Phase::InOptions;

        if spans.next().is_some() {
            self.skip(number, SkipReason::ExtraClozeSpan);
        }
    }

    /// 括号行：由编号打开的题目继续累积，否则每行一道题
    fn feed_bracketed(&mut self, number: usize, parsed: BracketLine) {
        let joins_current = self.current.as_ref().is_some_and(|d| d.opened_by_marker);
        if !joins_current {
            self.close_question();
            self.open_question(number, false);
        }

        if let Some(draft) = self.current.as_mut() {
            if !parsed.display.is_empty() {
                draft.body.push(parsed.display);
            }
            draft.spans.extend(parsed.spans);
            draft.empty_spans += parsed.empty_spans;
        }
    }

    fn feed_text(&mut self, number: usize, text: &str) {
        if self.current.is_some() {
            // cloze 题在选项之后出现的文字属于下一道题
            let completed = matches!(self.phase, Phase::InOptions | Phase::InExplanation);
            if self.descriptor.cloze_spans && completed {
                self.close_question();
                self.open_question(number, false);
            }
            self.push_body(text);
            return;
        }

        if !self.descriptor.captures_intro {
            self.open_question(number, false);
            self.push_body(text);
            return;
        }

        // 段落说明之后、下一题之前的文字属于说明
        if let Some(instruction) = self.instruction.as_mut() {
            instruction.push('\n');
            instruction.push_str(text);
        } else if !self.seen_question {
            self.intro.push(text.to_string());
        } else {
            self.open_question(number, false);
            self.push_body(text);
        }
    }

    fn push_body(&mut self, text: &str) {
        if let Some(draft) = self.current.as_mut() {
            draft.body.push(text.to_string());
        }
    }

    fn open_question(&mut self, number: usize, opened_by_marker: bool) {
        self.current = Some(Draft {
            line: number,
            opened_by_marker,
            instruction: self.instruction.clone(),
            ..Draft::default()
        });
        self.seen_question = true;
        self.phase = Phase::InQuestionBody;
    }

    fn close_question(&mut self) {
        if let Some(draft) = self.current.take() {
            self.drafts.push(draft);
        }
        self.phase = Phase::AwaitingQuestion;
    }
}
