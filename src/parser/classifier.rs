//! 行分类器
//!
//! 优先级（从上到下）：
//! 1. 续接选项编号的行（仅在题目打开时，见 `continues_enumeration`）
//! 2. 段落说明 `A. ...`
//! 3. 题目开始 `Q1:` / `Question 2` / `3.`
//! 4. 选项行（仅选择题）
//! 5. 解释行 `#...` / `Explanation:` / `Answer:`
//! 6. 干扰项行 `Distractors:`（仅拖拽题）
//! 7. 其他内容（括号片段、cloze 片段、普通文本由状态机继续处理）

use regex::Regex;
use std::sync::LazyLock;

use super::state::{DraftOption, Phase};
use super::text::{split_explanation, split_unescaped, strip_correct_markers, unescape};
use crate::models::FormatDescriptor;

static INSTRUCTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]\.\s+\S").unwrap());

static QUESTION_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Q\d*:|Q\d+[.)]|(?i:question)\s*\d+\s*[:.)]?|\d+[.):](?:\s+|$))\s*").unwrap()
});

/// `A.` `b)` `C:` 或 `1.` `2)`
static ENUMERATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z])(?:\.(?:\s+|$)|[:)]\s*)|(\d+)(?:\.(?:\s+|$)|\)\s*))").unwrap()
});

static BOOLEAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*=]?\s*(?:true|false|yes|no)\s*\*?\s*(?:#.*)?$").unwrap()
});

static EXPLANATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:explanation|answer)\s*:\s*").unwrap());

static DISTRACTORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^distractors?\s*:\s*").unwrap());

/// 行的类别
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    /// 段落说明（整行保留）
    Instruction(&'a str),
    /// 题目开始，携带去掉编号后的剩余内容
    QuestionStart(&'a str),
    Option(DraftOption),
    Explanation(&'a str),
    Distractors(Vec<String>),
    /// 交给状态机按格式继续处理的内容
    Content(&'a str),
}

/// 分类时需要的状态机上下文
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'d> {
    pub descriptor: &'d FormatDescriptor,
    pub phase: Phase,
    /// 当前题目已有的选项数
    pub option_count: usize,
    /// 当前题目第一个选项的编号方式
    pub option_style: Option<OptionStyle>,
}

/// 选项的编号方式：字母一组，数字一组，两者不互相续接
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStyle {
    Letter,
    Number,
}

/// 选项编号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enumeration {
    Letter(char),
    Number(usize),
}

impl Enumeration {
    fn style(self) -> OptionStyle {
        match self {
            Enumeration::Letter(_) => OptionStyle::Letter,
            Enumeration::Number(_) => OptionStyle::Number,
        }
    }
}

/// 对一行进行分类
pub fn classify<'a>(line: &'a str, ctx: &ClassifyContext<'_>) -> LineKind<'a> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    let enumerated = ctx.descriptor.option_lines.then(|| enumeration(line)).flatten();

    // 题目打开时，续接编号的行一定是选项：`A. 3` 不是段落说明，`2) x` 不是新题
    if let Some((enumeration, rest)) = enumerated {
        let open = matches!(ctx.phase, Phase::InQuestionBody | Phase::InOptions);
        if open && continues_enumeration(enumeration, ctx.option_count, ctx.option_style) {
            return LineKind::Option(parse_option(rest));
        }
    }

    if INSTRUCTION_RE.is_match(line) {
        return LineKind::Instruction(line);
    }

    if let Some(m) = QUESTION_START_RE.find(line) {
        return LineKind::QuestionStart(line[m.end()..].trim());
    }

    if ctx.descriptor.option_lines {
        if let Some((_, rest)) = enumerated {
            return LineKind::Option(parse_option(rest));
        }
        if BOOLEAN_RE.is_match(line) || line.starts_with('=') {
            return LineKind::Option(parse_option(line));
        }
    }

    if let Some(rest) = line.strip_prefix('#') {
        return LineKind::Explanation(rest.trim());
    }
    if let Some(m) = EXPLANATION_RE.find(line) {
        return LineKind::Explanation(line[m.end()..].trim());
    }

    if ctx.descriptor.distractor_lines {
        if let Some(m) = DISTRACTORS_RE.find(line) {
            return LineKind::Distractors(parse_distractors(&line[m.end()..]));
        }
    }

    LineKind::Content(line)
}

fn enumeration(line: &str) -> Option<(Enumeration, &str)> {
    let caps = ENUMERATED_RE.captures(line)?;
    let end = caps.get(0)?.end();

    let enumeration = if let Some(letter) = caps.get(1) {
        Enumeration::Letter(letter.as_str().chars().next()?)
    } else {
        Enumeration::Number(caps.get(2)?.as_str().parse().ok()?)
    };

    Some((enumeration, &line[end..]))
}

/// 编号是否紧接着当前选项：第 n 个选项之后应为 `A + n` 或 `n + 1`，
/// 且编号方式与第一个选项相同
fn continues_enumeration(
    enumeration: Enumeration,
    option_count: usize,
    style: Option<OptionStyle>,
) -> bool {
    if style.is_some_and(|s| s != enumeration.style()) {
        return false;
    }
    match enumeration {
        Enumeration::Letter(c) => {
            option_count < 26 && c.to_ascii_uppercase() == (b'A' + option_count as u8) as char
        }
        Enumeration::Number(n) => n == option_count + 1,
    }
}

/// 选项行的编号方式（`True` / `=x` 之类没有编号的行返回 `None`）
pub fn option_style(line: &str) -> Option<OptionStyle> {
    enumeration(line.trim()).map(|(e, _)| e.style())
}

/// 解析选项文本：`#` 后为单个选项的解释，`*` / `=` 标记正确答案
pub fn parse_option(raw: &str) -> DraftOption {
    let (text, explanation) = split_explanation(raw);
    let (text, correct) = strip_correct_markers(text);

    DraftOption {
        text: unescape(text),
        correct,
        explanation: explanation.map(unescape).unwrap_or_default(),
    }
}

fn parse_distractors(raw: &str) -> Vec<String> {
    split_unescaped(raw, &[','])
        .into_iter()
        .map(|s| unescape(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}
