//! Moodle cloze 选择题片段：`{1:MC:=对~错#解释~错}`
//!
//! 作者常把长选项列表折行，所以片段可以跨越多行。
//! 分词前先把每个片段合并回一行，再按行分类。

use regex::Regex;
use std::sync::LazyLock;

use super::state::{DraftOption, SourceLine};
use super::text::{collapse_spaces, split_explanation, split_unescaped, unescape};
use crate::models::ChoiceLayout;

/// `{权重:类型:内容}`，内容可跨行，`\}` 为转义
static CLOZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{(\d*):([A-Z_]+):((?:\\.|[^\\}])*)\}").unwrap());

/// 换行 + 空白 + `~` 折叠为 `~`
static TILDE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\r?\n\s*~").unwrap());

/// 其余换行折叠为一个空格
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\r?\n[ \t]*").unwrap());

/// `%100%` / `%-50%` 权重前缀
static WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^%(-?\d+(?:\.\d+)?)%").unwrap());

/// 一个 cloze 选择题片段
#[derive(Debug, Clone, PartialEq)]
pub struct ClozeSpan {
    pub layout: ChoiceLayout,
    pub options: Vec<DraftOption>,
}

/// 选择题类型对应的呈现方式，非选择题类型返回 `None`
fn layout_for(kind: &str) -> Option<ChoiceLayout> {
    match kind {
        "MC" | "MCS" | "MULTICHOICE" | "MULTICHOICE_S" => Some(ChoiceLayout::Dropdown),
        "MCV" | "MCVS" | "MULTICHOICE_V" | "MULTICHOICE_VS" => Some(ChoiceLayout::Vertical),
        "MCH" | "MCHS" | "MULTICHOICE_H" | "MULTICHOICE_HS" => Some(ChoiceLayout::Horizontal),
        _ => None,
    }
}

/// 把原文拆成逻辑行，跨行的选择题片段合并为一行
///
/// 合并后的行使用片段起始处的原始行号
pub fn merge_lines(text: &str) -> Vec<SourceLine> {
    let mut builder = LineBuilder::default();
    let mut last = 0;

    for caps in CLOZE_RE.captures_iter(text) {
        let (Some(whole), Some(kind)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if layout_for(kind.as_str()).is_none() {
            continue;
        }

        builder.push_plain(&text[last..whole.start()]);
        builder.push_merged(whole.as_str());
        last = whole.end();
    }
    builder.push_plain(&text[last..]);

    builder.finish()
}

/// 逐段拼接逻辑行，同时记录原始行号
struct LineBuilder {
    lines: Vec<SourceLine>,
    current: String,
    /// 当前逻辑行的起始行号
    line_no: usize,
    /// 已经消耗到的原始行号
    orig_line: usize,
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            line_no: 1,
            orig_line: 1,
        }
    }
}

impl LineBuilder {
    fn push_plain(&mut self, segment: &str) {
        for c in segment.chars() {
            if c == '\n' {
                self.lines
                    .push(SourceLine::new(self.line_no, self.current.trim_end_matches('\r')));
                self.current.clear();
                self.orig_line += 1;
                self.line_no = self.orig_line;
            } else {
                self.current.push(c);
            }
        }
    }

    fn push_merged(&mut self, span: &str) {
        self.orig_line += span.matches('\n').count();
        self.current.push_str(&collapse_span(span));
    }

    fn finish(mut self) -> Vec<SourceLine> {
        self.lines
            .push(SourceLine::new(self.line_no, self.current.trim_end_matches('\r')));
        self.lines
    }
}

/// 片段内部的换行折叠
fn collapse_span(span: &str) -> String {
    let span = TILDE_BREAK_RE.replace_all(span, "~");
    LINE_BREAK_RE.replace_all(&span, " ").into_owned()
}

/// 行内是否含有选择题片段
pub fn contains_span(line: &str) -> bool {
    CLOZE_RE
        .captures_iter(line)
        .any(|caps| caps.get(2).is_some_and(|k| layout_for(k.as_str()).is_some()))
}

/// 提取行内全部选择题片段，返回去掉片段后的正文和片段列表
pub fn extract(line: &str) -> (String, Vec<ClozeSpan>) {
    let mut spans = Vec::new();
    let mut body = String::with_capacity(line.len());
    let mut last = 0;

    for caps in CLOZE_RE.captures_iter(line) {
        let (Some(whole), Some(kind), Some(content)) = (caps.get(0), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let Some(layout) = layout_for(kind.as_str()) else {
            continue;
        };

        body.push_str(&line[last..whole.start()]);
        last = whole.end();
        spans.push(ClozeSpan {
            layout,
            options: parse_options(content.as_str()),
        });
    }
    body.push_str(&line[last..]);

    (collapse_spaces(&body), spans)
}

/// 解析 `~` 分隔的选项
fn parse_options(content: &str) -> Vec<DraftOption> {
    split_unescaped(content, &['~'])
        .into_iter()
        .filter_map(parse_option)
        .collect()
}

fn parse_option(raw: &str) -> Option<DraftOption> {
    let raw = raw.trim();
    let mut weighted_correct = false;

    let raw = match WEIGHT_RE.captures(raw) {
        Some(caps) => {
            weighted_correct = caps
                .get(1)
                .and_then(|w| w.as_str().parse::<f64>().ok())
                .is_some_and(|w| w >= 100.0);
            raw[caps.get(0).map_or(0, |m| m.end())..].trim_start()
        }
        None => raw,
    };

    let (text, explanation) = split_explanation(raw);
    let correct = text.trim_start().starts_with('=') || weighted_correct;
    let text = match text.trim_start().strip_prefix('=') {
        Some(rest) => rest.trim(),
        None => text.trim(),
    };
    let text = unescape(text);
    if text.is_empty() {
        return None;
    }

    Some(DraftOption {
        text,
        correct,
        explanation: explanation.map(unescape).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_multiline_span() {
        let text = "Intro line\n\
                    The capital of France is {1:MCV:=Paris#Correct!\n   ~London\n   \
                    ~Berlin} indeed.\nNext";
        let lines = merge_lines(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(
            lines[1].text,
            "The capital of France is {1:MCV:=Paris#Correct!~London~Berlin} indeed."
        );
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[2].text, "Next");
        assert_eq!(lines[2].number, 5);
    }

    #[test]
    fn test_other_newlines_become_spaces() {
        let lines = merge_lines("{1:MC:=a long\noption~b}");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "{1:MC:=a long option~b}");
    }

    #[test]
    fn test_non_choice_spans_untouched() {
        let lines = merge_lines("{1:SHORTANSWER:=x\n}");
        assert_eq!(lines.len(), 2);
        assert!(!contains_span("{1:SHORTANSWER:=x}"));
    }

    #[test]
    fn test_extract_options_and_layout() {
        let (body, spans) = extract("Pick one: {1:MULTICHOICE:wrong~=right#because~%0%other} ok");
        assert_eq!(body, "Pick one: ok");
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.layout, ChoiceLayout::Dropdown);
        let texts: Vec<_> = span.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["wrong", "right", "other"]);
        assert!(span.options[1].correct);
        assert_eq!(span.options[1].explanation, "because");
        assert!(!span.options[2].correct);
    }

    #[test]
    fn test_weight_and_escapes() {
        let (_, spans) = extract(r"{2:MCH:%100%C\# language~Java\~Script}");
        let span = &spans[0];
        assert_eq!(span.layout, ChoiceLayout::Horizontal);
        assert!(span.options[0].correct);
        assert_eq!(span.options[0].text, "C# language");
        assert_eq!(span.options[1].text, "Java~Script");
    }
}
