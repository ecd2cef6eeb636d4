//! `[...]` 答案片段扫描
//!
//! 手写扫描器：HTML 标签（`<img src="a[1].png">`）内部的方括号不算答案片段。

use super::text::{collapse_spaces, split_unescaped, unescape};

/// 答案备选项的分隔符
pub const ALTERNATIVE_SEPARATORS: &[char] = &['|', '/', ','];

/// 一行的扫描结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketLine {
    /// 替换答案片段后的显示文本
    pub display: String,
    /// 每个非空片段的备选项（已 trim，保持顺序）
    pub spans: Vec<Vec<String>>,
    /// 内容为空的片段数量（原样保留在显示文本中）
    pub empty_spans: usize,
    /// 是否存在未闭合的 `[`
    pub unclosed: bool,
}

impl BracketLine {
    /// 是否出现过任何括号片段
    pub fn has_brackets(&self) -> bool {
        !self.spans.is_empty() || self.empty_spans > 0
    }
}

/// 行内是否可能包含答案片段（快速判断）
pub fn contains_span(line: &str) -> bool {
    match line.find('[') {
        Some(open) => line[open..].contains(']'),
        None => false,
    }
}

/// 扫描一行，提取答案片段并生成显示文本
///
/// `placeholder` 为 `None` 时片段被直接移除，并折叠多余空格
pub fn extract(line: &str, placeholder: Option<&str>) -> BracketLine {
    let mut result = BracketLine::default();
    let mut display = String::with_capacity(line.len());
    let mut in_tag = false;
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let width = c.len_utf8();
        match c {
            '<' if !in_tag && opens_tag(rest) => {
                in_tag = true;
                display.push(c);
                rest = &rest[width..];
            }
            '>' if in_tag => {
                in_tag = false;
                display.push(c);
                rest = &rest[width..];
            }
            '[' if !in_tag => match rest.find(']') {
                Some(close) => {
                    let content = rest[1..close].trim();
                    let alternatives = split_alternatives(content);
                    if alternatives.is_empty() {
                        result.empty_spans += 1;
                        display.push_str(&rest[..=close]);
                    } else {
                        result.spans.push(alternatives);
                        if let Some(p) = placeholder {
                            display.push_str(p);
                        }
                    }
                    rest = &rest[close + 1..];
                }
                None => {
                    result.unclosed = true;
                    display.push_str(rest);
                    rest = "";
                }
            },
            _ => {
                display.push(c);
                rest = &rest[width..];
            }
        }
    }

    result.display = if placeholder.is_some() {
        display.trim().to_string()
    } else {
        collapse_spaces(&display)
    };
    result
}

/// `<` 后紧跟字母、`/` 或 `!` 且后面有 `>` 才算 HTML 标签；`x < 5` 只是小于号
fn opens_tag(rest: &str) -> bool {
    let starts_tag = rest[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
    starts_tag && rest[1..].contains('>')
}

/// 把片段内容按 `|` `/` `,` 拆成备选项，丢弃空项
pub fn split_alternatives(content: &str) -> Vec<String> {
    split_unescaped(content, ALTERNATIVE_SEPARATORS)
        .into_iter()
        .map(|s| unescape(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BLANK_PLACEHOLDER;

    #[test]
    fn test_single_blank_with_placeholder() {
        let line = extract(
            "By the time I arrived, everyone [had left] (leave)!",
            Some(BLANK_PLACEHOLDER),
        );
        assert_eq!(line.display, "By the time I arrived, everyone _____ (leave)!");
        assert_eq!(line.spans, vec![vec!["had left".to_string()]]);
    }

    #[test]
    fn test_alternatives_keep_order() {
        let line = extract("I [am|'m] here, you [are / 're] there.", Some("_____"));
        assert_eq!(line.spans[0], vec!["am", "'m"]);
        assert_eq!(line.spans[1], vec!["are", "'re"]);
        assert_eq!(line.display, "I _____ here, you _____ there.");
    }

    #[test]
    fn test_escaped_separator() {
        assert_eq!(split_alternatives(r"1\,000 | 1000"), vec!["1,000", "1000"]);
    }

    #[test]
    fn test_removed_without_placeholder() {
        let line = extract("By the time I arrived, everyone [had left] (leave)!", None);
        assert_eq!(line.display, "By the time I arrived, everyone (leave)!");
    }

    #[test]
    fn test_empty_span_kept_literal() {
        let line = extract("Nothing [ ] here", Some("_____"));
        assert!(line.spans.is_empty());
        assert_eq!(line.empty_spans, 1);
        assert!(line.has_brackets());
        assert_eq!(line.display, "Nothing [ ] here");
    }

    #[test]
    fn test_brackets_inside_tags_ignored() {
        let line = extract(r#"<img src="a[1].png"> It [is] red."#, Some("_____"));
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.display, r#"<img src="a[1].png"> It _____ red."#);
    }

    #[test]
    fn test_less_than_sign_is_not_a_tag() {
        let line = extract("If x < 5 then x [is] small.", Some("_____"));
        assert_eq!(line.spans, vec![vec!["is".to_string()]]);
        assert_eq!(line.display, "If x < 5 then x _____ small.");

        let line = extract("a<b and b<c, so a [<] c", Some("_____"));
        assert_eq!(line.spans, vec![vec!["<".to_string()]]);
        assert_eq!(line.display, "a<b and b<c, so a _____ c");

        let line = extract("<b>Bold</b> [is] fine, 3 > 2", Some("_____"));
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn test_unclosed_bracket() {
        let line = extract("It [is red.", Some("_____"));
        assert!(line.unclosed);
        assert!(line.spans.is_empty());
        assert_eq!(line.display, "It [is red.");
    }

    #[test]
    fn test_placeholder_is_not_bracket_syntax() {
        let first = extract("She [is] happy.", Some(BLANK_PLACEHOLDER));
        let second = extract(&first.display, Some(BLANK_PLACEHOLDER));
        assert!(!second.has_brackets());
        assert_eq!(second.display, first.display);
    }
}
