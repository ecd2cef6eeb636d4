//! 文本工具：转义感知的切分、空白折叠、正确答案标记

/// 可以用反斜杠转义的字符
const ESCAPABLE: &[char] = &['#', '~', '}', '\\', '*', '=', '|', '/', ','];

/// 按分隔符切分，跳过被反斜杠转义的分隔符（不去除转义）
pub fn split_unescaped<'a>(s: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if separators.contains(&c) {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// 去除转义：`\#` -> `#`，未知转义保持原样
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// 在第一个未转义的 `#` 处拆分出解释
pub fn split_explanation(s: &str) -> (&str, Option<&str>) {
    let parts = split_unescaped(s, &['#']);
    if parts.len() == 1 {
        return (s, None);
    }
    let text_len = parts[0].len();
    let explanation = s[text_len + 1..].trim();
    (&s[..text_len], (!explanation.is_empty()).then_some(explanation))
}

/// 折叠连续的空格和制表符并去除首尾空白
pub fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.trim().chars() {
        if c == ' ' || c == '\t' {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// 去除正确答案标记：开头的 `=` / `*`，结尾的 `*`
///
/// 返回去除标记后的文本以及是否被标记为正确
pub fn strip_correct_markers(s: &str) -> (&str, bool) {
    let mut text = s.trim();
    let mut correct = false;

    if let Some(rest) = text.strip_prefix('=').or_else(|| text.strip_prefix('*')) {
        text = rest.trim_start();
        correct = true;
    }
    if text.ends_with('*') && !text.ends_with("\\*") {
        text = text[..text.len() - 1].trim_end();
        correct = true;
    }

    (text, correct)
}
