//! 导出服务 - 业务能力层
//!
//! 把题目渲染回导入文本格式，重新导入后得到等价的题目

use crate::models::{Blank, ChoiceQuestion, Question, BLANK_PLACEHOLDER};

/// 渲染为 simple-mc 文本
///
/// ```text
/// Q1: 题干
/// A. 选项 # 选项解析
/// B. 正确选项 *
/// # 解析
/// ```
pub fn export_simple_mc(questions: &[ChoiceQuestion]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| render_choice(i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_choice(number: usize, question: &ChoiceQuestion) -> String {
    let mut out = String::new();
    push_numbered(&mut out, number, &question.question_text);

    for (i, option) in question.options.iter().enumerate() {
        out.push_str(&option_label(i));
        out.push(' ');
        out.push_str(&escape_option(option));
        if i == question.correct_index {
            out.push_str(" *");
        }
        if let Some(explanation) = question.option_explanations.get(i).filter(|e| !e.is_empty()) {
            out.push_str(" # ");
            out.push_str(&explanation.replace('\\', "\\\\"));
        }
        out.push('\n');
    }

    push_explanation(&mut out, question.explanation.as_deref());
    out
}

/// 渲染填空类题目为 `[a|b]` 语法
///
/// 只输出带占位符的题型（fill-blank、drag-drop），其余题型跳过
pub fn export_fill_blank(questions: &[Question]) -> String {
    let mut number = 0;
    questions
        .iter()
        .filter_map(|q| {
            let rendered = match q {
                Question::FillBlank(b) => {
                    restore_blanks(&b.question_text, &b.blanks).map(|text| (text, None))
                }
                Question::DragDrop(d) => restore_blanks(&d.question_text, &d.blanks)
                    .map(|text| (text, Some(&d.distractors))),
                _ => None,
            }?;
            number += 1;

            let (text, distractors) = rendered;
            let mut out = String::new();
            push_numbered(&mut out, number, &text);
            if let Some(distractors) = distractors.filter(|d| !d.is_empty()) {
                let escaped: Vec<String> =
                    distractors.iter().map(|d| escape_alternative(d)).collect();
                out.push_str("Distractors: ");
                out.push_str(&escaped.join(", "));
                out.push('\n');
            }
            push_explanation(&mut out, q.explanation());
            Some(out)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 按顺序把占位符替换回答案片段；数量对不上时返回 `None`
fn restore_blanks(text: &str, blanks: &[Blank]) -> Option<String> {
    let pieces: Vec<&str> = text.split(BLANK_PLACEHOLDER).collect();
    if pieces.len() != blanks.len() + 1 {
        return None;
    }

    let mut out = String::from(pieces[0]);
    for (blank, piece) in blanks.iter().zip(&pieces[1..]) {
        let alternatives: Vec<String> = blank
            .expected_answers
            .iter()
            .map(|a| escape_alternative(a))
            .collect();
        out.push('[');
        out.push_str(&alternatives.join("|"));
        out.push(']');
        out.push_str(piece);
    }
    Some(out)
}

/// 用 `Qn:` 而不是 `n.` 开头，避免与上一题的数字选项编号混淆
fn push_numbered(out: &mut String, number: usize, text: &str) {
    out.push_str(&format!("Q{}: {}\n", number, text));
}

fn push_explanation(out: &mut String, explanation: Option<&str>) {
    if let Some(explanation) = explanation {
        for line in explanation.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// 前 26 个选项用字母，之后用数字（`27)`），保持枚举连续
fn option_label(index: usize) -> String {
    if index < 26 {
        format!("{}.", (b'A' + index as u8) as char)
    } else {
        format!("{})", index + 1)
    }
}

fn escape_option(text: &str) -> String {
    let mut escaped = text.replace('\\', "\\\\").replace('#', "\\#");
    if escaped.starts_with('*') || escaped.starts_with('=') {
        escaped.insert(0, '\\');
    }
    if escaped.ends_with('*') && !escaped.ends_with("\\*") {
        escaped.insert(escaped.len() - 1, '\\');
    }
    escaped
}

fn escape_alternative(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '|' | '/' | ',' | '*') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImportFormat;
    use crate::parser::{BulkImporter, SequentialIds};

    fn parse(format: ImportFormat, text: &str) -> Vec<Question> {
        BulkImporter::new(format)
            .with_ids(SequentialIds::new("q"))
            .parse(text)
            .questions
    }

    fn choices(questions: &[Question]) -> Vec<ChoiceQuestion> {
        questions
            .iter()
            .filter_map(|q| q.as_choice().cloned())
            .collect()
    }

    #[test]
    fn test_render_simple_mc() {
        let questions = parse(
            ImportFormat::SimpleMc,
            "Q1: 2+2 is\nA: 3\nB: 4 * # two twos\nC: 5\n# Basic arithmetic",
        );
        let text = export_simple_mc(&choices(&questions));
        assert_eq!(
            text,
            "Q1: 2+2 is\nA. 3\nB. 4 * # two twos\nC. 5\n# Basic arithmetic\n"
        );
    }

    #[test]
    fn test_simple_mc_round_trip() {
        let source = "Q1: Which is #1?\nA. C\\# *\nB. F\\# # sharp\nC. star*\\*\n\
                      # Music\n# theory\nQ2: Second\nA. yes\nB. no *";
        let first = choices(&parse(ImportFormat::SimpleMc, source));
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].options, vec!["C#", "F#", "star**"]);

        let second = choices(&parse(ImportFormat::SimpleMc, &export_simple_mc(&first)));
        assert_eq!(second.len(), first.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.question_text, b.question_text);
            assert_eq!(a.options, b.options);
            assert_eq!(a.correct_index, b.correct_index);
            assert_eq!(a.option_explanations, b.option_explanations);
            assert_eq!(a.explanation, b.explanation);
        }
    }

    #[test]
    fn test_fill_blank_round_trip() {
        let source = "She [is|'s] happy.\nIt costs [1\\,000|1000] yuan.\n# Numbers";
        let first = parse(ImportFormat::FillBlank, source);
        let exported = export_fill_blank(&first);
        assert!(exported.starts_with("Q1: She [is|'s] happy.\n"));

        let second = parse(ImportFormat::FillBlank, &exported);
        assert_eq!(second.len(), first.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.question_text(), b.question_text());
            assert_eq!(a.blanks(), b.blanks());
            assert_eq!(a.explanation(), b.explanation());
        }
    }

    #[test]
    fn test_drag_drop_distractors_exported() {
        let first = parse(
            ImportFormat::DragDrop,
            "The cat [sat] on the [mat].\nDistractors: sit, hat",
        );
        let exported = export_fill_blank(&first);
        assert_eq!(
            exported,
            "Q1: The cat [sat] on the [mat].\nDistractors: sit, hat\n"
        );
    }

    #[test]
    fn test_other_types_skipped() {
        let questions = parse(ImportFormat::SimpleDropdown, "She [am|is*] here.");
        assert_eq!(export_fill_blank(&questions), "");
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), "A.");
        assert_eq!(option_label(25), "Z.");
        assert_eq!(option_label(26), "27)");
    }
}
