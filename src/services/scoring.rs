//! 作答判分服务 - 业务能力层
//!
//! 单题只有对错，没有部分得分

use serde::{Deserialize, Serialize};

use super::shuffler::ShuffledChoice;
use crate::models::{Blank, Question};

/// 及格线（百分比）
pub const PASS_THRESHOLD: u32 = 75;

/// 学生的作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Response {
    /// 选择题：选中的位置（按题目存储顺序）
    Choice(usize),
    /// 填空 / 拖拽：每个空的答案
    Blanks(Vec<String>),
    /// 下拉：每个下拉框选中的下标
    Dropdowns(Vec<usize>),
}

/// 一次作答记录，选项下标统一换算回原始顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub question_id: String,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_original: Option<usize>,
}

/// 判定一道题是否答对
///
/// 题型与作答类型不匹配时视为答错
pub fn evaluate(question: &Question, response: &Response) -> bool {
    match (question, response) {
        (Question::MultipleChoice(q), Response::Choice(selected)) => *selected == q.correct_index,
        (Question::FillBlank(q) | Question::AiFillBlank(q), Response::Blanks(answers)) => {
            blanks_match(&q.blanks, answers)
        }
        (Question::DragDrop(q), Response::Blanks(answers)) => blanks_match(&q.blanks, answers),
        (Question::Dropdown(q), Response::Dropdowns(selected)) => {
            q.dropdowns.len() == selected.len()
                && q
                    .dropdowns
                    .iter()
                    .zip(selected)
                    .all(|(d, s)| d.correct_index == *s)
        }
        _ => false,
    }
}

/// 判定打乱后呈现的选择题，并记录原始选项下标
pub fn evaluate_shuffled(
    question_id: &str,
    shuffled: &ShuffledChoice,
    position: usize,
) -> AttemptRecord {
    AttemptRecord {
        question_id: question_id.to_string(),
        correct: shuffled.is_correct(position),
        selected_original: shuffled.to_original(position),
    }
}

fn blanks_match(blanks: &[Blank], answers: &[String]) -> bool {
    blanks.len() == answers.len()
        && blanks.iter().zip(answers).all(|(blank, answer)| {
            let answer = normalize(answer);
            blank
                .expected_answers
                .iter()
                .any(|expected| normalize(expected) == answer)
        })
}

/// trim、折叠空白、忽略大小写
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `round(100 * correct / total)`，没有题目时为 0
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

/// 一次练习的得分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseScore {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
    pub passed: bool,
}

impl ExerciseScore {
    pub fn new(correct: usize, total: usize) -> Self {
        let percent = score_percent(correct, total);
        Self {
            correct,
            total,
            percent,
            passed: percent >= PASS_THRESHOLD,
        }
    }

    pub fn from_attempts(attempts: &[AttemptRecord]) -> Self {
        Self::new(attempts.iter().filter(|a| a.correct).count(), attempts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BulkImporter, SequentialIds};
    use crate::models::ImportFormat;
    use crate::services::Shuffler;

    fn first(format: ImportFormat, text: &str) -> Question {
        let mut importer = BulkImporter::new(format).with_ids(SequentialIds::new("q"));
        importer.parse(text).questions.remove(0)
    }

    #[test]
    fn test_choice_no_partial_credit() {
        let q = first(ImportFormat::SimpleMc, "Q1: 2+2 is\nA: 3\nB: 4 *\nC: 5");
        assert!(evaluate(&q, &Response::Choice(1)));
        assert!(!evaluate(&q, &Response::Choice(0)));
        assert!(!evaluate(&q, &Response::Blanks(vec!["4".into()])));
    }

    #[test]
    fn test_blank_matching_is_normalized() {
        let q = first(
            ImportFormat::FillBlank,
            "By the time I arrived, everyone [had left|had gone] (leave)!",
        );
        assert!(evaluate(&q, &Response::Blanks(vec!["  Had   LEFT ".into()])));
        assert!(evaluate(&q, &Response::Blanks(vec!["had gone".into()])));
        assert!(!evaluate(&q, &Response::Blanks(vec!["left".into()])));
        assert!(!evaluate(&q, &Response::Blanks(vec![])));
    }

    #[test]
    fn test_every_blank_must_match() {
        let q = first(ImportFormat::DragDrop, "The cat [sat] on the [mat].");
        assert!(evaluate(&q, &Response::Blanks(vec!["sat".into(), "mat".into()])));
        assert!(!evaluate(&q, &Response::Blanks(vec!["sat".into(), "hat".into()])));
    }

    #[test]
    fn test_dropdown_selection() {
        let q = first(ImportFormat::SimpleDropdown, "She [am|is*|are] a [teacher*|teachers].");
        assert!(evaluate(&q, &Response::Dropdowns(vec![1, 0])));
        assert!(!evaluate(&q, &Response::Dropdowns(vec![1, 1])));
        assert!(!evaluate(&q, &Response::Dropdowns(vec![1])));
    }

    #[test]
    fn test_shuffled_attempt_maps_to_original() {
        let q = first(ImportFormat::SimpleMc, "Q1: 2+2 is\nA: 3\nB: 4 *\nC: 5");
        let choice = q.as_choice().unwrap();
        let shuffled = Shuffler::with_seed(11).shuffle_choice(choice);

        let record = evaluate_shuffled(q.id(), &shuffled, shuffled.correct_index);
        assert!(record.correct);
        assert_eq!(record.selected_original, Some(1));
    }

    #[test]
    fn test_score_percent() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(3, 4), 75);

        assert!(ExerciseScore::new(3, 4).passed);
        assert!(!ExerciseScore::new(2, 3).passed);
        assert!(!ExerciseScore::new(0, 0).passed);
    }

    #[test]
    fn test_score_from_attempts() {
        let attempts = vec![
            AttemptRecord {
                question_id: "a".into(),
                correct: true,
                selected_original: Some(0),
            },
            AttemptRecord {
                question_id: "b".into(),
                correct: false,
                selected_original: None,
            },
        ];
        let score = ExerciseScore::from_attempts(&attempts);
        assert_eq!(score.percent, 50);
        assert!(!score.passed);
    }
}
