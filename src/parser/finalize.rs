//! 题目收尾：把累积的草稿规范化为 `Question`
//!
//! 不满足约束的草稿返回诊断信息，由调用方丢弃，不影响同批其他题目。

use super::ids::IdSource;
use super::state::Draft;
use super::text::strip_correct_markers;
use crate::models::{
    Blank, BlankQuestion, ChoiceQuestion, Diagnostic, DragDropQuestion, Dropdown,
    DropdownQuestion, FormatDescriptor, ImportFormat, Question, SkipReason,
};

/// 选择题至少需要的选项数
pub const MIN_OPTIONS: usize = 2;

/// 规范化一道题，成功时才分配 ID
pub fn finalize(
    draft: Draft,
    descriptor: &FormatDescriptor,
    ids: &mut impl IdSource,
) -> Result<Question, Diagnostic> {
    let line = draft.line;
    let reject = |reason: SkipReason| Diagnostic { line, reason };

    let question_text = compose_text(draft.instruction.as_deref(), &draft.body);
    let explanation = (!draft.explanation.is_empty()).then(|| draft.explanation.join("\n"));

    match descriptor.format {
        ImportFormat::SimpleMc | ImportFormat::MoodleClozeMc => {
            if draft.options.len() < MIN_OPTIONS {
                return Err(reject(SkipReason::TooFewOptions {
                    found: draft.options.len(),
                }));
            }

            // 没有标记时默认第一个选项；多个标记时以第一个为准
            let correct_index = draft.options.iter().position(|o| o.correct).unwrap_or(0);
            let (options, option_explanations): (Vec<String>, Vec<String>) = draft
                .options
                .into_iter()
                .map(|o| (o.text, o.explanation))
                .unzip();

            Ok(Question::MultipleChoice(ChoiceQuestion {
                id: ids.next_id(),
                question_text,
                options,
                correct_index,
                option_explanations,
                explanation,
                shuffle_options: descriptor.shuffle_options,
                layout: draft.layout.unwrap_or_default(),
            }))
        }
        ImportFormat::FillBlank | ImportFormat::AiFillBlank => {
            let blanks = blanks_from(&draft).map_err(reject)?;
            let question = BlankQuestion {
                id: ids.next_id(),
                question_text,
                blanks,
                explanation,
            };
            Ok(if descriptor.format == ImportFormat::AiFillBlank {
                Question::AiFillBlank(question)
            } else {
                Question::FillBlank(question)
            })
        }
        ImportFormat::DragDrop => {
            let blanks = blanks_from(&draft).map_err(reject)?;
            Ok(Question::DragDrop(DragDropQuestion {
                id: ids.next_id(),
                question_text,
                blanks,
                distractors: draft.distractors,
                explanation,
            }))
        }
        ImportFormat::SimpleDropdown => {
            let dropdowns = dropdowns_from(&draft).map_err(reject)?;
            Ok(Question::Dropdown(DropdownQuestion {
                id: ids.next_id(),
                question_text,
                dropdowns,
                explanation,
            }))
        }
    }
}

/// 段落说明与题干之间空一行；不修改段落说明本身
fn compose_text(instruction: Option<&str>, body: &[String]) -> String {
    let body = body.join("\n");
    match instruction {
        Some(instruction) if body.is_empty() => instruction.to_string(),
        Some(instruction) => format!("{}\n\n{}", instruction, body),
        None => body,
    }
}

fn blanks_from(draft: &Draft) -> Result<Vec<Blank>, SkipReason> {
    if draft.spans.is_empty() {
        return Err(if draft.empty_spans > 0 {
            SkipReason::EmptyBrackets
        } else {
            SkipReason::NoAnswer
        });
    }

    Ok(draft
        .spans
        .iter()
        .map(|alternatives| Blank {
            expected_answers: alternatives.clone(),
        })
        .collect())
}

/// `[is*|are|am]`：`*` 标记正确选项，未标记时取第一个
fn dropdowns_from(draft: &Draft) -> Result<Vec<Dropdown>, SkipReason> {
    if draft.spans.is_empty() {
        return Err(if draft.empty_spans > 0 {
            SkipReason::EmptyBrackets
        } else {
            SkipReason::NoAnswer
        });
    }

    draft
        .spans
        .iter()
        .map(|alternatives| {
            let mut correct_index = None;
            let options: Vec<String> = alternatives
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    let (text, correct) = strip_correct_markers(raw);
                    if correct && correct_index.is_none() {
                        correct_index = Some(i);
                    }
                    text.to_string()
                })
                .collect();

            if options.len() < MIN_OPTIONS {
                return Err(SkipReason::InvalidDropdown);
            }
            Ok(Dropdown {
                options,
                correct_index: correct_index.unwrap_or(0),
            })
        })
        .collect()
}
