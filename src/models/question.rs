use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// 选择题的呈现方式
///
/// 来自 cloze 片段的类型：`MC` 为下拉，`MCV` 为竖排，`MCH` 为横排
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceLayout {
    Dropdown,
    #[default]
    Vertical,
    Horizontal,
}

/// 选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    pub id: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    /// 与 `options` 一一对应
    pub option_explanations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub shuffle_options: bool,
    #[serde(default)]
    pub layout: ChoiceLayout,
}

impl ChoiceQuestion {
    /// 正确选项的文本
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// 追加一个选项（解释为空）
    pub fn add_option(&mut self, text: impl Into<String>) {
        self.options.push(text.into());
        self.option_explanations.push(String::new());
    }

    /// 删除选项，同时删除对应的解释并修正正确答案索引
    ///
    /// 删除位于正确答案之前的选项时索引减一；
    /// 删除正确答案本身时索引退到 `max(0, correct_index - 1)`。
    pub fn remove_option(&mut self, index: usize) -> Result<String, EditError> {
        let len = self.options.len();
        if index >= len {
            return Err(EditError::OptionOutOfRange { index, len });
        }

        let removed = self.options.remove(index);
        self.option_explanations.remove(index);

        if index <= self.correct_index {
            self.correct_index = self.correct_index.saturating_sub(1);
        }
        self.clamp_correct_index();

        Ok(removed)
    }

    /// 设置正确答案
    pub fn set_correct(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.options.len() {
            return Err(EditError::OptionOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.correct_index = index;
        Ok(())
    }

    /// 设置单个选项的解释
    pub fn set_option_explanation(
        &mut self,
        index: usize,
        explanation: impl Into<String>,
    ) -> Result<(), EditError> {
        let len = self.options.len();
        let slot = self
            .option_explanations
            .get_mut(index)
            .ok_or(EditError::OptionOutOfRange { index, len })?;
        *slot = explanation.into();
        Ok(())
    }

    fn clamp_correct_index(&mut self) {
        let max = self.options.len().saturating_sub(1);
        if self.correct_index > max {
            self.correct_index = max;
        }
    }
}

/// 一个填空（或拖拽题的放置区）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    /// 可接受的答案，保持原有顺序
    pub expected_answers: Vec<String>,
}

/// 填空题（普通填空与 AI 评分填空共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankQuestion {
    pub id: String,
    pub question_text: String,
    pub blanks: Vec<Blank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 拖拽题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropQuestion {
    pub id: String,
    pub question_text: String,
    pub blanks: Vec<Blank>,
    /// 干扰项
    pub distractors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl DragDropQuestion {
    /// 可拖拽的词块：每个放置区的第一个答案加上全部干扰项
    pub fn tokens(&self) -> Vec<String> {
        self.blanks
            .iter()
            .filter_map(|b| b.expected_answers.first().cloned())
            .chain(self.distractors.iter().cloned())
            .collect()
    }
}

/// 一个下拉框
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdown {
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// 下拉选择题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownQuestion {
    pub id: String,
    pub question_text: String,
    pub dropdowns: Vec<Dropdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 导入得到的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice(ChoiceQuestion),
    FillBlank(BlankQuestion),
    AiFillBlank(BlankQuestion),
    DragDrop(DragDropQuestion),
    Dropdown(DropdownQuestion),
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.id,
            Question::FillBlank(q) | Question::AiFillBlank(q) => &q.id,
            Question::DragDrop(q) => &q.id,
            Question::Dropdown(q) => &q.id,
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.question_text,
            Question::FillBlank(q) | Question::AiFillBlank(q) => &q.question_text,
            Question::DragDrop(q) => &q.question_text,
            Question::Dropdown(q) => &q.question_text,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            Question::MultipleChoice(q) => q.explanation.as_deref(),
            Question::FillBlank(q) | Question::AiFillBlank(q) => q.explanation.as_deref(),
            Question::DragDrop(q) => q.explanation.as_deref(),
            Question::Dropdown(q) => q.explanation.as_deref(),
        }
    }

    pub fn as_choice(&self) -> Option<&ChoiceQuestion> {
        match self {
            Question::MultipleChoice(q) => Some(q),
            _ => None,
        }
    }

    /// 填空题（含 AI 填空和拖拽题）的空
    pub fn blanks(&self) -> Option<&[Blank]> {
        match self {
            Question::FillBlank(q) | Question::AiFillBlank(q) => Some(&q.blanks),
            Question::DragDrop(q) => Some(&q.blanks),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_choice(correct_index: usize) -> ChoiceQuestion {
        ChoiceQuestion {
            id: "q-1".to_string(),
            question_text: "2+2 is".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_index,
            option_explanations: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            explanation: None,
            shuffle_options: true,
            layout: ChoiceLayout::Vertical,
        }
    }

    #[test]
    fn test_remove_option_before_correct_decrements() {
        let mut q = sample_choice(2);
        q.remove_option(0).unwrap();
        assert_eq!(q.correct_index, 1);
        assert_eq!(q.correct_option(), Some("5"));
        assert_eq!(q.option_explanations, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_remove_correct_option_clamps() {
        let mut q = sample_choice(2);
        q.remove_option(2).unwrap();
        assert_eq!(q.correct_index, 1);

        let mut q = sample_choice(0);
        q.remove_option(0).unwrap();
        assert_eq!(q.correct_index, 0);
    }

    #[test]
    fn test_remove_option_after_correct_keeps_index() {
        let mut q = sample_choice(1);
        q.remove_option(3).unwrap();
        assert_eq!(q.correct_index, 1);
        assert_eq!(q.options.len(), q.option_explanations.len());
    }

    #[test]
    fn test_remove_until_empty_never_out_of_range() {
        let mut q = sample_choice(3);
        while !q.options.is_empty() {
            let last = q.options.len() - 1;
            q.remove_option(last).unwrap();
            assert!(q.options.is_empty() || q.correct_index < q.options.len());
        }
        assert_eq!(q.correct_index, 0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut q = sample_choice(0);
        assert_eq!(
            q.remove_option(9),
            Err(EditError::OptionOutOfRange { index: 9, len: 4 })
        );
    }

    #[test]
    fn test_add_option_keeps_lockstep() {
        let mut q = sample_choice(0);
        q.add_option("7");
        assert_eq!(q.options.len(), 5);
        assert_eq!(q.option_explanations.len(), 5);
        q.set_option_explanation(4, "seven").unwrap();
        assert_eq!(q.option_explanations[4], "seven");
        assert!(q.set_correct(5).is_err());
    }

    #[test]
    fn test_serialize_camel_case_with_tag() {
        let q = Question::MultipleChoice(sample_choice(1));
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "multiple-choice");
        assert_eq!(json["correctIndex"], 1);
        assert_eq!(json["shuffleOptions"], true);
        assert!(json.get("optionExplanations").is_some());
    }
}
