//! 选项打乱服务 - 业务能力层
//!
//! 只负责"出题时的呈现顺序"，不修改题目本身

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{ChoiceQuestion, DragDropQuestion};

/// 打乱后的选择题呈现
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledChoice {
    pub options: Vec<String>,
    pub option_explanations: Vec<String>,
    /// 打乱后正确选项的位置
    pub correct_index: usize,
    /// `original_indices[位置] = 原始下标`，用于作答记录
    pub original_indices: Vec<usize>,
}

impl ShuffledChoice {
    /// 呈现位置对应的原始选项下标
    pub fn to_original(&self, position: usize) -> Option<usize> {
        self.original_indices.get(position).copied()
    }

    pub fn is_correct(&self, position: usize) -> bool {
        position == self.correct_index
    }
}

/// 选项打乱服务
///
/// 持有自己的随机数源；测试时用 `with_seed` 得到可复现的顺序
pub struct Shuffler<R: Rng = StdRng> {
    rng: R,
}

impl Shuffler<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Shuffler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Shuffler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 打乱选择题选项，选项解析与选项同步移动
    ///
    /// `shuffle_options == false` 时保持原顺序
    pub fn shuffle_choice(&mut self, question: &ChoiceQuestion) -> ShuffledChoice {
        let mut order: Vec<usize> = (0..question.options.len()).collect();
        if question.shuffle_options {
            order.shuffle(&mut self.rng);
        }

        let options = order.iter().map(|&i| question.options[i].clone()).collect();
        let option_explanations = order
            .iter()
            .map(|&i| {
                question
                    .option_explanations
                    .get(i)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        let correct_index = order
            .iter()
            .position(|&i| i == question.correct_index)
            .unwrap_or(0);

        ShuffledChoice {
            options,
            option_explanations,
            correct_index,
            original_indices: order,
        }
    }

    /// 拖拽题词块（答案 + 干扰项）的呈现顺序
    pub fn token_bank(&mut self, question: &DragDropQuestion) -> Vec<String> {
        let mut tokens = question.tokens();
        tokens.shuffle(&mut self.rng);
        tokens
    }
}
