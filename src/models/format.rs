use phf::phf_map;

/// 导入格式枚举
///
/// 对应编辑器里的六种批量导入语法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportFormat {
    /// 简单选择题（字母选项，`*` 标记正确答案）
    SimpleMc,
    /// Moodle Cloze 选择题（`{1:MC:=对~错}`）
    MoodleClozeMc,
    /// 填空题（`[答案]` 替换为 `_____`）
    FillBlank,
    /// AI 评分填空题（`[答案]` 直接移除）
    AiFillBlank,
    /// 拖拽题（`[答案]` + `Distractors:` 干扰项）
    DragDrop,
    /// 下拉选择题（`[对*|错]`）
    SimpleDropdown,
}

/// 格式名称及别名
static FORMAT_ALIASES: phf::Map<&'static str, ImportFormat> = phf_map! {
    "simple-mc" => ImportFormat::SimpleMc,
    "mc" => ImportFormat::SimpleMc,
    "multiple-choice" => ImportFormat::SimpleMc,
    "moodle-cloze-mc" => ImportFormat::MoodleClozeMc,
    "cloze" => ImportFormat::MoodleClozeMc,
    "moodle" => ImportFormat::MoodleClozeMc,
    "fill-blank" => ImportFormat::FillBlank,
    "blank" => ImportFormat::FillBlank,
    "ai-fill-blank" => ImportFormat::AiFillBlank,
    "ai-blank" => ImportFormat::AiFillBlank,
    "drag-drop" => ImportFormat::DragDrop,
    "dragdrop" => ImportFormat::DragDrop,
    "simple-dropdown" => ImportFormat::SimpleDropdown,
    "dropdown" => ImportFormat::SimpleDropdown,
};

/// 占位符：填空处显示为 5 个下划线
pub const BLANK_PLACEHOLDER: &str = "_____";

impl ImportFormat {
    /// 全部格式
    pub const ALL: [ImportFormat; 6] = [
        ImportFormat::SimpleMc,
        ImportFormat::MoodleClozeMc,
        ImportFormat::FillBlank,
        ImportFormat::AiFillBlank,
        ImportFormat::DragDrop,
        ImportFormat::SimpleDropdown,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ImportFormat::SimpleMc => "simple-mc",
            ImportFormat::MoodleClozeMc => "moodle-cloze-mc",
            ImportFormat::FillBlank => "fill-blank",
            ImportFormat::AiFillBlank => "ai-fill-blank",
            ImportFormat::DragDrop => "drag-drop",
            ImportFormat::SimpleDropdown => "simple-dropdown",
        }
    }

    /// 从名称或别名解析格式（忽略大小写和下划线）
    pub fn find(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace('_', "-");
        FORMAT_ALIASES.get(key.as_str()).copied()
    }

    /// 获取该格式的解析描述
    pub fn descriptor(self) -> FormatDescriptor {
        let base = FormatDescriptor {
            format: self,
            option_lines: false,
            cloze_spans: false,
            bracket_spans: false,
            distractor_lines: false,
            placeholder: Some(BLANK_PLACEHOLDER),
            captures_intro: true,
            shuffle_options: true,
        };

        match self {
            ImportFormat::SimpleMc => FormatDescriptor {
                option_lines: true,
                placeholder: None,
                ..base
            },
            ImportFormat::MoodleClozeMc => FormatDescriptor {
                cloze_spans: true,
                placeholder: None,
                captures_intro: false,
                ..base
            },
            ImportFormat::FillBlank | ImportFormat::SimpleDropdown => FormatDescriptor {
                bracket_spans: true,
                ..base
            },
            ImportFormat::AiFillBlank => FormatDescriptor {
                bracket_spans: true,
                placeholder: None,
                ..base
            },
            ImportFormat::DragDrop => FormatDescriptor {
                bracket_spans: true,
                distractor_lines: true,
                ..base
            },
        }
    }

    /// 是否为选择题格式
    pub fn is_choice(self) -> bool {
        matches!(self, ImportFormat::SimpleMc | ImportFormat::MoodleClozeMc)
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| crate::error::ConfigError::UnknownFormat {
            name: s.to_string(),
        })
    }
}

/// 格式描述
///
/// 决定分词器识别哪些行类型、填空占位符以及题目的收尾规则。
/// 六种格式共用一个分词器，差异全部体现在这里。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub format: ImportFormat,
    /// 是否识别 `A.` / `1)` / `True` / `=` 选项行
    pub option_lines: bool,
    /// 是否识别 `{1:MC:...}` cloze 片段
    pub cloze_spans: bool,
    /// 是否识别 `[...]` 答案片段
    pub bracket_spans: bool,
    /// 是否识别 `Distractors:` 干扰项行
    pub distractor_lines: bool,
    /// 替换答案片段的占位符，`None` 表示直接移除
    pub placeholder: Option<&'static str>,
    /// 第一道题之前的普通文本是否作为文档导语
    pub captures_intro: bool,
    /// 选择题默认是否打乱选项
    pub shuffle_options: bool,
}

impl FormatDescriptor {
    /// 覆盖默认的打乱选项设置
    pub fn with_shuffle(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_aliases() {
        assert_eq!(ImportFormat::find("mc"), Some(ImportFormat::SimpleMc));
        assert_eq!(ImportFormat::find("Fill_Blank"), Some(ImportFormat::FillBlank));
        assert_eq!(ImportFormat::find(" cloze "), Some(ImportFormat::MoodleClozeMc));
        assert_eq!(ImportFormat::find("essay"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for format in ImportFormat::ALL {
            assert_eq!(ImportFormat::find(format.name()), Some(format));
            assert_eq!(format.descriptor().format, format);
        }
    }

    #[test]
    fn test_descriptor_placeholders() {
        assert_eq!(
            ImportFormat::FillBlank.descriptor().placeholder,
            Some(BLANK_PLACEHOLDER)
        );
        assert_eq!(ImportFormat::AiFillBlank.descriptor().placeholder, None);
        assert!(ImportFormat::DragDrop.descriptor().distractor_lines);
        assert!(!ImportFormat::MoodleClozeMc.descriptor().captures_intro);
    }
}
