use serde::{Deserialize, Serialize};

use super::format::ImportFormat;

/// 一个批量导入任务（对应输入目录里的一个文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub name: String,
    /// 未指定时使用配置里的默认格式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImportFormat>,
    pub text: String,
    /// 是否打乱选项，未指定时使用配置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_options: Option<bool>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
    /// 输出文件名（不含扩展名），未设置时使用任务名称
    #[serde(skip_serializing, skip_deserializing)]
    pub output_stem: Option<String>,
}

impl ImportJob {
    pub fn new(name: impl Into<String>, format: ImportFormat, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: Some(format),
            text: text.into(),
            shuffle_options: None,
            file_path: None,
            output_stem: None,
        }
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }

    pub fn with_output_stem(mut self, output_stem: impl Into<String>) -> Self {
        self.output_stem = Some(output_stem.into());
        self
    }

    /// 实际使用的格式
    pub fn format_or(&self, default: ImportFormat) -> ImportFormat {
        self.format.unwrap_or(default)
    }

    /// 用于输出文件名的安全名称
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .output_stem
            .as_deref()
            .unwrap_or(&self.name)
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect();
        let stem = stem.trim();
        if stem.is_empty() {
            "untitled".to_string()
        } else {
            stem.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_toml_job() {
        let job: ImportJob = toml::from_str(
            r#"
name = "Unit 3"
format = "fill-blank"
text = """
She [is] happy.
"""
"#,
        )
        .unwrap();
        assert_eq!(job.format, Some(ImportFormat::FillBlank));
        assert!(job.text.contains("[is]"));
        assert_eq!(job.shuffle_options, None);
    }

    #[test]
    fn test_file_stem_sanitized() {
        let job = ImportJob::new("Unit 3: a/b", ImportFormat::SimpleMc, "");
        assert_eq!(job.file_stem(), "Unit 3_ a_b");
        let job = ImportJob::new("  ", ImportFormat::SimpleMc, "");
        assert_eq!(job.file_stem(), "untitled");
        let job = ImportJob::new("unit3", ImportFormat::SimpleMc, "").with_output_stem("unit3.mc");
        assert_eq!(job.file_stem(), "unit3.mc");
    }
}
