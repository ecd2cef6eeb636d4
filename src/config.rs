use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, FileError, Result};
use crate::models::ImportFormat;

/// 默认配置文件名
pub const CONFIG_FILE: &str = "importer.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的导入任务数量
    pub max_concurrent_jobs: usize,
    /// 待导入文件存放目录
    pub input_folder: String,
    /// JSON 结果输出目录
    pub output_folder: String,
    /// 任务未指定格式时使用
    pub default_format: ImportFormat,
    /// 选择题是否打乱选项
    pub shuffle_options: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 诊断信息写入的文件
    pub warn_file: String,
    /// 处理完成后删除输入文件
    pub remove_processed_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 8,
            input_folder: "input".to_string(),
            output_folder: "output_json".to_string(),
            default_format: ImportFormat::SimpleMc,
            shuffle_options: true,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            remove_processed_files: false,
        }
    }
}

/// `importer.toml` 中出现的字段，缺省的保持默认值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    max_concurrent_jobs: Option<usize>,
    input_folder: Option<String>,
    output_folder: Option<String>,
    default_format: Option<String>,
    shuffle_options: Option<bool>,
    verbose_logging: Option<bool>,
    output_log_file: Option<String>,
    warn_file: Option<String>,
    remove_processed_files: Option<bool>,
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 默认值 + `importer.toml`（存在时）+ 环境变量
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        let path = path.as_ref();
        if path.exists() {
            config.apply_file(path)?;
        }
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig =
            toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;

        if let Some(v) = file.max_concurrent_jobs {
            self.max_concurrent_jobs = v;
        }
        if let Some(v) = file.input_folder {
            self.input_folder = v;
        }
        if let Some(v) = file.output_folder {
            self.output_folder = v;
        }
        if let Some(v) = file.default_format {
            self.default_format = v.parse()?;
        }
        if let Some(v) = file.shuffle_options {
            self.shuffle_options = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.output_log_file {
            self.output_log_file = v;
        }
        if let Some(v) = file.warn_file {
            self.warn_file = v;
        }
        if let Some(v) = file.remove_processed_files {
            self.remove_processed_files = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_parsed("MAX_CONCURRENT_JOBS", "usize")? {
            self.max_concurrent_jobs = v;
        }
        if let Ok(v) = std::env::var("INPUT_FOLDER") {
            self.input_folder = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_FOLDER") {
            self.output_folder = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_FORMAT") {
            self.default_format = v.parse()?;
        }
        if let Some(v) = env_parsed("SHUFFLE_OPTIONS", "bool")? {
            self.shuffle_options = v;
        }
        if let Some(v) = env_parsed("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        if let Ok(v) = std::env::var("WARN_FILE") {
            self.warn_file = v;
        }
        if let Some(v) = env_parsed("REMOVE_PROCESSED_FILES", "bool")? {
            self.remove_processed_files = v;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_jobs == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        Ok(())
    }
}

/// 读取并解析环境变量；未设置时返回 `None`
fn env_parsed<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
