use thiserror::Error;

/// 应用程序错误类型
///
/// 解析本身永远不会失败（格式错误的行只会产生诊断信息），
/// 这里只描述宿主环境的异常：文件、配置、序列化和编辑操作。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 导入任务错误
    #[error("导入错误: {0}")]
    Import(#[from] ImportError),
    /// 题目编辑错误
    #[error("编辑错误: {0}")]
    Edit(#[from] EditError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 删除文件失败
    #[error("删除文件失败 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {source}")]
    JsonFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的导入格式
    #[error("未知的导入格式: {name}")]
    UnknownFormat { name: String },
    /// 并发数必须大于 0
    #[error("并发数必须大于 0")]
    ZeroConcurrency,
}

/// 导入任务错误
#[derive(Debug, Error)]
pub enum ImportError {
    /// 任务文本为空
    #[error("导入任务 {name} 没有文本内容")]
    EmptyJob { name: String },
    /// 任务文件名无法识别
    #[error("无法识别的任务文件: {path}")]
    UnrecognizedJobFile { path: String },
}

/// 题目编辑错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// 选项索引超出范围
    #[error("选项索引 {index} 超出范围 (共 {len} 个选项)")]
    OptionOutOfRange { index: usize, len: usize },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonFailed { source: err })
    }
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;
