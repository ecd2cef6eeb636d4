use crate::error::{FileError, ImportError};
use crate::models::format::ImportFormat;
use crate::models::job::ImportJob;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从单个文件加载导入任务
///
/// - `*.toml`: 包含 `name` / `format` / `text` 字段
/// - `*.txt`: 整个文件即文本，格式取自次级扩展名（如 `unit3.fill-blank.txt`）
pub async fn load_job(path: &Path) -> Result<ImportJob> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", path.display()))?;

    let job = match extension_of(path) {
        Some("toml") => toml::from_str::<ImportJob>(&content)
            .with_context(|| format!("无法解析TOML文件: {}", path.display()))?,
        Some("txt") => job_from_text_file(path, content),
        _ => {
            return Err(ImportError::UnrecognizedJobFile {
                path: path.display().to_string(),
            }
            .into())
        }
    };

    // 输出名取完整文件名（去掉最后一级扩展名），同名不同格式的文件不会互相覆盖
    let output_stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(job
        .with_file_path(path.to_string_lossy().to_string())
        .with_output_stem(output_stem))
}

/// 从文件夹中加载所有任务文件（按文件名排序）
///
/// 单个文件加载失败只记录警告，不影响其他文件
pub async fn load_all_jobs(folder_path: &str) -> Result<Vec<ImportJob>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if matches!(extension_of(&path), Some("toml") | Some("txt")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut jobs = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_job(&path).await {
            Ok(job) => {
                tracing::info!("成功加载任务 {} ({} 行)", job.name, job.text.lines().count());
                jobs.push(job);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    dedupe_output_stems(&mut jobs);
    Ok(jobs)
}

/// `unit3.toml` 与 `unit3.txt` 会得到相同的输出名，后出现的追加 `-2`、`-3` ...
fn dedupe_output_stems(jobs: &mut [ImportJob]) {
    let mut seen = HashSet::new();
    for job in jobs.iter_mut() {
        let base = job.file_stem();
        let mut stem = base.clone();
        let mut n = 1;
        while !seen.insert(stem.clone()) {
            n += 1;
            stem = format!("{}-{}", base, n);
        }
        if stem != base {
            tracing::warn!("输出文件名重复: {} -> {}", base, stem);
            job.output_stem = Some(stem);
        }
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn job_from_text_file(path: &Path, text: String) -> ImportJob {
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // unit3.fill-blank -> ("unit3", FillBlank)
    let (name, format) = match stem.rsplit_once('.') {
        Some((name, ext)) => match ImportFormat::find(ext) {
            Some(format) => (name.to_string(), Some(format)),
            None => (stem.clone(), None),
        },
        None => (stem.clone(), None),
    };

    ImportJob {
        name,
        format,
        text,
        shuffle_options: None,
        file_path: None,
        output_stem: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_txt_with_format_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit3.fill-blank.txt");
        std::fs::write(&path, "She [is] happy.").unwrap();

        let job = load_job(&path).await.unwrap();
        assert_eq!(job.name, "unit3");
        assert_eq!(job.format, Some(ImportFormat::FillBlank));
        assert!(job.file_path.is_some());
        assert_eq!(job.file_stem(), "unit3.fill-blank");
    }

    #[tokio::test]
    async fn test_load_txt_without_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.2 notes.txt");
        std::fs::write(&path, "Q1: x").unwrap();

        let job = load_job(&path).await.unwrap();
        assert_eq!(job.name, "v1.2 notes");
        assert_eq!(job.format, None);
    }

    #[tokio::test]
    async fn test_load_all_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), "name = \"A\"\ntext = \"Q1: x\"\n").unwrap();
        std::fs::write(dir.path().join("b.toml"), "this is not toml = = =").unwrap();
        std::fs::write(dir.path().join("c.md"), "ignored").unwrap();
        std::fs::write(dir.path().join("d.mc.txt"), "Q1: x").unwrap();

        let jobs = load_all_jobs(dir.path().to_str().unwrap()).await.unwrap();
        let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["A", "d"]);
        assert_eq!(jobs[1].format, Some(ImportFormat::SimpleMc));
    }

    #[tokio::test]
    async fn test_same_unit_different_formats_get_distinct_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit3.fill-blank.txt"), "She [is] happy.").unwrap();
        std::fs::write(dir.path().join("unit3.mc.txt"), "Q1: x\nA. a *\nB. b").unwrap();
        let toml = "name = \"Unit 3\"\ntext = \"Q1: x\"\n";
        std::fs::write(dir.path().join("unit3.toml"), toml).unwrap();
        std::fs::write(dir.path().join("unit3.txt"), "Q1: y").unwrap();

        let jobs = load_all_jobs(dir.path().to_str().unwrap()).await.unwrap();
        let stems: Vec<_> = jobs.iter().map(|j| j.file_stem()).collect();
        assert_eq!(stems, vec!["unit3.fill-blank", "unit3.mc", "unit3", "unit3-2"]);
    }

    #[tokio::test]
    async fn test_unrecognized_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "Q1: x").unwrap();

        let err = load_job(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::UnrecognizedJobFile { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_all_missing_folder() {
        let err = load_all_jobs("/definitely/not/here").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FileError>(),
            Some(FileError::DirectoryNotFound { .. })
        ));
    }
}
