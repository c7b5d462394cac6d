//! ファイルシステムアダプター（作業ディレクトリのステージングと実行ログ）
//! 実行ログはJSONLで追記する。ファイルは遅延作成。

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use wp_domain::port::driven::{RunLogRecord, RunLogWriter};
use wp_domain::DomainError;

#[derive(Debug)]
pub struct FsAdapter {
    run_log_path: PathBuf,
}

impl FsAdapter {
    /// 指定ルートディレクトリでアダプターを作成。
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            run_log_path: root.join("logs").join("runs.log.jsonl"),
        }
    }

    pub fn run_log_path(&self) -> &Path {
        &self.run_log_path
    }

    fn ensure_parent_dir(path: &Path) -> Result<(), DomainError> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|e| DomainError::IoError(format!("create_dir_all: {e}")))
    }

    fn append_json_value(&self, value: &serde_json::Value) -> Result<(), DomainError> {
        Self::ensure_parent_dir(&self.run_log_path)?;
        let line = serde_json::to_string(value).map_err(|e| DomainError::IoError(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.run_log_path)
            .map_err(|e| DomainError::IoError(e.to_string()))?;
        writeln!(file, "{}", line).map_err(|e| DomainError::IoError(e.to_string()))
    }
}

impl RunLogWriter for FsAdapter {
    fn append(&self, record: &RunLogRecord) -> Result<(), DomainError> {
        let value = serde_json::json!({
            "timestamp": record.timestamp,
            "component": record.component,
            "exit_code": record.exit_code,
            "status_line": record.status_line,
            "output_valid": record.output_valid,
            "duration_ms": record.duration_ms as u64,
            "workdir": record.workdir,
        });
        self.append_json_value(&value)
    }
}

/// 添付ディレクトリ直下のファイルを作業ディレクトリへフラットにコピーする。
/// ホストのファイル添付機構の挙動を再現する（サブディレクトリは対象外）。
pub fn stage_attachments(attachments_dir: &Path, workdir: &Path) -> Result<u32, DomainError> {
    if !attachments_dir.is_dir() {
        return Err(DomainError::ConfigError(format!(
            "attachments must be a directory: {}",
            attachments_dir.display()
        )));
    }
    let entries = fs::read_dir(attachments_dir)
        .map_err(|e| DomainError::IoError(format!("{}: {}", attachments_dir.display(), e)))?;
    let mut copied = 0u32;
    for entry in entries {
        let entry = entry.map_err(|e| DomainError::IoError(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        fs::copy(&path, workdir.join(name))
            .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))?;
        copied += 1;
    }
    Ok(copied)
}

/// 作業ディレクトリを用意する（存在すれば何もしない）。
pub fn ensure_workdir(path: &Path) -> Result<(), DomainError> {
    fs::create_dir_all(path)
        .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))
}
