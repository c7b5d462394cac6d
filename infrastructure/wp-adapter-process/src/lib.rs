//! プロセス起動アダプター
//!
//! インストーラの同期実行と、ハーネス向けのキャプチャ付き実行を提供する。
//! 起動はすべてブロッキング。非同期・リトライ・キャンセル伝播は行わない。

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use wp_domain::port::driven::InstallerLauncher;
use wp_domain::DomainError;

/// インストーラ起動アダプター。
/// 成果物はホストが作業ディレクトリへ添付する前提で、相対パスのまま解決する。
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl InstallerLauncher for ProcessLauncher {
    fn artifact_exists(&self, artifact: &Path) -> bool {
        artifact.is_file()
    }

    fn run(&self, artifact: &Path, args: &[String]) -> Result<i32, DomainError> {
        let status = Command::new(artifact)
            .args(args)
            .status()
            .map_err(|e| {
                DomainError::ProcessLaunchFailed(format!("{}: {}", artifact.display(), e))
            })?;
        match status.code() {
            Some(code) => Ok(code),
            // シグナルで落ちた場合は終了コード契約に乗らない
            None => Err(DomainError::ProcessLaunchFailed(format!(
                "{}: terminated without an exit code",
                artifact.display()
            ))),
        }
    }
}

/// キャプチャ付き実行の指定。
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    /// 既存環境の上に重ねる変数
    pub env_overlay: Vec<(String, String)>,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
}

/// stdout/stderrをファイルへ落としながら子プロセスを同期実行する。
pub fn run_captured(capture: &CapturedRun) -> Result<i32, DomainError> {
    let stdout = File::create(&capture.stdout_path)
        .map_err(|e| DomainError::IoError(format!("{}: {}", capture.stdout_path.display(), e)))?;
    let stderr = File::create(&capture.stderr_path)
        .map_err(|e| DomainError::IoError(format!("{}: {}", capture.stderr_path.display(), e)))?;

    let mut command = Command::new(&capture.program);
    command
        .args(&capture.args)
        .current_dir(&capture.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    for (key, value) in &capture.env_overlay {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| {
        DomainError::ProcessLaunchFailed(format!("{}: {}", capture.program.display(), e))
    })?;
    Ok(status.code().unwrap_or(1))
}

/// コンポーネントの種類に応じたインタプリタ起動形を返す。
/// .ps1 は pwsh、.sh は bash、それ以外は直接実行。
pub fn interpreter_command(script: &Path) -> (PathBuf, Vec<String>) {
    let extension = script
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("ps1") => (
            PathBuf::from("pwsh"),
            vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
                script.to_string_lossy().to_string(),
            ],
        ),
        Some("sh") => (
            PathBuf::from("bash"),
            vec![script.to_string_lossy().to_string()],
        ),
        _ => (script.to_path_buf(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpreter_dispatch_by_extension() {
        let (program, args) = interpreter_command(Path::new("components/check-disk.ps1"));
        assert_eq!(program, PathBuf::from("pwsh"));
        assert_eq!(args.first().map(String::as_str), Some("-NoProfile"));
        assert!(args.last().unwrap().ends_with("check-disk.ps1"));

        let (program, args) = interpreter_command(Path::new("components/check-disk.sh"));
        assert_eq!(program, PathBuf::from("bash"));
        assert_eq!(args.len(), 1);

        let (program, args) = interpreter_command(Path::new("bin/wp-monitor"));
        assert_eq!(program, PathBuf::from("bin/wp-monitor"));
        assert!(args.is_empty());
    }

    #[test]
    fn missing_artifact_is_reported_by_exists_check() {
        let launcher = ProcessLauncher::new();
        assert!(!launcher.artifact_exists(Path::new("definitely-not-here.msi")));
    }

    #[cfg(unix)]
    #[test]
    fn launch_failure_is_caught_not_propagated_as_panic() {
        let launcher = ProcessLauncher::new();
        let err = launcher
            .run(Path::new("/nonexistent/installer.bin"), &[])
            .unwrap_err();
        assert!(matches!(err, DomainError::ProcessLaunchFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_passed_through() {
        let launcher = ProcessLauncher::new();
        // `false` は終了コード1で終わる
        let code = launcher.run(Path::new("/bin/false"), &[]).unwrap();
        assert_eq!(code, 1);
        let code = launcher.run(Path::new("/bin/true"), &[]).unwrap();
        assert_eq!(code, 0);
    }
}
