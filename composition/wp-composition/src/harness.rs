//! ローカル実行ハーネス
//!
//! コンポーネントを本番同等の形（環境変数注入・添付ファイル・作業ディレクトリ）
//! で実行し、stdout/stderrをキャプチャして出力プロトコルを検証する。

use std::path::{Path, PathBuf};
use std::time::Instant;

use wp_adapter_clock::ClockAdapter;
use wp_adapter_env::load_var_file;
use wp_adapter_fs::{ensure_workdir, stage_attachments, FsAdapter};
use wp_adapter_process::{interpreter_command, run_captured, CapturedRun};
use wp_domain::model::exit_codes::VALIDATION_FAILED;
use wp_domain::port::driven::{Clock, RunLogRecord, RunLogWriter};
use wp_domain::service::validate_service::{
    extract_status_line, validate_monitor_output, OutputValidation,
};
use wp_domain::DomainError;

use crate::paths::default_data_dir;

/// ハーネス実行の指定。
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub script: PathBuf,
    /// KEY=VALUE 形式の変数ファイル
    pub vars_file: Option<PathBuf>,
    /// 未指定なら一時ディレクトリを作る
    pub workdir: Option<PathBuf>,
    /// ホストの添付ファイル機構を模したディレクトリ
    pub attachments: Option<PathBuf>,
    pub validate_monitor: bool,
    pub output_var: String,
}

/// ハーネス実行の報告。
#[derive(Debug, Clone)]
pub struct HarnessReport {
    pub exit_code: i32,
    pub workdir: PathBuf,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub status_line: Option<String>,
    pub validation: Option<OutputValidation>,
    pub duration_ms: u128,
}

impl HarnessReport {
    /// ハーネス自身の終了コード。子の失敗はそのまま通し、
    /// 子が成功していても出力検証に落ちたら検証失敗コードを返す。
    pub fn harness_exit_code(&self) -> i32 {
        if self.exit_code == 0 {
            if let Some(validation) = &self.validation {
                if !validation.ok() {
                    return VALIDATION_FAILED;
                }
            }
        }
        self.exit_code
    }
}

/// コンポーネントを1回実行する。
pub fn run_component(options: &HarnessOptions) -> Result<HarnessReport, DomainError> {
    let clock = ClockAdapter::new();
    let script = absolutize(&options.script)?;
    if !script.is_file() {
        return Err(DomainError::ConfigError(format!(
            "component script not found: {}",
            script.display()
        )));
    }

    let workdir = match &options.workdir {
        Some(dir) => dir.clone(),
        None => std::env::temp_dir().join(format!("wp-run-{}", clock.now_ms())),
    };
    ensure_workdir(&workdir)?;

    if let Some(attachments) = &options.attachments {
        stage_attachments(attachments, &workdir)?;
    }

    let env_overlay = match &options.vars_file {
        Some(path) => load_var_file(path)?,
        None => Vec::new(),
    };

    let (program, args) = interpreter_command(&script);
    let stdout_path = workdir.join("stdout.txt");
    let stderr_path = workdir.join("stderr.txt");

    let started = Instant::now();
    let exit_code = run_captured(&CapturedRun {
        program,
        args,
        workdir: workdir.clone(),
        env_overlay,
        stdout_path: stdout_path.clone(),
        stderr_path: stderr_path.clone(),
    })?;
    let duration_ms = started.elapsed().as_millis();

    let stdout_text = read_lossy(&stdout_path);
    let should_validate = options.validate_monitor || is_monitor_path(&script);
    let validation =
        should_validate.then(|| validate_monitor_output(&stdout_text, &options.output_var));
    let status_line = extract_status_line(&stdout_text, &options.output_var);

    let report = HarnessReport {
        exit_code,
        workdir,
        stdout_path,
        stderr_path,
        status_line,
        validation,
        duration_ms,
    };

    // 実行ログは診断補助であり、書けなくてもハーネスは失敗させない
    let log = FsAdapter::new(default_data_dir());
    let _ = log.append(&RunLogRecord {
        timestamp: clock.now_iso8601(),
        component: script.to_string_lossy().to_string(),
        exit_code: Some(report.exit_code),
        status_line: report.status_line.clone(),
        output_valid: report.validation.as_ref().map(OutputValidation::ok),
        duration_ms: report.duration_ms,
        workdir: report.workdir.to_string_lossy().to_string(),
    });

    Ok(report)
}

/// `Monitors` ディレクトリ配下のコンポーネントは暗黙に検証対象にする。
fn is_monitor_path(script: &Path) -> bool {
    script
        .components()
        .any(|component| component.as_os_str() == "Monitors")
}

fn read_lossy(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
        Err(_) => String::new(),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, DomainError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| DomainError::IoError(e.to_string()))?;
    Ok(cwd.join(path))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const VALID_MONITOR: &str = "#!/bin/sh\n\
echo '<-Start Diagnostic->'\n\
echo \"injected=$injectedVar\"\n\
echo '<-End Diagnostic->'\n\
echo '<-Start Result->'\n\
echo 'Status=OK: all good'\n\
echo '<-End Result->'\n";

    const BROKEN_MONITOR: &str = "#!/bin/sh\n\
echo 'Status=OK: missing markers'\n";

    fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn options(script: PathBuf, workdir: PathBuf) -> HarnessOptions {
        HarnessOptions {
            script,
            vars_file: None,
            workdir: Some(workdir),
            attachments: None,
            validate_monitor: true,
            output_var: "Status".to_string(),
        }
    }

    #[test]
    fn valid_monitor_output_passes_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WP_DATA_DIR", dir.path().join("data"));
        let script = write_script(dir.path(), "check.sh", VALID_MONITOR);
        let report = run_component(&options(script, dir.path().join("work"))).unwrap();

        assert_eq!(report.exit_code, 0);
        assert!(report.validation.as_ref().unwrap().ok());
        assert_eq!(report.harness_exit_code(), 0);
        assert_eq!(
            report.status_line.as_deref(),
            Some("Status=OK: all good")
        );
        assert!(report.stdout_path.is_file());
        assert!(report.stderr_path.is_file());
    }

    #[test]
    fn clean_child_with_broken_protocol_exits_validation_failed() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WP_DATA_DIR", dir.path().join("data"));
        let script = write_script(dir.path(), "broken.sh", BROKEN_MONITOR);
        let report = run_component(&options(script, dir.path().join("work"))).unwrap();

        assert_eq!(report.exit_code, 0);
        assert!(!report.validation.as_ref().unwrap().ok());
        assert_eq!(report.harness_exit_code(), VALIDATION_FAILED);
    }

    #[test]
    fn vars_file_is_injected_into_the_child_environment() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WP_DATA_DIR", dir.path().join("data"));
        let script = write_script(dir.path(), "check.sh", VALID_MONITOR);
        let vars = dir.path().join("vars.env");
        std::fs::write(&vars, "injectedVar=hello-from-harness\n").unwrap();

        let mut opts = options(script, dir.path().join("work"));
        opts.vars_file = Some(vars);
        let report = run_component(&opts).unwrap();

        let stdout = std::fs::read_to_string(&report.stdout_path).unwrap();
        assert!(stdout.contains("injected=hello-from-harness"));
    }

    #[test]
    fn attachments_are_staged_into_the_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WP_DATA_DIR", dir.path().join("data"));
        let script = write_script(dir.path(), "check.sh", VALID_MONITOR);
        let attachments = dir.path().join("attachments");
        std::fs::create_dir(&attachments).unwrap();
        std::fs::write(attachments.join("setup.msi"), b"payload").unwrap();

        let mut opts = options(script, dir.path().join("work"));
        opts.attachments = Some(attachments);
        let report = run_component(&opts).unwrap();
        assert!(report.workdir.join("setup.msi").is_file());
    }

    #[test]
    fn missing_script_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_component(&options(
            dir.path().join("no-such.sh"),
            dir.path().join("work"),
        ))
        .unwrap_err();
        assert!(matches!(err, DomainError::ConfigError(_)));
    }

    #[test]
    fn monitors_directory_triggers_implicit_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WP_DATA_DIR", dir.path().join("data"));
        let monitors = dir.path().join("Monitors");
        std::fs::create_dir(&monitors).unwrap();
        let script = write_script(&monitors, "broken.sh", BROKEN_MONITOR);

        let mut opts = options(script, dir.path().join("work"));
        opts.validate_monitor = false;
        let report = run_component(&opts).unwrap();
        assert!(report.validation.is_some(), "implicit validation expected");
        assert_eq!(report.harness_exit_code(), VALIDATION_FAILED);
    }
}
