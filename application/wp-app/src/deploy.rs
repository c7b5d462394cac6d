//! インストーラ配布ユースケース
//!
//! 成果物はホストのファイル添付機構が作業ディレクトリへ置く前提。
//! 実行は同期・一回きりで、どの失敗もFailure報告へ畳み込む（例外は漏らさない）。

use std::path::PathBuf;

use wp_domain::model::{InstallOutcome, InstallReport, ParamSchema, ParamSpec, ResolvedParams};
use wp_domain::port::driven::InstallerLauncher;
use wp_domain::DomainError;

pub const PARAM_INSTALLER_FILE: &str = "installerFile";
pub const PARAM_INSTALLER_ARGS: &str = "installerArgs";

/// 配布コンポーネントのパラメータ宣言。
pub fn deploy_schema() -> ParamSchema {
    ParamSchema::new(vec![
        ParamSpec::required_text(PARAM_INSTALLER_FILE),
        ParamSpec::text(PARAM_INSTALLER_ARGS, ""),
    ])
}

/// 配布実行の指定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// 作業ディレクトリ相対の成果物パス
    pub artifact: PathBuf,
    pub args: Vec<String>,
}

impl DeployRequest {
    pub fn from_params(params: &ResolvedParams) -> Result<Self, DomainError> {
        let artifact = params
            .text(PARAM_INSTALLER_FILE)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                DomainError::ConfigError(format!(
                    "required parameter '{}' is missing",
                    PARAM_INSTALLER_FILE
                ))
            })?;
        let args = split_args(params.text(PARAM_INSTALLER_ARGS).unwrap_or_default());
        Ok(Self {
            artifact: PathBuf::from(artifact),
            args,
        })
    }
}

/// 引数文字列の素朴な空白分割。クォートの解釈はしない
/// （必要ならホスト側で個別パラメータに分けて渡す）。
pub fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// インストーラを実行して報告を返す。
/// 成果物がなければ実行を試みずにFailure、起動例外もFailureへ変換する。
pub fn run_install(launcher: &dyn InstallerLauncher, request: &DeployRequest) -> InstallReport {
    if !launcher.artifact_exists(&request.artifact) {
        return InstallReport {
            outcome: InstallOutcome::Failure,
            installer_exit_code: None,
            detail: format!(
                "installer artifact not found: {}",
                request.artifact.display()
            ),
        };
    }

    match launcher.run(&request.artifact, &request.args) {
        Ok(code) => {
            let outcome = InstallOutcome::from_exit_code(code);
            InstallReport {
                outcome,
                installer_exit_code: Some(code),
                detail: format!("installer exited with code {} ({})", code, outcome.label()),
            }
        }
        Err(err) => InstallReport {
            outcome: InstallOutcome::Failure,
            installer_exit_code: None,
            detail: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::Path;
    use wp_domain::model::ParamValue;

    struct StubLauncher {
        exists: bool,
        result: Result<i32, DomainError>,
        runs: Cell<u32>,
    }

    impl StubLauncher {
        fn new(exists: bool, result: Result<i32, DomainError>) -> Self {
            Self {
                exists,
                result,
                runs: Cell::new(0),
            }
        }
    }

    impl InstallerLauncher for StubLauncher {
        fn artifact_exists(&self, _artifact: &Path) -> bool {
            self.exists
        }

        fn run(&self, _artifact: &Path, _args: &[String]) -> Result<i32, DomainError> {
            self.runs.set(self.runs.get() + 1);
            self.result.clone()
        }
    }

    fn request() -> DeployRequest {
        DeployRequest {
            artifact: PathBuf::from("setup.msi"),
            args: vec!["/quiet".to_string()],
        }
    }

    #[test]
    fn exit_codes_map_to_install_outcomes() {
        for (code, outcome) in [
            (0, InstallOutcome::Success),
            (3010, InstallOutcome::SuccessRebootRequired),
            (1641, InstallOutcome::SuccessRebootInitiated),
            (17, InstallOutcome::Failure),
        ] {
            let launcher = StubLauncher::new(true, Ok(code));
            let report = run_install(&launcher, &request());
            assert_eq!(report.outcome, outcome, "code {code}");
            assert_eq!(report.installer_exit_code, Some(code));
        }
    }

    #[test]
    fn missing_artifact_fails_without_running_anything() {
        let launcher = StubLauncher::new(false, Ok(0));
        let report = run_install(&launcher, &request());
        assert_eq!(report.outcome, InstallOutcome::Failure);
        assert_eq!(launcher.runs.get(), 0, "installer must not be launched");
        assert!(report.detail.contains("not found"));
        assert_eq!(report.process_exit_code(), 1);
    }

    #[test]
    fn launch_exception_becomes_failure_report() {
        let launcher = StubLauncher::new(
            true,
            Err(DomainError::ProcessLaunchFailed("access denied".into())),
        );
        let report = run_install(&launcher, &request());
        assert_eq!(report.outcome, InstallOutcome::Failure);
        assert!(report.detail.contains("access denied"));
    }

    #[test]
    fn request_from_params_requires_installer_file() {
        let mut params = ResolvedParams::default();
        params.insert(PARAM_INSTALLER_ARGS, ParamValue::Text("/quiet /norestart".into()));
        assert!(DeployRequest::from_params(&params).is_err());

        params.insert(PARAM_INSTALLER_FILE, ParamValue::Text("setup.msi".into()));
        let request = DeployRequest::from_params(&params).unwrap();
        assert_eq!(request.artifact, PathBuf::from("setup.msi"));
        assert_eq!(request.args, vec!["/quiet", "/norestart"]);
    }

    #[test]
    fn split_args_is_plain_whitespace_split() {
        assert_eq!(split_args(""), Vec::<String>::new());
        assert_eq!(split_args("  /S   /D=C:\\Tools "), vec!["/S", "/D=C:\\Tools"]);
    }
}
