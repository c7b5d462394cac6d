//! インストーラ終了コード契約（配布コンポーネント専用）
//!
//! 3010/1641 は「成功・再起動待ち」を表すインストーラ側の数値契約であり、
//! モニターの 0/非0 契約（model::exit_codes）とは決して混同しないこと。

/// 再起動が必要な成功
pub const EXIT_REBOOT_REQUIRED: i32 = 3010;
/// 再起動を開始した成功
pub const EXIT_REBOOT_INITIATED: i32 = 1641;

/// インストーラの終了コードから導かれる結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Success,
    SuccessRebootRequired,
    SuccessRebootInitiated,
    Failure,
}

impl InstallOutcome {
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => Self::Success,
            EXIT_REBOOT_REQUIRED => Self::SuccessRebootRequired,
            EXIT_REBOOT_INITIATED => Self::SuccessRebootInitiated,
            _ => Self::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::SuccessRebootRequired => "SuccessRebootRequired",
            Self::SuccessRebootInitiated => "SuccessRebootInitiated",
            Self::Failure => "Failure",
        }
    }
}

/// 配布実行1回分の報告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub outcome: InstallOutcome,
    /// インストーラ自身の終了コード（起動に失敗した場合はNone）
    pub installer_exit_code: Option<i32>,
    pub detail: String,
}

impl InstallReport {
    /// 配布コンポーネント自身の終了コード。成功系はホスト契約の値を
    /// そのまま通し、失敗はインストーラの非0コードを透過（なければ1）。
    pub fn process_exit_code(&self) -> i32 {
        match self.outcome {
            InstallOutcome::Success => 0,
            InstallOutcome::SuccessRebootRequired => EXIT_REBOOT_REQUIRED,
            InstallOutcome::SuccessRebootInitiated => EXIT_REBOOT_INITIATED,
            InstallOutcome::Failure => match self.installer_exit_code {
                Some(code) if code != 0 => code,
                _ => 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_mapping_follows_installer_contract() {
        assert_eq!(InstallOutcome::from_exit_code(0), InstallOutcome::Success);
        assert_eq!(
            InstallOutcome::from_exit_code(3010),
            InstallOutcome::SuccessRebootRequired
        );
        assert_eq!(
            InstallOutcome::from_exit_code(1641),
            InstallOutcome::SuccessRebootInitiated
        );
        assert_eq!(InstallOutcome::from_exit_code(17), InstallOutcome::Failure);
        assert_eq!(
            InstallOutcome::from_exit_code(-1073741819),
            InstallOutcome::Failure
        );
    }

    #[test]
    fn reboot_codes_count_as_success() {
        assert!(InstallOutcome::SuccessRebootRequired.is_success());
        assert!(InstallOutcome::SuccessRebootInitiated.is_success());
        assert!(!InstallOutcome::Failure.is_success());
    }

    #[test]
    fn failure_passes_installer_code_through() {
        let report = InstallReport {
            outcome: InstallOutcome::Failure,
            installer_exit_code: Some(17),
            detail: "installer failed".into(),
        };
        assert_eq!(report.process_exit_code(), 17);

        let launch_failed = InstallReport {
            outcome: InstallOutcome::Failure,
            installer_exit_code: None,
            detail: "could not launch".into(),
        };
        assert_eq!(launch_failed.process_exit_code(), 1);
    }

    #[test]
    fn success_codes_pass_host_contract_through() {
        let report = InstallReport {
            outcome: InstallOutcome::SuccessRebootRequired,
            installer_exit_code: Some(3010),
            detail: String::new(),
        };
        assert_eq!(report.process_exit_code(), 3010);
    }
}
