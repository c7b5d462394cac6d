//! ドメインエラー型
//!
//! 標準ライブラリのみ使用（外部エラーハンドリングクレートなし）

use std::fmt;

/// ドメイン層のエラー型
/// 各バリアントは特定の失敗シナリオを表現
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 必須パラメータ欠落など、設定値が無効
    ConfigError(String),

    /// レジストリアクセス拒否（権限不足）
    RegistryAccessDenied(String),

    /// ソフトウェアインベントリが一時的に利用不可
    InventoryUnavailable(String),

    /// インストーラ成果物が見つからない
    ArtifactMissing(String),

    /// プロセス起動失敗
    ProcessLaunchFailed(String),

    /// バリデーションエラー
    ValidationError(String),

    /// ファイルI/Oエラー
    IoError(String),

    /// タイムアウト
    Timeout(String),

    /// 不明なエラー
    Unknown(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            Self::RegistryAccessDenied(msg) => {
                write!(f, "Registry access denied: {}", msg)
            }
            Self::InventoryUnavailable(msg) => {
                write!(f, "Software inventory unavailable: {}", msg)
            }
            Self::ArtifactMissing(msg) => {
                write!(f, "Installer artifact missing: {}", msg)
            }
            Self::ProcessLaunchFailed(msg) => {
                write!(f, "Process launch failed: {}", msg)
            }
            Self::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {}", msg)
            }
            Self::Timeout(msg) => {
                write!(f, "Timeout: {}", msg)
            }
            Self::Unknown(msg) => {
                write!(f, "Unknown error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DomainError {}
