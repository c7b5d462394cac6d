//! インストーラ起動ポート

use std::path::Path;

use crate::error::DomainError;

/// インストーラの同期起動ポート。
pub trait InstallerLauncher {
    /// 成果物が作業ディレクトリ相対で存在するか
    fn artifact_exists(&self, artifact: &Path) -> bool;

    /// インストーラをブロッキング実行し、終了コードを返す
    fn run(&self, artifact: &Path, args: &[String]) -> Result<i32, DomainError>;
}
