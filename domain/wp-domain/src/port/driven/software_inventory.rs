//! ソフトウェアインベントリポート

use crate::error::DomainError;
use crate::model::SoftwareRecord;

/// アンインストールレジストリの列挙ポート。
///
/// 実装側の契約: 個別キー/ハイブの読み取り失敗はその場で握りつぶし、
/// 列挙全体を中断しないこと。Errはインベントリ全体が読めない場合のみ。
pub trait SoftwareInventory {
    /// システム全体のレコード（64bit/32bitビュー両方）
    fn system_records(&self) -> Result<Vec<SoftwareRecord>, DomainError>;

    /// ロード済み各ユーザーハイブのレコード（遅い経路）
    fn user_records(&self) -> Result<Vec<SoftwareRecord>, DomainError>;
}
