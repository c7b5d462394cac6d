//! ソフトウェア検出サービス
//!
//! システムスコープを先に走査し、一致があればユーザースコープを完全に省略する。
//! ユーザーハイブ列挙は遅い経路であり、不要なら踏まない。

use crate::model::{DetectionQuery, DetectionReport};
use crate::port::driven::SoftwareInventory;

/// アンインストールレジストリに対する検出を実行する。
/// インベントリ全体の読み取り失敗は空のインベントリとして扱う
/// （一時的なアクセス障害でチェック全体を落とさない）。
pub fn detect(inventory: &dyn SoftwareInventory, query: &DetectionQuery) -> DetectionReport {
    let system = inventory.system_records().unwrap_or_default();
    let records: Vec<_> = system
        .into_iter()
        .filter(|record| record.matches(query.name_pattern()))
        .collect();

    if !records.is_empty() || !query.include_user_scope() {
        return DetectionReport {
            records,
            user_scope_scanned: false,
        };
    }

    let user = inventory.user_records().unwrap_or_default();
    let records = user
        .into_iter()
        .filter(|record| record.matches(query.name_pattern()))
        .collect();
    DetectionReport {
        records,
        user_scope_scanned: true,
    }
}
