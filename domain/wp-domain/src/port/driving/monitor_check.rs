//! チェック実行ポート

use crate::error::DomainError;
use crate::model::{MonitorOutcome, ResolvedParams};

/// チェック1回分の報告。
/// notes は診断ブロックへ流す操作者向けの自由記述（ホストは解析しない）。
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub outcome: MonitorOutcome,
    pub notes: Vec<String>,
}

impl CheckReport {
    pub fn new(outcome: MonitorOutcome) -> Self {
        Self {
            outcome,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// 呼び出し側が供給する監視ロジック。
/// 制限時間付き実行のためワーカースレッドへ移動される（Send必須）。
pub trait MonitorCheck: Send {
    /// 診断ログに表示するチェック名
    fn name(&self) -> &str;

    /// 解決済みパラメータを受け取り、結果を返す。
    /// ここから逃げたエラーはパイプライン最外殻で Error 結果へ変換される。
    fn execute(&self, params: &ResolvedParams) -> Result<CheckReport, DomainError>;
}
