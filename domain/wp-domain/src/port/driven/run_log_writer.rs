//! 実行ログポート

use crate::error::DomainError;

/// ハーネス実行1回分のログレコード
#[derive(Debug, Clone)]
pub struct RunLogRecord {
    /// ISO8601タイムスタンプ
    pub timestamp: String,
    /// 実行したコンポーネント（パスまたは名前）
    pub component: String,
    /// 子プロセスの終了コード
    pub exit_code: Option<i32>,
    /// 結果ブロックから抽出したステータス行
    pub status_line: Option<String>,
    /// 出力プロトコル検証に通ったか（検証した場合のみ）
    pub output_valid: Option<bool>,
    /// 処理時間（ミリ秒）
    pub duration_ms: u128,
    /// 作業ディレクトリ
    pub workdir: String,
}

/// 実行ログライターポート
pub trait RunLogWriter {
    /// レコードを1件追記する
    fn append(&self, record: &RunLogRecord) -> Result<(), DomainError>;
}
