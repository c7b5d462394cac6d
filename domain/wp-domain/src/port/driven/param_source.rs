//! パラメータソースポート

/// 名前付き設定値の読み取り元。本番ではプロセス環境、
/// ハーネスやテストでは注入されたマップが実装する。
pub trait ParamSource {
    /// 生のソース値を取得（存在しなければNone）
    fn get(&self, name: &str) -> Option<String>;
}
