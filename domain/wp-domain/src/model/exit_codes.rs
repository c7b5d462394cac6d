//! モニターの終了コード定義
//!
//! ホストが区別するのは 0（正常）と非0（アラート）の2クラスのみ。
//! 重大度はホスト側のアラート優先度設定で制御され、終了コードには載せない。
//! 3010/1641 はインストーラ契約専用（model::install）であり、モニターでは使用しない。

/// 正常終了（アラートなし）
pub const HEALTHY: i32 = 0;
/// アラート（非OKステータス全般）
pub const ALERT: i32 = 1;
/// 出力プロトコル検証失敗（ローカルハーネス専用）
pub const VALIDATION_FAILED: i32 = 2;
