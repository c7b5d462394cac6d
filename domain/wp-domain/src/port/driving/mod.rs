//! 駆動されるポート（入力インターフェース）。
//!
//! モニターパイプラインが呼び出すチェックロジックの契約を定義する。

mod monitor_check;

pub use monitor_check::*;
