//! wp-composition: 各実行ファイル向けのランタイムを組み立てるコンポジションルート。
//! ドメイン／アプリケーション／各種アダプタをここで配線し、apps/* はこのクレートだけに依存する。

pub mod error;
pub mod harness;
pub mod paths;
pub mod runtime;

// apps/* が内側レイヤーの型に触れる必要がある場合は、ここから辿れるようにする。
// （apps が wp-domain等を直接依存しないため）
pub use wp_app as app;
pub use wp_domain as domain;

// 利便性のための再エクスポート（appsはアダプタクレートではなくこれらを使用）
pub use error::{err, Result};
pub use runtime::ComponentRuntime;
pub use wp_app::{MonitorRun, MonitorSettings};
pub use wp_domain::model::InstallReport;
