//! wp-app: アプリケーション層。
//! ドメインサービスとポートを組み合わせて、モニター実行・ソフトウェア検出・
//! インストーラ配布のユースケースを実装する。

pub mod deploy;
pub mod detect;
pub mod monitor;

pub use deploy::{run_install, DeployRequest};
pub use detect::DetectionCheck;
pub use monitor::{run_monitor, MonitorRun, MonitorSettings};
