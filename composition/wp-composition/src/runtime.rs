//! コンポーネントランタイム
//!
//! 本番コンポーネント（wp-monitor / wp-deploy）の依存関係をここで組み立てる。
//! パラメータはすべてホストが注入したプロセス環境から解決する。

use std::io;
use std::time::Duration;

use wp_adapter_clock::ClockAdapter;
use wp_adapter_env::EnvParamSource;
use wp_adapter_process::ProcessLauncher;
use wp_adapter_registry::RegistryInventory;
use wp_app::deploy::{deploy_schema, run_install, DeployRequest};
use wp_app::detect::{detection_schema, DetectionCheck};
use wp_app::monitor::{run_monitor, MonitorRun, MonitorSettings, DEFAULT_CHECK_TIMEOUT_MS};
use wp_domain::model::markers::DEFAULT_OUTPUT_VAR;
use wp_domain::model::{InstallReport, ParamSchema, ParamSpec};
use wp_domain::service::resolve_service::resolve_schema;
use wp_domain::DomainError;

/// ホスト側モニター設定と揃える出力変数名パラメータ
pub const PARAM_RESULT_VARIABLE: &str = "resultVariable";
/// チェック制限時間（ミリ秒）パラメータ
pub const PARAM_CHECK_TIMEOUT_MS: &str = "checkTimeoutMs";

#[derive(Debug, Default)]
pub struct ComponentRuntime {
    clock: ClockAdapter,
}

impl ComponentRuntime {
    pub fn new() -> Self {
        Self {
            clock: ClockAdapter::new(),
        }
    }

    /// モニター共通設定を環境から解決する。
    /// どちらのパラメータも必須ではないため、解決が失敗することはない。
    pub fn monitor_settings(&self) -> MonitorSettings {
        let schema = ParamSchema::new(vec![
            ParamSpec::text(PARAM_RESULT_VARIABLE, DEFAULT_OUTPUT_VAR),
            ParamSpec::integer(PARAM_CHECK_TIMEOUT_MS, DEFAULT_CHECK_TIMEOUT_MS as i64),
        ]);
        let resolved = resolve_schema(&EnvParamSource::new(), &schema)
            .unwrap_or_default();
        let output_var = resolved
            .text(PARAM_RESULT_VARIABLE)
            .unwrap_or(DEFAULT_OUTPUT_VAR)
            .to_string();
        let timeout_ms = match resolved.integer(PARAM_CHECK_TIMEOUT_MS) {
            Some(ms) if ms > 0 => ms as u64,
            _ => DEFAULT_CHECK_TIMEOUT_MS,
        };
        MonitorSettings {
            output_var,
            check_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// ソフトウェア検出モニターを標準出力へ向けて実行する。
    pub fn run_detection_monitor(&self) -> Result<MonitorRun, DomainError> {
        let settings = self.monitor_settings();
        let check = DetectionCheck::new(Box::new(RegistryInventory::new()));
        run_monitor(
            io::stdout().lock(),
            &settings,
            &EnvParamSource::new(),
            &self.clock,
            &detection_schema(),
            Box::new(check),
        )
    }

    /// 配布コンポーネントを実行する。
    /// 必須パラメータの欠落のみErr（呼び出し元が失敗終了コードへ写像）。
    pub fn run_deploy(&self) -> Result<InstallReport, DomainError> {
        let params = resolve_schema(&EnvParamSource::new(), &deploy_schema())?;
        let request = DeployRequest::from_params(&params)?;
        Ok(run_install(&ProcessLauncher::new(), &request))
    }
}
