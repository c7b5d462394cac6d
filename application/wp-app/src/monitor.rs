//! モニター実行パイプライン
//!
//! Running -> Resolving -> Checking -> Emitting の一本道。
//! どの失敗経路も必ず結果マーカーを通って合流し、終了は呼び出し元
//! （実行ファイル）が一度だけ行う。

use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use wp_domain::model::markers::{is_valid_output_var, DEFAULT_OUTPUT_VAR};
use wp_domain::model::{MonitorOutcome, ParamSchema, ResolvedParams};
use wp_domain::port::driven::{Clock, ParamSource};
use wp_domain::port::driving::{CheckReport, MonitorCheck};
use wp_domain::service::output_service::ComponentOutput;
use wp_domain::service::resolve_service::resolve_schema;
use wp_domain::DomainError;

/// モニターの既定チェック制限時間（ミリ秒）。
/// モニターは高頻度で実行されるため、3秒を硬い上限として設計する。
pub const DEFAULT_CHECK_TIMEOUT_MS: u64 = 3_000;

/// モニター1実行分の設定。
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub output_var: String,
    pub check_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            output_var: DEFAULT_OUTPUT_VAR.to_string(),
            check_timeout: Duration::from_millis(DEFAULT_CHECK_TIMEOUT_MS),
        }
    }
}

/// モニター1実行分の結果。終了コードを運ぶだけで、終了そのものは行わない。
#[derive(Debug, Clone)]
pub struct MonitorRun {
    pub outcome: MonitorOutcome,
    pub exit_code: i32,
    pub duration_ms: u64,
}

/// パイプライン本体。
/// Errを返すのは出力ストリームへの書き込みが物理的に失敗した場合のみ。
pub fn run_monitor<W: Write>(
    writer: W,
    settings: &MonitorSettings,
    source: &dyn ParamSource,
    clock: &dyn Clock,
    schema: &ParamSchema,
    check: Box<dyn MonitorCheck>,
) -> Result<MonitorRun, DomainError> {
    let started_ms = clock.now_ms();

    // 出力変数名が壊れていても結果マーカーなしで終わらせない。
    // 既定変数へ退避した上でCriticalを報告する。
    let (output_var, var_fault) = if is_valid_output_var(&settings.output_var) {
        (settings.output_var.clone(), None)
    } else {
        (
            DEFAULT_OUTPUT_VAR.to_string(),
            Some(settings.output_var.clone()),
        )
    };
    let mut output = ComponentOutput::new(writer, output_var)?;
    output.diagnostic(&format!("check: {}", check.name()))?;

    let outcome = if let Some(bad_var) = var_fault {
        output.diagnostic(&format!("invalid output variable '{}'", bad_var))?;
        MonitorOutcome::critical(format!("invalid output variable name '{}'", bad_var))
    } else {
        match resolve_schema(source, schema) {
            Err(err) => {
                // 必須パラメータ欠落は黙って既定値へ落とさず、アラートとして表面化
                output.diagnostic(&err.to_string())?;
                MonitorOutcome::critical(err.to_string())
            }
            Ok(params) => {
                output.diagnostic(&format!("resolved {} parameter(s)", params.len()))?;
                match wait_for_check(check, params, settings.check_timeout) {
                    CheckWait::Finished(Ok(report)) => {
                        for note in &report.notes {
                            output.diagnostic(note)?;
                        }
                        report.outcome
                    }
                    CheckWait::Finished(Err(err)) => {
                        output.diagnostic(&err.to_string())?;
                        MonitorOutcome::error(format!("check failed: {}", err))
                    }
                    CheckWait::TimedOut => MonitorOutcome::critical(format!(
                        "check timed out after {} ms",
                        settings.check_timeout.as_millis()
                    )),
                    CheckWait::Aborted => {
                        MonitorOutcome::error("check aborted unexpectedly".to_string())
                    }
                }
            }
        }
    };

    let duration_ms = clock.now_ms().saturating_sub(started_ms);
    output.diagnostic(&format!("check runtime {} ms", duration_ms))?;

    let exit_code = output.emit_result(&outcome)?;
    Ok(MonitorRun {
        outcome,
        exit_code,
        duration_ms,
    })
}

enum CheckWait {
    Finished(Result<CheckReport, DomainError>),
    TimedOut,
    Aborted,
}

/// チェックをワーカースレッドで実行し、制限時間までブロックして待つ。
/// 制限超過時はワーカーを放置して打ち切る（チェック側へのキャンセル伝播はない）。
fn wait_for_check(
    check: Box<dyn MonitorCheck>,
    params: ResolvedParams,
    timeout: Duration,
) -> CheckWait {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("wp-check".to_string())
        .spawn(move || {
            let _ = tx.send(check.execute(&params));
        });
    if let Err(err) = spawned {
        return CheckWait::Finished(Err(DomainError::Unknown(format!(
            "failed to start check worker: {}",
            err
        ))));
    }

    match rx.recv_timeout(timeout) {
        Ok(result) => CheckWait::Finished(result),
        Err(mpsc::RecvTimeoutError::Timeout) => CheckWait::TimedOut,
        // ワーカーがpanicで死ぬと送信側が先に破棄される
        Err(mpsc::RecvTimeoutError::Disconnected) => CheckWait::Aborted,
    }
}
