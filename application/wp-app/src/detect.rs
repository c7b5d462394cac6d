//! ソフトウェア検出チェック
//!
//! 検出ドメインサービスをモニターチェックとして包む。
//! パラメータはすべて環境から解決済みの値で受け取る。

use wp_domain::model::{
    DetectionQuery, DetectionReport, MonitorOutcome, ParamSchema, ParamSpec, ResolvedParams,
};
use wp_domain::port::driven::SoftwareInventory;
use wp_domain::port::driving::{CheckReport, MonitorCheck};
use wp_domain::service::detection_service::detect;
use wp_domain::DomainError;

pub const PARAM_SOFTWARE_NAME: &str = "softwareName";
pub const PARAM_INCLUDE_USER_SCOPE: &str = "includeUserScope";
pub const PARAM_ALERT_WHEN_FOUND: &str = "alertWhenFound";

/// 検出チェックのパラメータ宣言。
pub fn detection_schema() -> ParamSchema {
    ParamSchema::new(vec![
        ParamSpec::required_text(PARAM_SOFTWARE_NAME),
        ParamSpec::flag(PARAM_INCLUDE_USER_SCOPE, false),
        // 既定は「見つからなければアラート」。禁止ソフト監視ではtrueにする。
        ParamSpec::flag(PARAM_ALERT_WHEN_FOUND, false),
    ])
}

/// アンインストールレジストリに対する検出チェック。
pub struct DetectionCheck {
    inventory: Box<dyn SoftwareInventory + Send>,
}

impl DetectionCheck {
    pub fn new(inventory: Box<dyn SoftwareInventory + Send>) -> Self {
        Self { inventory }
    }
}

impl MonitorCheck for DetectionCheck {
    fn name(&self) -> &str {
        "software-detection"
    }

    fn execute(&self, params: &ResolvedParams) -> Result<CheckReport, DomainError> {
        let pattern = params.text(PARAM_SOFTWARE_NAME).unwrap_or_default();
        let include_user_scope = params.flag(PARAM_INCLUDE_USER_SCOPE).unwrap_or(false);
        let alert_when_found = params.flag(PARAM_ALERT_WHEN_FOUND).unwrap_or(false);

        let query = DetectionQuery::new(pattern, include_user_scope)?;
        let report = detect(self.inventory.as_ref(), &query);

        let mut check = CheckReport::new(build_outcome(
            query.name_pattern(),
            alert_when_found,
            &report,
        ));
        check.notes.push(format!(
            "system uninstall subtrees scanned (pattern '{}')",
            query.name_pattern()
        ));
        if report.user_scope_scanned {
            check.notes.push("per-user hives scanned".to_string());
        }
        for record in &report.records {
            check.notes.push(format!("found: {}", record.summary()));
        }
        Ok(check)
    }
}

fn build_outcome(
    pattern: &str,
    alert_when_found: bool,
    report: &DetectionReport,
) -> MonitorOutcome {
    match (report.found(), alert_when_found) {
        (true, true) => MonitorOutcome::critical(format!(
            "prohibited software detected: {}",
            report.records[0].summary()
        )),
        (true, false) => MonitorOutcome::ok(format!(
            "{} installed ({} match(es); {})",
            pattern,
            report.records.len(),
            report.records[0].summary()
        )),
        (false, true) => MonitorOutcome::ok(format!("{} not present", pattern)),
        (false, false) => MonitorOutcome::critical(format!("{} not detected", pattern)),
    }
}
