use crate::model::exit_codes;

/// 監視結果のステータス。
/// 終了コードへは OK かどうかの2値でのみ写像される（重大度は載せない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Ok,
    Warning,
    Critical,
    Error,
}

impl MonitorStatus {
    /// 結果行の正準プレフィックス
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "OK" => Some(Self::Ok),
            "WARNING" => Some(Self::Warning),
            "CRITICAL" => Some(Self::Critical),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// OK のときのみ 0。それ以外は単一の非0コード。
    pub fn exit_code(&self) -> i32 {
        if self.is_healthy() {
            exit_codes::HEALTHY
        } else {
            exit_codes::ALERT
        }
    }
}

/// 1回の実行につき1度だけ生成され、結果行として直列化される監視結果。
/// 永続化はしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOutcome {
    status: MonitorStatus,
    message: String,
}

impl MonitorOutcome {
    /// メッセージは1行不変条件を守るため、改行を空白へ畳み込む。
    pub fn new(status: MonitorStatus, message: impl Into<String>) -> Self {
        let message = single_line(&message.into());
        Self { status, message }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(MonitorStatus::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(MonitorStatus::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(MonitorStatus::Critical, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(MonitorStatus::Error, message)
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 出力変数へ入る値部分。正準文法: `<PREFIX>: <message>`
    pub fn status_line(&self) -> String {
        format!("{}: {}", self.status.as_prefix(), self.message)
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// 結果行の値部分を解釈する。正準文法を優先し、旧文法（`OK=` / `X=`）は
    /// 互換入力としてのみ受理する。旧文法の `X=` は Critical へ写像。
    pub fn parse_value(value: &str) -> Option<Self> {
        if let Some((prefix, rest)) = value.split_once(": ") {
            if let Some(status) = MonitorStatus::from_prefix(prefix) {
                return Some(Self::new(status, rest));
            }
        }
        if let Some(rest) = value.strip_prefix("OK=") {
            return Some(Self::ok(rest));
        }
        if let Some(rest) = value.strip_prefix("X=") {
            return Some(Self::critical(rest));
        }
        None
    }
}

fn single_line(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ").trim().to_string()
}
