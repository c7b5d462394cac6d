//! 出力プロトコルエミッタ
//!
//! 診断ブロックと結果ブロックのマーカー出力を一手に引き受け、
//! 順序不変条件（診断を閉じてから結果を開く）を型で強制する。
//! 結果の出力は self を消費するため、1回の実行で2度出力することはできない。

use std::io::Write;

use crate::error::DomainError;
use crate::model::markers::{
    END_DIAGNOSTIC, END_RESULT, START_DIAGNOSTIC, START_RESULT, is_valid_output_var,
};
use crate::model::MonitorOutcome;

/// コンポーネント1実行分の出力ストリーム。
#[derive(Debug)]
pub struct ComponentOutput<W: Write> {
    writer: W,
    output_var: String,
    diagnostics_open: bool,
}

impl<W: Write> ComponentOutput<W> {
    pub fn new(writer: W, output_var: impl Into<String>) -> Result<Self, DomainError> {
        let output_var: String = output_var.into();
        if !is_valid_output_var(&output_var) {
            return Err(DomainError::ConfigError(format!(
                "invalid output variable name '{}'",
                output_var
            )));
        }
        Ok(Self {
            writer,
            output_var,
            diagnostics_open: false,
        })
    }

    /// 診断ブロックを開く。既に開いていれば何もしない。
    pub fn begin_diagnostics(&mut self) -> Result<(), DomainError> {
        if !self.diagnostics_open {
            self.write_line(START_DIAGNOSTIC)?;
            self.diagnostics_open = true;
        }
        Ok(())
    }

    /// 診断行を1行出力する。ブロックが未開なら先に開く。
    /// 操作者向けの自由記述であり、ホストは解析しない。
    pub fn diagnostic(&mut self, line: &str) -> Result<(), DomainError> {
        self.begin_diagnostics()?;
        for piece in line.lines() {
            self.write_line(piece)?;
        }
        Ok(())
    }

    /// 結果を出力して終了コードを返す。selfを消費するため二重出力は不可能。
    /// 診断ブロックは（未開なら空で開いた上で）必ずここで閉じる。
    pub fn emit_result(mut self, outcome: &MonitorOutcome) -> Result<i32, DomainError> {
        self.begin_diagnostics()?;
        self.write_line(END_DIAGNOSTIC)?;
        self.write_line(START_RESULT)?;
        let line = format!("{}={}", self.output_var, outcome.status_line());
        self.write_line(&line)?;
        self.write_line(END_RESULT)?;
        self.writer
            .flush()
            .map_err(|e| DomainError::IoError(e.to_string()))?;
        Ok(outcome.exit_code())
    }

    fn write_line(&mut self, line: &str) -> Result<(), DomainError> {
        writeln!(self.writer, "{}", line).map_err(|e| DomainError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validate_service::validate_monitor_output;

    fn emit(outcome: &MonitorOutcome, diagnostics: &[&str]) -> (String, i32) {
        let mut buf: Vec<u8> = Vec::new();
        let mut output = ComponentOutput::new(&mut buf, "Status").unwrap();
        for line in diagnostics {
            output.diagnostic(line).unwrap();
        }
        let code = output.emit_result(outcome).unwrap();
        (String::from_utf8(buf).unwrap(), code)
    }

    #[test]
    fn markers_appear_exactly_once_and_in_order() {
        let (text, code) = emit(&MonitorOutcome::ok("all good"), &["checking", "done"]);
        let validation = validate_monitor_output(&text, "Status");
        assert!(validation.ok(), "unexpected errors: {:?}", validation.errors);
        assert_eq!(code, 0);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "<-Start Diagnostic->");
        assert_eq!(lines[1], "checking");
        assert_eq!(lines[2], "done");
        assert_eq!(lines[3], "<-End Diagnostic->");
        assert_eq!(lines[4], "<-Start Result->");
        assert_eq!(lines[5], "Status=OK: all good");
        assert_eq!(lines[6], "<-End Result->");
    }

    #[test]
    fn result_without_diagnostics_still_emits_an_empty_block() {
        let (text, code) = emit(&MonitorOutcome::critical("service stopped"), &[]);
        let validation = validate_monitor_output(&text, "Status");
        assert!(validation.ok(), "unexpected errors: {:?}", validation.errors);
        assert_ne!(code, 0);
        assert!(text.contains("Status=CRITICAL: service stopped"));
    }

    #[test]
    fn multi_line_diagnostic_is_split_into_lines() {
        let (text, _) = emit(&MonitorOutcome::ok("fine"), &["first\nsecond"]);
        assert!(text.contains("first\nsecond\n<-End Diagnostic->"));
    }

    #[test]
    fn invalid_output_var_is_rejected_up_front() {
        let buf: Vec<u8> = Vec::new();
        assert!(ComponentOutput::new(buf, "bad name").is_err());
    }

    #[test]
    fn exit_code_matches_status() {
        let (_, ok_code) = emit(&MonitorOutcome::ok("fine"), &[]);
        let (_, warn_code) = emit(&MonitorOutcome::warning("meh"), &[]);
        let (_, err_code) = emit(&MonitorOutcome::error("boom"), &[]);
        assert_eq!(ok_code, 0);
        assert_ne!(warn_code, 0);
        assert_eq!(warn_code, err_code);
    }
}
