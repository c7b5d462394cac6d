//! 出力プロトコル検証サービス
//!
//! キャプチャしたコンポーネント出力がマーカー契約に従っているかを検査する。
//! ローカルハーネスが使用し、ホスト側の解析器の挙動を再現する。

use crate::model::markers::{
    END_DIAGNOSTIC, END_RESULT, START_DIAGNOSTIC, START_RESULT, is_valid_output_var,
};

/// 検証結果。エラーは最初の1件で打ち切らず、見つかった分をすべて集める。
#[derive(Debug, Clone, Default)]
pub struct OutputValidation {
    pub errors: Vec<String>,
}

impl OutputValidation {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

/// モニター出力テキストを検証する。
pub fn validate_monitor_output(text: &str, output_var: &str) -> OutputValidation {
    let mut errors = Vec::new();

    if !is_valid_output_var(output_var) {
        errors.push(format!(
            "Invalid output variable '{}'. Use only letters, digits, and underscore (example: Status).",
            output_var
        ));
        return OutputValidation::fail(errors);
    }

    let lines: Vec<&str> = text.lines().collect();
    let find_all = |marker: &str| -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim() == marker)
            .map(|(idx, _)| idx)
            .collect()
    };

    let diag_start = find_all(START_DIAGNOSTIC);
    let diag_end = find_all(END_DIAGNOSTIC);
    let res_start = find_all(START_RESULT);
    let res_end = find_all(END_RESULT);

    if diag_start.len() != 1 {
        errors.push(format!("Expected exactly one '{}' line.", START_DIAGNOSTIC));
    }
    if diag_end.len() != 1 {
        errors.push(format!("Expected exactly one '{}' line.", END_DIAGNOSTIC));
    }
    if res_start.len() != 1 {
        errors.push(format!("Expected exactly one '{}' line.", START_RESULT));
    }
    if res_end.len() != 1 {
        errors.push(format!("Expected exactly one '{}' line.", END_RESULT));
    }
    if !errors.is_empty() {
        return OutputValidation::fail(errors);
    }

    let (ds, de, rs, re) = (diag_start[0], diag_end[0], res_start[0], res_end[0]);
    if !(ds < de && de < rs && rs < re) {
        errors.push(
            "Marker order must be: Start Diagnostic -> End Diagnostic -> Start Result -> End Result."
                .to_string(),
        );
        return OutputValidation::fail(errors);
    }

    let non_empty: Vec<&str> = lines[rs + 1..re]
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if non_empty.is_empty() {
        errors.push("Result block is empty; expected one output variable line.".to_string());
        return OutputValidation::fail(errors);
    }

    let prefix = format!("{}=", output_var);
    let matching: Vec<&str> = non_empty
        .iter()
        .copied()
        .filter(|line| line.len() > prefix.len() && line.starts_with(&prefix))
        .collect();
    if matching.len() != 1 {
        errors.push(format!(
            "Expected exactly one '{}...' line inside the result block; found {}.",
            prefix,
            matching.len()
        ));
        errors.push("Example: Status=OK: All checks passed".to_string());
        return OutputValidation::fail(errors);
    }

    if non_empty.len() != 1 {
        errors.push(
            "Result block must contain exactly one non-empty line (the output variable line)."
                .to_string(),
        );
        return OutputValidation::fail(errors);
    }

    let value = &matching[0][prefix.len()..];
    if value.starts_with(char::is_whitespace) {
        errors.push(
            "Do not include spaces around '=' (use 'Status=OK: ...', not 'Status= OK: ...')."
                .to_string(),
        );
        return OutputValidation::fail(errors);
    }

    OutputValidation::default()
}

/// 結果ブロックからステータス行（`var=value` の行全体）を取り出す。
/// 検証には通らない出力からもベストエフォートで抽出する。
pub fn extract_status_line(text: &str, output_var: &str) -> Option<String> {
    let prefix = format!("{}=", output_var);
    let mut in_result = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == START_RESULT {
            in_result = true;
            continue;
        }
        if trimmed == END_RESULT {
            in_result = false;
            continue;
        }
        if in_result && line.starts_with(&prefix) {
            return Some(line.to_string());
        }
    }
    None
}
