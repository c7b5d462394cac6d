//! 出力ストリームのマーカー定数
//!
//! ホストが解析するリテラルトークン。各行単独・順序固定で出力する。
//! Start Diagnostic -> End Diagnostic -> Start Result -> End Result

pub const START_DIAGNOSTIC: &str = "<-Start Diagnostic->";
pub const END_DIAGNOSTIC: &str = "<-End Diagnostic->";
pub const START_RESULT: &str = "<-Start Result->";
pub const END_RESULT: &str = "<-End Result->";

/// ホスト側モニター設定の既定出力変数名
pub const DEFAULT_OUTPUT_VAR: &str = "Status";

/// 出力変数名は英数字とアンダースコアのみ
pub fn is_valid_output_var(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_var_accepts_alnum_and_underscore() {
        assert!(is_valid_output_var("Status"));
        assert!(is_valid_output_var("disk_free_2"));
        assert!(!is_valid_output_var(""));
        assert!(!is_valid_output_var("Status Line"));
        assert!(!is_valid_output_var("status-line"));
    }
}
