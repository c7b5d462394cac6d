use std::collections::BTreeMap;

/// 宣言型ごとの既定値を持つ閉じたタグ付き共用体。
/// パーサはスキーマ定義時に型で固定され、呼び出し時の動的分岐はない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Text(String),
    Integer(i64),
    Flag(bool),
}

/// パラメータ1件の宣言。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
    required: bool,
}

impl ParamSpec {
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Text(default.into()),
            required: false,
        }
    }

    /// 欠落時に既定値へ黙って落ちてはならないテキストパラメータ。
    pub fn required_text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Text(String::new()),
            required: true,
        }
    }

    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Integer(default),
            required: false,
        }
    }

    pub fn flag(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Flag(default),
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// ソース値1件を解決値へ変換する。決して失敗しない（全域関数）。
    /// 欠落・空白は既定値、整数の解析失敗も既定値。
    pub fn coerce(&self, raw: Option<&str>) -> ParamValue {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        match (&self.kind, raw) {
            (ParamKind::Text(default), None) => ParamValue::Text(default.clone()),
            (ParamKind::Text(_), Some(value)) => ParamValue::Text(value.to_string()),
            (ParamKind::Integer(default), None) => ParamValue::Integer(*default),
            (ParamKind::Integer(default), Some(value)) => {
                ParamValue::Integer(value.parse().unwrap_or(*default))
            }
            (ParamKind::Flag(default), None) => ParamValue::Flag(*default),
            (ParamKind::Flag(_), Some(value)) => ParamValue::Flag(parse_flag_token(value)),
        }
    }
}

/// 真と解釈するトークンは `true` / `1` / `yes` の3つのみ（大文字小文字を区別）。
/// それ以外の非空トークンはすべて偽。互換性契約のため正確に維持すること。
pub fn parse_flag_token(token: &str) -> bool {
    matches!(token, "true" | "1" | "yes")
}

/// 解決済みのパラメータ値。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

/// コンポーネントが宣言するパラメータ一式。
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    specs: Vec<ParamSpec>,
}

impl ParamSchema {
    pub fn new(specs: Vec<ParamSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// プロセス開始時に一度だけ構築し、チェックへ値渡しする明示的な設定。
/// チェックロジックが環境を直接読むことはない。
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_integer)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_flag)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_grammar_is_case_sensitive_and_closed() {
        for token in ["true", "1", "yes"] {
            assert!(parse_flag_token(token), "{token} should be true");
        }
        for token in ["True", "TRUE", "YES", "Yes", "no", "0", "on", "y"] {
            assert!(!parse_flag_token(token), "{token} should be false");
        }
    }

    #[test]
    fn blank_flag_falls_back_to_default_not_false() {
        let spec = ParamSpec::flag("includeUserScope", true);
        assert_eq!(spec.coerce(None), ParamValue::Flag(true));
        assert_eq!(spec.coerce(Some("")), ParamValue::Flag(true));
        assert_eq!(spec.coerce(Some("   ")), ParamValue::Flag(true));
        assert_eq!(spec.coerce(Some("no")), ParamValue::Flag(false));
    }

    #[test]
    fn malformed_integer_resolves_to_default() {
        let spec = ParamSpec::integer("thresholdMb", 500);
        assert_eq!(spec.coerce(Some("not-a-number")), ParamValue::Integer(500));
        assert_eq!(spec.coerce(Some("12.5")), ParamValue::Integer(500));
        assert_eq!(spec.coerce(Some("750")), ParamValue::Integer(750));
        assert_eq!(spec.coerce(None), ParamValue::Integer(500));
    }

    #[test]
    fn blank_text_resolves_to_default() {
        let spec = ParamSpec::text("serviceName", "Spooler");
        assert_eq!(
            spec.coerce(Some("  ")),
            ParamValue::Text("Spooler".to_string())
        );
        assert_eq!(
            spec.coerce(Some("wuauserv")),
            ParamValue::Text("wuauserv".to_string())
        );
    }
}
