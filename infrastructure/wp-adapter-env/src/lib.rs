//! 環境変数パラメータソースアダプター
//!
//! 本番のコンポーネントはホストが注入したプロセス環境から設定値を読む。
//! ローカルハーネス向けに KEY=VALUE ファイルの読み込みも提供する。

use std::collections::BTreeMap;
use std::path::Path;

use wp_domain::port::driven::ParamSource;
use wp_domain::DomainError;

/// プロセス環境を読むソース。
#[derive(Debug, Default)]
pub struct EnvParamSource;

impl EnvParamSource {
    pub fn new() -> Self {
        Self
    }
}

impl ParamSource for EnvParamSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// 注入されたマップを読むソース（ハーネス・テスト用）。
#[derive(Debug, Default)]
pub struct MapParamSource {
    values: BTreeMap<String, String>,
}

impl MapParamSource {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }
}

impl ParamSource for MapParamSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// KEY=VALUE 形式の変数ファイルを解釈する。
/// 空行と `#` コメントは無視、先頭の `export ` は剥がす。
/// 値全体を囲う単純なクォートのみ除去する（シェル互換の完全実装はしない）。
pub fn parse_var_file(text: &str) -> Result<Vec<(String, String)>, DomainError> {
    let mut pairs = Vec::new();
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim).unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err(DomainError::ConfigError(format!(
                "invalid variable line (expected KEY=VALUE): {}",
                raw_line
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::ConfigError(format!(
                "invalid variable line (empty key): {}",
                raw_line
            )));
        }
        pairs.push((key.to_string(), unquote(value.trim()).to_string()));
    }
    Ok(pairs)
}

/// 変数ファイルを読み込んで解釈する。
pub fn load_var_file(path: &Path) -> Result<Vec<(String, String)>, DomainError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        DomainError::ConfigError(format!("variable file {}: {}", path.display(), e))
    })?;
    parse_var_file(&text)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
