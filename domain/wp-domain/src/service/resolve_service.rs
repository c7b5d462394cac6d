//! パラメータ解決サービス
//!
//! スキーマ全体をソースから一括解決する。型変換そのものは全域関数であり、
//! 失敗し得るのは必須パラメータの欠落のみ。

use crate::error::DomainError;
use crate::model::{ParamSchema, ResolvedParams};
use crate::port::driven::ParamSource;

/// スキーマの全パラメータを解決する。
/// 必須パラメータが欠落・空白の場合のみ ConfigError を返す。
pub fn resolve_schema(
    source: &dyn ParamSource,
    schema: &ParamSchema,
) -> Result<ResolvedParams, DomainError> {
    let mut resolved = ResolvedParams::default();
    for spec in schema.specs() {
        let raw = source.get(spec.name());
        let is_blank = raw
            .as_deref()
            .map(|value| value.trim().is_empty())
            .unwrap_or(true);
        if spec.is_required() && is_blank {
            return Err(DomainError::ConfigError(format!(
                "required parameter '{}' is missing",
                spec.name()
            )));
        }
        resolved.insert(spec.name(), spec.coerce(raw.as_deref()));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamSpec, ParamValue};
    use std::collections::BTreeMap;

    struct MapSource(BTreeMap<String, String>);

    impl MapSource {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ParamSource for MapSource {
        fn get(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    fn schema() -> ParamSchema {
        ParamSchema::new(vec![
            ParamSpec::required_text("softwareName"),
            ParamSpec::integer("checkTimeoutMs", 3000),
            ParamSpec::flag("includeUserScope", false),
        ])
    }

    #[test]
    fn resolves_all_declared_parameters() {
        let source = MapSource::new(&[
            ("softwareName", "Acrobat"),
            ("checkTimeoutMs", "5000"),
            ("includeUserScope", "yes"),
        ]);
        let resolved = resolve_schema(&source, &schema()).unwrap();
        assert_eq!(resolved.text("softwareName"), Some("Acrobat"));
        assert_eq!(resolved.integer("checkTimeoutMs"), Some(5000));
        assert_eq!(resolved.flag("includeUserScope"), Some(true));
    }

    #[test]
    fn missing_required_parameter_is_a_config_error() {
        let source = MapSource::new(&[("checkTimeoutMs", "5000")]);
        let err = resolve_schema(&source, &schema()).unwrap_err();
        assert!(matches!(err, DomainError::ConfigError(_)));
        assert!(err.to_string().contains("softwareName"));
    }

    #[test]
    fn blank_required_parameter_is_not_silently_defaulted() {
        let source = MapSource::new(&[("softwareName", "   ")]);
        assert!(resolve_schema(&source, &schema()).is_err());
    }

    #[test]
    fn optional_parameters_fall_back_without_error() {
        let source = MapSource::new(&[("softwareName", "7-Zip")]);
        let resolved = resolve_schema(&source, &schema()).unwrap();
        assert_eq!(resolved.integer("checkTimeoutMs"), Some(3000));
        assert_eq!(resolved.flag("includeUserScope"), Some(false));
    }

    #[test]
    fn malformed_integer_never_fails_resolution() {
        let source = MapSource::new(&[
            ("softwareName", "7-Zip"),
            ("checkTimeoutMs", "three seconds"),
        ]);
        let resolved = resolve_schema(&source, &schema()).unwrap();
        assert_eq!(resolved.integer("checkTimeoutMs"), Some(3000));
        assert_eq!(
            resolved.get("checkTimeoutMs"),
            Some(&ParamValue::Integer(3000))
        );
    }
}
