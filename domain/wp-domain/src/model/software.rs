use crate::DomainError;

/// インストールスコープ（システム全体 / ユーザー単位）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallScope {
    System,
    /// 所有ユーザー。SIDが解決できない場合は "Unknown User"。
    User { owner: String },
}

impl InstallScope {
    pub fn label(&self) -> String {
        match self {
            Self::System => "System".to_string(),
            Self::User { owner } => format!("User ({})", owner),
        }
    }
}

/// アンインストールレジストリから組み立てるソフトウェアレコード。
/// 実行ごとに再構築する読み取り専用の一時データ（キャッシュなし）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareRecord {
    pub display_name: String,
    pub publisher: Option<String>,
    pub version: Option<String>,
    pub scope: InstallScope,
}

impl SoftwareRecord {
    /// DisplayNameへの大文字小文字を無視した部分一致。
    /// 前方一致や正規表現ではなく、部分一致で再現率を優先する設計。
    pub fn matches(&self, pattern: &str) -> bool {
        self.display_name
            .to_lowercase()
            .contains(&pattern.to_lowercase())
    }

    pub fn summary(&self) -> String {
        let version = self.version.as_deref().unwrap_or("unknown version");
        let publisher = self.publisher.as_deref().unwrap_or("unknown publisher");
        format!(
            "{} {} ({}) [{}]",
            self.display_name,
            version,
            publisher,
            self.scope.label()
        )
    }
}

/// 検出クエリ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionQuery {
    name_pattern: String,
    include_user_scope: bool,
}

impl DetectionQuery {
    pub fn new(
        name_pattern: impl Into<String>,
        include_user_scope: bool,
    ) -> Result<Self, DomainError> {
        let name_pattern: String = name_pattern.into();
        if name_pattern.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "detection pattern must not be blank".into(),
            ));
        }
        Ok(Self {
            name_pattern,
            include_user_scope,
        })
    }

    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    pub fn include_user_scope(&self) -> bool {
        self.include_user_scope
    }
}

/// 検出結果。
#[derive(Debug, Clone, Default)]
pub struct DetectionReport {
    pub records: Vec<SoftwareRecord>,
    /// ユーザーハイブ列挙（遅い経路）まで到達したか
    pub user_scope_scanned: bool,
}

impl DetectionReport {
    pub fn found(&self) -> bool {
        !self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> SoftwareRecord {
        SoftwareRecord {
            display_name: name.to_string(),
            publisher: Some("Adobe Inc.".to_string()),
            version: Some("23.6".to_string()),
            scope: InstallScope::System,
        }
    }

    #[test]
    fn matches_is_case_insensitive_substring() {
        let rec = record("Adobe Acrobat Reader DC");
        assert!(rec.matches("Acrobat"));
        assert!(rec.matches("acrobat reader"));
        assert!(rec.matches("ADOBE"));
        assert!(!rec.matches("Nonexistent"));
    }

    #[test]
    fn blank_pattern_is_rejected() {
        assert!(DetectionQuery::new("   ", false).is_err());
        assert!(DetectionQuery::new("7-Zip", true).is_ok());
    }

    #[test]
    fn summary_degrades_missing_fields() {
        let rec = SoftwareRecord {
            display_name: "7-Zip".to_string(),
            publisher: None,
            version: None,
            scope: InstallScope::User {
                owner: "Unknown User".to_string(),
            },
        };
        let summary = rec.summary();
        assert!(summary.contains("unknown version"));
        assert!(summary.contains("Unknown User"));
    }
}
