//! Violations reported by the client configuration validator

use serde::{Deserialize, Serialize};
use std::fmt;

/// One missing or incomplete group in the client configuration.
///
/// Variants are declared in check order, so sorting a list of violations
/// reproduces the order in which the validator reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// `window.CONFIG` itself is not set
    ConfigUndefined,
    /// `CLIENT_ID` is missing or falsy
    MissingClientId,
    /// `CLIENT_SECRET` is missing or falsy
    MissingClientSecret,
    /// `SUPABASE`, `SUPABASE.URL` or `SUPABASE.ANON_KEY` is missing or falsy
    IncompleteSupabase,
    /// `NAVER_MAP` or `NAVER_MAP.CENTER` is missing or falsy
    IncompleteNaverMap,
}

impl Violation {
    /// User-facing message shown by the map page
    pub fn message(&self) -> &'static str {
        match self {
            Violation::ConfigUndefined => "CONFIG 객체가 정의되지 않았습니다.",
            Violation::MissingClientId => "네이버 지도 CLIENT_ID가 설정되지 않았습니다.",
            Violation::MissingClientSecret => {
                "네이버 지도 CLIENT_SECRET(시크릿값)이 설정되지 않았습니다."
            }
            Violation::IncompleteSupabase => "슈퍼베이스 설정이 완전하지 않습니다.",
            Violation::IncompleteNaverMap => "네이버 지도 설정이 완전하지 않습니다.",
        }
    }

    /// Configuration path the violation refers to
    pub fn field(&self) -> &'static str {
        match self {
            Violation::ConfigUndefined => "CONFIG",
            Violation::MissingClientId => "CONFIG.CLIENT_ID",
            Violation::MissingClientSecret => "CONFIG.CLIENT_SECRET",
            Violation::IncompleteSupabase => "CONFIG.SUPABASE",
            Violation::IncompleteNaverMap => "CONFIG.NAVER_MAP",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_message() {
        assert_eq!(
            Violation::MissingClientId.to_string(),
            "네이버 지도 CLIENT_ID가 설정되지 않았습니다."
        );
        assert_eq!(Violation::ConfigUndefined.field(), "CONFIG");
    }

    #[test]
    fn test_ordering_follows_check_order() {
        let mut found = vec![
            Violation::IncompleteNaverMap,
            Violation::MissingClientId,
            Violation::IncompleteSupabase,
        ];
        found.sort();
        assert_eq!(
            found,
            vec![
                Violation::MissingClientId,
                Violation::IncompleteSupabase,
                Violation::IncompleteNaverMap,
            ]
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Violation::MissingClientSecret).unwrap();
        assert_eq!(json, "\"missing_client_secret\"");
    }
}
