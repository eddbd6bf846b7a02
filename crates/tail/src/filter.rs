//! grep 필터 -- 원시 페이로드 텍스트에 정규식을 적용합니다.
//!
//! 필터는 항상 디코딩 전의 원본 텍스트를 봅니다. 패턴은 렌더러 생성 시
//! 한 번만 컴파일되고, 패턴이 없으면 모든 엔트리가 통과합니다.

use regex::Regex;

use crate::error::TailError;

/// `text`가 `pattern`과 일치하는지 확인합니다.
pub fn matches(text: &str, pattern: &Regex) -> bool {
    pattern.is_match(text)
}

/// 컴파일된 grep 필터
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pattern: Option<Regex>,
}

impl Filter {
    /// 패턴을 컴파일합니다. `None`이거나 빈 문자열이면 모두 통과시키는 필터입니다.
    pub fn new(pattern: Option<&str>) -> Result<Self, TailError> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => Some(Regex::new(p)?),
            _ => None,
        };
        Ok(Self { pattern })
    }

    /// 패턴이 설정되어 있는지 확인합니다.
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// 원시 텍스트가 필터를 통과하는지 확인합니다.
    pub fn accepts(&self, text: &str) -> bool {
        match &self.pattern {
            Some(pattern) => matches(text, pattern),
            None => true,
        }
    }

    /// 텍스트에서 패턴과 일치하는 모든 부분을 반환합니다 (`grep -o`).
    ///
    /// 패턴이 없으면 빈 목록입니다.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.pattern {
            Some(pattern) => pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_pattern_accepts_everything() {
        let filter = Filter::new(None).unwrap();
        assert!(!filter.is_active());
        assert!(filter.accepts(""));
        assert!(filter.accepts("anything at all"));

        let filter = Filter::new(Some("")).unwrap();
        assert!(!filter.is_active());
    }

    #[test]
    fn pattern_applies_to_raw_text() {
        let filter = Filter::new(Some("ERROR")).unwrap();
        assert!(filter.accepts(r#"{"level":"ERROR","msg":"disk full"}"#));
        assert!(!filter.accepts(r#"{"level":"info","msg":"ok"}"#));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Filter::new(Some("(unclosed")).unwrap_err();
        assert!(matches!(err, TailError::Regex(_)));
    }

    #[test]
    fn find_all_returns_each_match() {
        let filter = Filter::new(Some(r"r-\d+")).unwrap();
        assert_eq!(filter.find_all("r-1 then r-22 then x"), vec!["r-1", "r-22"]);
        assert!(Filter::default().find_all("r-1").is_empty());
    }

    #[test]
    fn free_function_matches() {
        let re = Regex::new("^warn").unwrap();
        assert!(matches("warning", &re));
        assert!(!matches("a warning", &re));
    }

    proptest! {
        #[test]
        fn literal_pattern_matches_containing_text(
            prefix in "[a-z ]{0,16}",
            needle in "[A-Z]{1,8}",
            suffix in "[a-z ]{0,16}",
        ) {
            let filter = Filter::new(Some(&regex::escape(&needle))).unwrap();
            let text = format!("{prefix}{needle}{suffix}");
            prop_assert!(filter.accepts(&text));
            prop_assert!(filter.find_all(&text).contains(&needle.as_str()));
        }

        #[test]
        fn inactive_filter_accepts_any_text(text in ".*") {
            prop_assert!(Filter::new(None).unwrap().accepts(&text));
        }
    }
}
