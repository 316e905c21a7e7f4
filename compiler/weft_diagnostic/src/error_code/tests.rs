use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2003.as_str(), "E2003");
    assert_eq!(ErrorCode::W2002.as_str(), "W2002");
}

#[test]
fn test_prefix_matches_class() {
    for code in ErrorCode::ALL {
        let s = code.as_str();
        assert_eq!(code.is_warning(), s.starts_with('W'), "{s}");
        assert_eq!(code.is_internal_error(), s.starts_with("E9"), "{s}");
    }
}

#[test]
fn test_codes_are_unique() {
    let mut seen: Vec<&str> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), ErrorCode::ALL.len());
}
