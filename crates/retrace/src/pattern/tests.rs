use rstest::rstest;

use super::*;

#[rstest]
#[case("", PatternFlags::default())]
#[case("g", PatternFlags::default())]
#[case("gy", PatternFlags::default())]
#[case("i", PatternFlags { case_insensitive: true, ..PatternFlags::default() })]
#[case("msx", PatternFlags {
    multi_line: true,
    dot_matches_new_line: true,
    ignore_whitespace: true,
    ..PatternFlags::default()
})]
#[case("RUu", PatternFlags { crlf: true, swap_greed: true, ..PatternFlags::default() })]
fn parses_flag_letters(#[case] letters: &str, #[case] expected: PatternFlags) {
    assert_eq!(letters.parse::<PatternFlags>().unwrap(), expected);
}

#[test]
fn rejects_unknown_and_duplicate_flags() {
    assert!(matches!(
        "iq".parse::<PatternFlags>(),
        Err(PatternError::UnknownFlag('q'))
    ));
    assert!(matches!(
        "ii".parse::<PatternFlags>(),
        Err(PatternError::DuplicateFlag('i', _))
    ));
}

#[test]
fn invalid_expression_is_an_error() {
    let err = Pattern::new("(unclosed").unwrap_err();
    assert!(matches!(err, PatternError::Build(_)));
}

#[test]
fn match_is_anchored_at_offset() {
    let digits = Pattern::new(r"\d+").unwrap();
    let text = "ab 123 456";
    // A forward search would find "123"; an anchored one must not.
    assert!(digits.match_at(text, 0).is_none());
    assert!(digits.match_at(text, 2).is_none());

    let m = digits.match_at(text, 3).unwrap();
    assert_eq!(m.as_str(), "123");
    assert_eq!(m.range(), 3..6);

    let m = digits.match_at(text, 4).unwrap();
    assert_eq!(m.as_str(), "23");
}

#[test]
fn captures_are_reported_in_text_offsets() {
    let kv = Pattern::new(r"(?<key>\w+)=(?<value>\w*)(;)?").unwrap();
    let text = "x; a=1 b=";
    let m = kv.match_at(text, 3).unwrap();
    assert_eq!(m.len(), 4);
    assert_eq!(kv.group_len(), 4);
    assert_eq!(m.get(0), Some("a=1"));
    assert_eq!(m.name("key"), Some("a"));
    assert_eq!(m.name("value"), Some("1"));
    assert_eq!(m.group_range(2), Some(5..6));
    assert_eq!(m.get(3), None);
    assert_eq!(m.name("missing"), None);

    let m = kv.match_at(text, 7).unwrap();
    assert_eq!(m.name("value"), Some(""));
    assert_eq!(m.end(), text.len());
}

#[test]
fn flags_are_applied() {
    let word = Pattern::with_flag_letters("fetch", "gi").unwrap();
    assert!(word.match_at("FETCH x", 0).is_some());
    assert!(word.flags().case_insensitive);
    assert_eq!(word.as_str(), "fetch");

    let line = Pattern::with_flag_letters(r"^b", "m").unwrap();
    assert!(line.match_at("a\nb", 2).is_some());
    let no_multi = Pattern::new(r"^b").unwrap();
    assert!(no_multi.match_at("a\nb", 2).is_none());
}

#[test]
fn assertions_see_text_before_offset() {
    let boundary = Pattern::new(r"\bx").unwrap();
    assert!(boundary.match_at("ax", 1).is_none());
    assert!(boundary.match_at("a x", 2).is_some());
}

#[rstest]
#[case(r"\s", ' ', true)]
#[case(r"\s", '\u{3000}', true)]
#[case(r"\s", 'a', false)]
#[case(r"[\p{L}\p{Nd}_$]", 'é', true)]
#[case(r"[\p{L}\p{Nd}_$]", '$', true)]
#[case(r"[\p{L}\p{Nd}_$]", '-', false)]
#[case(r"ab?", 'a', true)]
#[case(r"a.", 'a', false)]
fn matches_whole_unit(#[case] source: &str, #[case] ch: char, #[case] expected: bool) {
    assert_eq!(Pattern::new(source).unwrap().matches_unit(ch), expected);
}

#[test]
fn empty_match_at_end() {
    let maybe = Pattern::new(r"z*").unwrap();
    let m = maybe.match_at("abc", 3).unwrap();
    assert_eq!(m.as_str(), "");
    assert_eq!(m.range(), 3..3);
}
