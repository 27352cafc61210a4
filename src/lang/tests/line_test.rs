use super::*;

#[test]
fn test_keyword_is_case_folded() {
    let line = Line::new("-PRINT Hello World").unwrap();
    assert_eq!(line.keyword(), "-print");
}

#[test]
fn test_blank_line() {
    assert!(Line::new(" \t\r\n").is_none());
}

#[test]
fn test_tabs_and_crlf() {
    let mut line = Line::new("-gpio\t3  t\r\n").unwrap();
    let args = line.args();
    assert_eq!(args.next(), Some("3"));
    assert_eq!(args.next(), Some("t"));
    assert_eq!(args.next(), None);
}

#[test]
fn test_rest_keeps_inner_spacing() {
    let mut line = Line::new("-ticker 3 100 100 5 -gpio 2  t\r\n").unwrap();
    let args = line.args();
    assert_eq!(args.next(), Some("3"));
    assert_eq!(args.next(), Some("100"));
    assert_eq!(args.next(), Some("100"));
    assert_eq!(args.next(), Some("5"));
    assert_eq!(args.rest(), Some("-gpio 2  t"));
    assert_eq!(args.rest(), None);
}

#[test]
fn test_display() {
    let line = Line::new("-Reg  mov r0 #1").unwrap();
    assert_eq!(line.to_string(), "-reg mov r0 #1");
}

#[test]
fn test_clip() {
    assert_eq!(clip("abcdef", 3), "abc");
    assert_eq!(clip("ab", 3), "ab");
    assert_eq!(clip("añb", 2), "añ");
}
