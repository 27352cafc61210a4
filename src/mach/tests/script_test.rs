use super::*;

fn write(r: &Runtime, lines: &[(usize, &str)]) {
    let mut script = r.script();
    for (n, text) in lines {
        script.write_line(*n, text).unwrap();
    }
}

#[test]
fn test_runs_until_empty_line() {
    let r = Runtime::default();
    write(&r, &[(0, "-print a"), (1, "-print b"), (2, "-print c"), (4, "-print never")]);
    r.start_script(0).unwrap();
    assert_eq!(r.script().cursor(), Some(0));
    assert_eq!(run(&r), "a\nb\nc\n");
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_script_commands() {
    let r = Runtime::default();
    r.enter("-script 0 w -print a").unwrap();
    r.enter("-script 1 W -print b").unwrap();
    r.enter("-script 1").unwrap();
    r.enter("-script 2").unwrap();
    assert_eq!(
        run(&r),
        "Script line 0 set to: -print a\n\
         Script line 1 set to: -print b\n\
         | 1    | -print b\n\
         | 2    | Empty\n"
    );
    r.enter("-script 0 x").unwrap();
    assert_eq!(run(&r), "a\nb\n");
    r.enter("-script 1 c").unwrap();
    r.enter("-script 0 x").unwrap();
    assert_eq!(run(&r), "Script line 1 cleared.\na\n");
}

#[test]
fn test_script_errors() {
    let r = Runtime::default();
    r.enter("-script 5 x").unwrap();
    r.enter("-script 64 w -print x").unwrap();
    r.enter("-script -1").unwrap();
    r.enter("-script 0 q").unwrap();
    r.enter("-script 0 w").unwrap();
    assert_eq!(
        run(&r),
        "Error: Script line is empty.\n\
         Error: Invalid script line number.\n\
         Error: Invalid script line number.\n\
         Error: Unknown operation for script command.\n\
         Error: Missing command to write to script line.\n"
    );
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_user_payloads_do_not_advance() {
    let r = Runtime::default();
    write(&r, &[(0, "-print a"), (1, "-print b")]);
    r.start_script(0).unwrap();
    r.enter("-print user").unwrap();
    assert_eq!(run(&r), "a\nuser\nb\n");
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_redirect_overrides_advance() {
    let r = Runtime::default();
    write(
        &r,
        &[
            (0, "-print a"),
            (1, "-script 5 x"),
            (2, "-print skipped"),
            (5, "-print five"),
        ],
    );
    r.start_script(0).unwrap();
    assert_eq!(run(&r), "a\nfive\n");
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_reset_from_script() {
    let r = Runtime::default();
    write(&r, &[(0, "-script r"), (1, "-print b")]);
    r.start_script(0).unwrap();
    assert_eq!(run(&r), "Script reset.\n");
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_loop_runs_once_per_pass() {
    let r = Runtime::default();
    write(&r, &[(0, "-reg inc r0"), (1, "-script 0 x")]);
    r.start_script(0).unwrap();
    assert_eq!(r.execute_pending(10), 10);
    assert_eq!(r.registers().fetch(0), 5);
    assert_eq!(r.payloads().len(), 1);
}

#[test]
fn test_if_branches() {
    let r = Runtime::default();
    r.registers().store(0, 10);
    r.enter("-if (r0 > r1) ? -print YES : -print NO").unwrap();
    r.enter("-if (r0 < r1) ? -print YES : -print NO").unwrap();
    r.enter("-if (r0 == #10) ? : -print NO").unwrap();
    r.enter("-if (r0 = #10) ? -reg inc r1 :").unwrap();
    assert_eq!(run(&r), "YES\nNO\nR1 = 1\n");
    assert!(r.payloads().is_empty());
}

#[test]
fn test_if_from_script_jumps() {
    let r = Runtime::default();
    write(
        &r,
        &[
            (0, "-reg inc r0"),
            (1, "-if (r0 < #3) ? -script 0 x : -print done"),
        ],
    );
    r.start_script(0).unwrap();
    assert_eq!(run(&r), "R0 = 1\nR0 = 2\nR0 = 3\ndone\n");
    assert_eq!(r.script().cursor(), None);
}

#[test]
fn test_if_errors() {
    let r = Runtime::default();
    r.enter("-if (r0 > r1) -print YES : -print NO").unwrap();
    r.enter("-if (r0 > r1) ? -print YES").unwrap();
    r.enter("-if (r0 >= r1) ? -print YES : -print NO").unwrap();
    r.enter("-if (r0 > @x20000000) ? -print YES : -print NO").unwrap();
    r.enter("-if").unwrap();
    run(&r);
    assert_eq!(r.errors().get(ErrorCode::InvalidConditionSyntax), 2);
    assert_eq!(r.errors().get(ErrorCode::MissingConditionDestination), 1);
    assert_eq!(r.errors().get(ErrorCode::InvalidConditionOperator), 1);
    assert_eq!(r.errors().get(ErrorCode::InvalidOperand), 1);
}
