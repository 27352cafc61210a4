use super::*;
use proptest::prelude::*;

/// Ticks the table `ticks` times and returns which ticks fired.
fn firings(table: &mut TickerTable, ticks: usize) -> Vec<usize> {
    (1..=ticks).filter(|_| !table.tick().is_empty()).collect()
}

#[test]
fn test_delay_then_period() {
    let mut t = TickerTable::new();
    t.configure(0, 3, 2, 2, "-print hi").unwrap();
    assert_eq!(firings(&mut t, 20), vec![3, 5]);
    let ticker = t.get(0).unwrap();
    assert!(!ticker.active);
    assert_eq!(ticker.count, 0);
}

#[test]
fn test_forever() {
    let mut t = TickerTable::new();
    t.configure(1, 1, 1, -1, "-print hi").unwrap();
    assert_eq!(firings(&mut t, 10), (1..=10).collect::<Vec<_>>());
    assert!(t.get(1).unwrap().active);
    assert_eq!(t.get(1).unwrap().count, -1);
}

#[test]
fn test_zero_delay_fires_on_first_tick() {
    let mut t = TickerTable::new();
    t.configure(0, 0, 5, 1, "-print hi").unwrap();
    assert_eq!(firings(&mut t, 10), vec![1]);
}

#[test]
fn test_zero_count_stays_inactive() {
    let mut t = TickerTable::new();
    t.configure(2, 1, 1, 0, "-print hi").unwrap();
    assert!(!t.get(2).unwrap().active);
    assert!(firings(&mut t, 10).is_empty());
}

#[test]
fn test_fired_payload_and_index() {
    let mut t = TickerTable::new();
    t.configure(4, 1, 1, 1, "-print four").unwrap();
    t.configure(9, 1, 1, 1, "-print nine").unwrap();
    assert_eq!(
        t.tick(),
        vec![(4, "-print four".to_string()), (9, "-print nine".to_string())]
    );
}

#[test]
fn test_invalid_index() {
    let mut t = TickerTable::new();
    assert_eq!(
        t.configure(16, 1, 1, 1, "x").unwrap_err().code(),
        ErrorCode::InvalidTickerIndex
    );
}

#[test]
fn test_pause_resume_clear() {
    let mut t = TickerTable::new();
    t.configure(0, 2, 2, -1, "-print a").unwrap();
    t.configure(1, 5, 0, 1, "-print b").unwrap();
    t.tick();
    t.pause_all();
    assert_eq!(t.active_count(), 0);
    assert!(firings(&mut t, 5).is_empty());
    t.resume_all();
    assert_eq!(t.active_count(), 1);
    assert_eq!(firings(&mut t, 3), vec![1, 3]);
    assert_eq!(t.get(1).unwrap().payload, "-print b");
    t.clear_all();
    assert_eq!(t.active_count(), 0);
    assert_eq!(*t.get(0).unwrap(), Ticker::default());
}

#[test]
fn test_ticker_command() {
    let r = Runtime::default();
    r.enter("-ticker 0 2 3 1 -print tick").unwrap();
    assert_eq!(
        run(&r),
        "Ticker 0 set with delay 2, period 3, count 1, payload: -print tick\n"
    );
    r.tick();
    assert_eq!(run(&r), "");
    r.tick();
    assert_eq!(run(&r), "tick\n");
    r.tick();
    r.tick();
    r.tick();
    assert_eq!(run(&r), "");
}

#[test]
fn test_ticker_bulk_tokens() {
    let r = Runtime::default();
    r.enter("-ticker 3 1 1 -1 -print x").unwrap();
    r.enter("-ticker P").unwrap();
    run(&r);
    assert_eq!(r.tickers().active_count(), 0);
    r.enter("-ticker r").unwrap();
    assert_eq!(run(&r), "All tickers resumed.\n");
    assert_eq!(r.tickers().active_count(), 1);
    r.enter("-ticker c").unwrap();
    assert_eq!(run(&r), "All tickers cleared.\n");
    assert_eq!(*r.tickers().get(3).unwrap(), Ticker::default());
}

#[test]
fn test_ticker_command_errors() {
    let r = Runtime::default();
    r.enter("-ticker 16 1 1 1 -print x").unwrap();
    r.enter("-ticker z 1 1 1 -print x").unwrap();
    r.enter("-ticker 0").unwrap();
    r.enter("-ticker 0 1").unwrap();
    r.enter("-ticker 0 1 1").unwrap();
    r.enter("-ticker 0 1 1 1").unwrap();
    r.enter("-ticker 0 one 1 1 -print x").unwrap();
    assert_eq!(
        run(&r),
        "Error: Invalid ticker index.\n\
         Error: Invalid ticker index.\n\
         Error: Missing initial delay parameter.\n\
         Error: Missing period parameter.\n\
         Error: Missing count parameter.\n\
         Error: Missing payload.\n\
         Error: Invalid numeric parameter.\n"
    );
    assert_eq!(r.errors().get(ErrorCode::InvalidTickerIndex), 2);
    assert_eq!(r.errors().get(ErrorCode::MissingPayload), 1);
    assert_eq!(r.tickers().active_count(), 0);
}

proptest! {
    #[test]
    fn prop_schedule(delay in 1u32..20, period in 1u32..20, count in 1i32..6) {
        let mut t = TickerTable::new();
        t.configure(7, delay, period, count, "-rem").unwrap();
        let horizon = (delay + period * count as u32 + 5) as usize;
        let expected: Vec<usize> = (0..count as u32)
            .map(|k| (delay + k * period) as usize)
            .collect();
        prop_assert_eq!(firings(&mut t, horizon), expected);
        prop_assert!(!t.get(7).unwrap().active);
    }
}
