use super::*;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

const NOTICES: &str = "Emergency stop completed.\n\
                       Timer, callbacks, tickers, and payloads have been cleared.\n\
                       Resuming normal operation.\n";

fn wait_for<F: FnMut() -> bool>(mut condition: F) -> bool {
    for _ in 0..500 {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

fn assert_cleared(r: &Runtime) {
    assert_eq!(r.tickers().active_count(), 0);
    assert!(r.callbacks().iter().all(|cb| cb.count == 0 && cb.payload.is_empty()));
    assert!(r.payloads().is_empty());
    assert_eq!(r.script().cursor(), None);
    assert_eq!(r.timer().period(), 0);
    assert_eq!(r.stop().state(), StopState::Normal);
}

#[test]
fn test_stop_clears_everything() {
    let r = Runtime::default();
    r.enter("-ticker 0 1 1 -1 -print a").unwrap();
    r.enter("-ticker 1 5 5 3 -print b").unwrap();
    r.enter("-callback 0 -1 -print t").unwrap();
    r.enter("-timer 1000").unwrap();
    r.execute_pending(10);
    r.script().write_line(0, "-print s").unwrap();
    r.start_script(0).unwrap();
    r.enter("-print pending").unwrap();
    assert_eq!(r.tickers().active_count(), 2);

    let report = r.emergency_stop();
    assert_eq!(report.rendezvoused, 0);
    assert_eq!(report.payloads_dropped, 2);
    assert_eq!(report.messages_dropped, 4);
    assert_cleared(&r);
    assert_eq!(render(&r), NOTICES);
    assert!(r.is_idle());
}

#[test]
fn test_nothing_fires_after_stop() {
    let r = Runtime::default();
    r.enter("-ticker 0 1 1 -1 -print a").unwrap();
    r.enter("-callback 1 -1 -print b").unwrap();
    r.execute_pending(10);
    r.raise(EventSource::SwitchA);
    r.emergency_stop();
    r.drain_output();
    r.tick();
    r.fire_callback(1);
    assert!(r.events().is_empty());
    assert_eq!(run(&r), "");
}

#[test]
fn test_workers_rendezvous() {
    let mut config = Config::default();
    config.tick = Duration::from_millis(1);
    let r = Arc::new(Runtime::new(config));
    let (tx, rx) = mpsc::channel();
    let workers = Workers::spawn(r.clone(), tx).unwrap();
    assert_eq!(r.stop().workers(), 4);

    r.enter("-ticker 0 1 1 -1 -print a").unwrap();
    r.enter("-ticker 1 2 2 -1 -print b").unwrap();
    r.enter("-callback 0 -1 -print t").unwrap();
    r.enter("-timer 1000").unwrap();
    assert!(wait_for(|| r.tickers().active_count() == 2 && r.timer().period() == 1000));

    let first = r.emergency_stop();
    assert_eq!(first.rendezvoused, 4);
    assert_cleared(&r);
    let second = r.emergency_stop();
    assert_eq!(second.rendezvoused, 4);
    assert_cleared(&r);

    r.enter("-print after").unwrap();
    assert!(wait_for(|| r.is_idle()));
    workers.shutdown();
    assert_eq!(r.stop().workers(), 0);

    let texts: Vec<String> = rx.try_iter().map(|m| m.text).collect();
    assert_eq!(texts.last().map(String::as_str), Some("after"));
    assert_eq!(
        texts.iter().filter(|t| *t == "Emergency stop completed.").count(),
        2
    );
}

#[test]
fn test_shutdown_flushes_output() {
    let r = Arc::new(Runtime::default());
    let (tx, rx) = mpsc::channel();
    let workers = Workers::spawn(r.clone(), tx).unwrap();
    for i in 0..20 {
        r.enter(&format!("-print {}", i)).unwrap();
    }
    assert!(wait_for(|| r.is_idle()));
    workers.shutdown();
    let texts: Vec<String> = rx.try_iter().map(|m| m.text).collect();
    assert_eq!(texts, (0..20).map(|i| i.to_string()).collect::<Vec<_>>());
}

#[test]
fn test_dropped_workers_are_stopped() {
    let r = Arc::new(Runtime::default());
    let (tx, _rx) = mpsc::channel();
    let workers = Workers::spawn(r.clone(), tx).unwrap();
    assert_eq!(r.stop().workers(), 4);
    drop(workers);
    assert!(r.is_shutting_down());
    assert_eq!(r.stop().workers(), 0);
}

#[test]
fn test_uart_listener_queues_lines() {
    let board = Arc::new(SimBoard::new(0));
    let mut config = Config::default();
    config.tick = Duration::from_millis(1);
    let r = Arc::new(Runtime::with_board(config, board.clone()));
    let (tx, rx) = mpsc::channel();
    let workers = Workers::spawn(r.clone(), tx).unwrap();
    board.uart_receive(b"-print remote\n");
    let mut texts: Vec<String> = Vec::new();
    assert!(wait_for(|| {
        texts.extend(rx.try_iter().map(|m| m.text));
        texts.iter().any(|t| t == "remote")
    }));
    workers.shutdown();
    assert!(texts.contains(&"Received Over UART1: -print remote".to_string()));
}
