use super::*;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

#[test]
fn test_capacity() {
    let q: Queue<u32> = Queue::new(3, ErrorCode::PayloadQueueOverflow);
    for i in 0..3 {
        q.push(i).unwrap();
    }
    assert_eq!(
        q.push(3).unwrap_err().code(),
        ErrorCode::PayloadQueueOverflow
    );
    assert_eq!(q.len(), 3);
    assert_eq!(q.pending_signals(), 3);
    assert_eq!(q.try_pop(), Some(0));
    assert_eq!(q.drain(), vec![1, 2]);
    assert_eq!(q.pending_signals(), 0);
    assert_eq!(q.try_pop(), None);
}

#[test]
fn test_payload_queue_overflow_is_reported() {
    let r = Runtime::default();
    for i in 0..500 {
        r.enter(&format!("-print {}", i)).unwrap();
    }
    assert_eq!(
        r.enter("-print one too many").unwrap_err().code(),
        ErrorCode::PayloadQueueOverflow
    );
    assert_eq!(r.payloads().len(), 500);
    assert_eq!(r.errors().get(ErrorCode::PayloadQueueOverflow), 1);
    let out = render(&r);
    assert_eq!(out, "Error: Payload Queue Overflow.\n");
}

#[test]
fn test_output_overflow_is_only_counted() {
    let r = Runtime::new(Config {
        output_capacity: 2,
        ..Config::default()
    });
    for i in 0..4 {
        r.print(format!("{}", i));
    }
    assert_eq!(r.output().len(), 2);
    assert_eq!(r.errors().get(ErrorCode::OutputQueueOverflow), 2);
}

#[test]
fn test_payloads_are_clipped() {
    let long = format!("-print {}", "x".repeat(200));
    let payload = Payload::new(&long, Origin::Input);
    assert_eq!(payload.text.len(), MAX_LINE_LEN);
}

#[test]
fn test_producers_keep_their_order() {
    let q = Arc::new(Queue::new(10_000, ErrorCode::PayloadQueueOverflow));
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let q = q.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    q.push((p, i)).unwrap();
                }
            })
        })
        .collect();
    let mut seen = Vec::new();
    while seen.len() < 2000 {
        q.wait();
        if let Some(item) = q.take() {
            seen.push(item);
        }
    }
    for producer in producers {
        producer.join().unwrap();
    }
    for p in 0..4 {
        let order: Vec<i32> = seen.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
        assert_eq!(order, (0..500).collect::<Vec<_>>());
    }
}

proptest! {
    #[test]
    fn prop_fifo_against_model(ops in proptest::collection::vec(any::<Option<u8>>(), 0..200)) {
        let q = Queue::new(8, ErrorCode::PayloadQueueOverflow);
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Some(v) => {
                    let accepted = q.push(v).is_ok();
                    prop_assert_eq!(accepted, model.len() < 8);
                    if accepted {
                        model.push_back(v);
                    }
                }
                None => prop_assert_eq!(q.try_pop(), model.pop_front()),
            }
            prop_assert_eq!(q.len(), model.len());
            prop_assert_eq!(q.pending_signals(), model.len());
        }
    }
}

#[test]
fn test_wake_without_item() {
    let q: Arc<Queue<u32>> = Arc::new(Queue::new(2, ErrorCode::EventQueueOverflow));
    let waiter = {
        let q = q.clone();
        thread::spawn(move || {
            q.wait();
            q.take()
        })
    };
    q.wake();
    assert_eq!(waiter.join().unwrap(), None);
    assert_eq!(q.pending_signals(), 0);
    q.push(1).unwrap();
    q.push(2).unwrap();
    assert!(q.push(3).is_err());
    q.wait();
    assert_eq!(q.take(), Some(1));
    assert_eq!(q.len(), 1);
}
