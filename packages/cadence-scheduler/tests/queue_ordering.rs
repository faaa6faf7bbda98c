use cadence_scheduler::EventQueue;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_drain_preserves_push_order() {
    for n in [0usize, 1, 2, 17, 1000] {
        let queue = EventQueue::new();
        for i in 0..n {
            queue.push(i);
        }

        let mut seen = Vec::new();
        let handled = queue.drain_all(|event| seen.push(event));

        assert_eq!(handled, n);
        assert_eq!(seen, (0..n).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }
}

#[test]
fn test_idle_drain_is_a_no_op() {
    let queue: EventQueue<&str> = EventQueue::new();
    let mut calls = 0;

    let start = Instant::now();
    let handled = queue.drain_all(|_| calls += 1);

    assert_eq!(handled, 0);
    assert_eq!(calls, 0);
    assert!(start.elapsed() < Duration::from_millis(50));
}

#[test]
fn test_capped_drain_leaves_the_rest_queued() {
    let queue = EventQueue::new();
    for i in 0..250 {
        queue.push(i);
    }

    let mut seen = Vec::new();
    assert_eq!(queue.drain_at_most(100, |event| seen.push(event)), 100);
    assert_eq!(queue.len(), 150);
    assert_eq!(queue.drain_at_most(100, |event| seen.push(event)), 100);
    assert_eq!(queue.drain_at_most(100, |event| seen.push(event)), 50);
    assert_eq!(queue.drain_at_most(100, |event| seen.push(event)), 0);

    assert_eq!(seen, (0..250).collect::<Vec<_>>());
}

#[test]
fn test_producer_thread_order_survives_interleaved_drains() {
    let queue = EventQueue::new();
    let sink = queue.sink();

    let producer = thread::spawn(move || {
        for i in 0..10_000u32 {
            sink.push(i);
        }
    });

    let mut seen = Vec::with_capacity(10_000);
    while seen.len() < 10_000 {
        queue.drain_all(|event| seen.push(event));
        thread::yield_now();
    }
    producer.join().unwrap();

    assert_eq!(seen, (0..10_000).collect::<Vec<_>>());
    assert!(queue.try_pop().is_none());
}

#[test]
fn test_sink_listener_feeds_queue() {
    let queue = EventQueue::new();
    let listener = queue.sink().into_listener();

    listener("a");
    listener("b");

    assert_eq!(queue.try_pop(), Some("a"));
    assert_eq!(queue.try_pop(), Some("b"));
    assert_eq!(queue.try_pop(), None);
}
