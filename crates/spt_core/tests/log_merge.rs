use std::sync::Arc;
use std::thread;

use spt_core::{LogAggregator, LogOrigin, LogSettings, REMOTE_LOG_CAPACITY};

fn texts(log: &LogAggregator) -> Vec<String> {
    log.snapshot().into_iter().map(|entry| entry.text).collect()
}

#[test]
fn entries_interleave_in_arrival_order() {
    let log = LogAggregator::default();
    log.append_local("L1");
    log.on_remote("R1");
    log.append_local("L2");

    let snapshot = log.snapshot();
    let view: Vec<_> = snapshot
        .iter()
        .map(|entry| (entry.text.as_str(), entry.origin))
        .collect();
    assert_eq!(
        view,
        vec![
            ("L1", LogOrigin::Local),
            ("R1", LogOrigin::Remote),
            ("L2", LogOrigin::Local),
        ]
    );
    assert!(snapshot.windows(2).all(|w| w[0].sequence < w[1].sequence));
}

#[test]
fn remote_tail_is_capped_at_capacity() {
    let log = LogAggregator::default();
    for i in 0..250 {
        log.on_remote(format!("r{i}"));
    }
    let view = texts(&log);
    assert_eq!(view.len(), REMOTE_LOG_CAPACITY);
    assert_eq!(view.first().map(String::as_str), Some("r50"));
    assert_eq!(view.last().map(String::as_str), Some("r249"));
}

#[test]
fn local_entries_are_never_capped() {
    let log = LogAggregator::default();
    for i in 0..250 {
        log.append_local(format!("Sent: {i}"));
    }
    assert_eq!(texts(&log).len(), 250);
}

#[test]
fn eviction_only_touches_remote_entries() {
    let log = LogAggregator::new(LogSettings { remote_capacity: 2 });
    log.append_local("L1");
    log.on_remote("R1");
    log.on_remote("R2");
    log.append_local("L2");
    log.on_remote("R3");

    assert_eq!(texts(&log), vec!["L1", "R2", "L2", "R3"]);
}

#[test]
fn identical_payloads_are_distinct_arrivals() {
    let log = LogAggregator::default();
    log.on_remote("tick");
    log.on_remote("tick");
    let snapshot = log.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_ne!(snapshot[0].sequence, snapshot[1].sequence);
}

#[test]
fn clear_drops_local_entries_and_keeps_remote() {
    let log = LogAggregator::default();
    log.append_local("Sent: START:P1,10000,1");
    log.on_remote("stage 1 running");
    log.append_local("Sent: START:P2,10000,1");

    log.clear();

    assert_eq!(texts(&log), vec!["stage 1 running"]);
    log.append_local("after clear");
    assert_eq!(texts(&log), vec!["stage 1 running", "after clear"]);
}

#[test]
fn concurrent_appends_get_unique_ordered_sequences() {
    let log = Arc::new(LogAggregator::default());
    let remote = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..100 {
                log.on_remote(format!("r{i}"));
            }
        })
    };
    for i in 0..100 {
        log.append_local(format!("l{i}"));
    }
    remote.join().unwrap();

    let snapshot = log.snapshot();
    assert_eq!(snapshot.len(), 200);
    assert_eq!(log.last_sequence(), 200);
    assert!(snapshot.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let locals: Vec<_> = snapshot
        .iter()
        .filter(|entry| entry.origin == LogOrigin::Local)
        .map(|entry| entry.text.clone())
        .collect();
    let expected: Vec<_> = (0..100).map(|i| format!("l{i}")).collect();
    assert_eq!(locals, expected);
}
