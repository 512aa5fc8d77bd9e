use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};
use veneer::log::{
    BuildMode, CallSite, CallbackSink, LevelMask, LogLevel, LogRecord, Logger, MemorySink,
    SinkError, log_record::TIMESTAMP_FORMAT,
};

fn site() -> CallSite {
    CallSite::new("Foo.swift", "bar()", 42)
}

fn quiet_logger(mask: LevelMask) -> Logger {
    let logger = Logger::new(mask, BuildMode::Debug);
    logger.set_fallback(None);
    logger
}

#[test]
fn levels_outside_the_mask_have_no_side_effects() {
    for mask_level in LogLevel::ALL {
        let logger = quiet_logger(mask_level.bit());
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        logger.add_sink(CallbackSink::infallible(move |_| *counter.lock().unwrap() += 1));

        for level in LogLevel::ALL {
            logger.log(level, "%s", &["x".into()], site());
        }

        assert_eq!(*calls.lock().unwrap(), 1, "mask {mask_level} admitted the wrong count");
    }
}

#[test]
fn rendered_message_matches_the_documented_format() {
    let logger = quiet_logger(LevelMask::ALL);
    let mem = Arc::new(MemorySink::new());
    logger.add_shared_sink(mem.clone());

    logger.info("%d items", &[3.into()], site());

    let message = mem.messages().remove(0);
    assert!(message.ends_with("Foo.42: bar() 3 items"), "got {message}");
    let stamp = &message[..21];
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).expect("timestamp prefix");
}

#[test]
fn registration_order_is_delivery_order() {
    let logger = quiet_logger(LevelMask::ALL);
    let order: Arc<Mutex<Vec<(char, String)>>> = Arc::new(Mutex::new(Vec::new()));

    for tag in ['A', 'B'] {
        let order = Arc::clone(&order);
        logger.add_sink(CallbackSink::infallible(move |r: &LogRecord| {
            order.lock().unwrap().push((tag, r.message.clone()));
        }));
    }

    logger.warn("first", &[], site());
    logger.error("second", &[], site());

    let order = order.lock().unwrap();
    let tags: Vec<char> = order.iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec!['A', 'B', 'A', 'B']);
    assert_eq!(order[0].1, order[1].1);
    assert!(order[2].1.ends_with("second"));
}

#[test]
fn mask_toggling_enables_then_suppresses() {
    let logger = quiet_logger(LevelMask::ERROR);
    let mem = Arc::new(MemorySink::new());
    logger.add_shared_sink(mem.clone());

    let chatter = |logger: &Logger| {
        logger.debug("d", &[], site());
        logger.info("i", &[], site());
        logger.trace("t", &[], site());
    };

    chatter(&logger);
    assert!(mem.is_empty());

    logger.set_level(LevelMask::ALL);
    chatter(&logger);
    assert_eq!(mem.take().len(), 3);

    logger.set_level(LevelMask::ERROR);
    chatter(&logger);
    assert!(mem.is_empty());
}

#[test]
fn failing_sink_does_not_starve_later_sinks() {
    let logger = quiet_logger(LevelMask::ALL);
    logger.add_sink(CallbackSink::new(|_| {
        Err(SinkError::Io(std::io::Error::other("disk gone")))
    }));
    let mem = Arc::new(MemorySink::new());
    logger.add_shared_sink(mem.clone());

    logger.error("%s", &["important".into()], site());

    assert_eq!(mem.len(), 1);
    assert_eq!(logger.failure_count(), 1);
}

#[test]
fn release_builds_drop_debug_and_trace() {
    let logger = Logger::new(LevelMask::ALL, BuildMode::Release);
    logger.set_fallback(None);
    let mem = Arc::new(MemorySink::new());
    logger.add_shared_sink(mem.clone());

    logger.debug("d", &[], site());
    logger.trace("t", &[], site());
    logger.warn("w", &[], site());

    let levels: Vec<LogLevel> = mem.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![LogLevel::Warn]);
}
