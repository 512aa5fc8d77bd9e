use std::sync::Arc;
use veneer::log::{
    BuildMode, LevelMask, LogLevel, Logger, LoggerError, MemorySink, global, install_log_bridge,
};

// One test: the global instance and the `log` bridge are process-wide.
#[test]
fn global_instance_macros_and_log_bridge() {
    assert!(!global::is_initialized());

    let logger = Logger::new(LevelMask::IMPORTANT, BuildMode::Debug);
    logger.set_fallback(None);
    let mem = Arc::new(MemorySink::new());
    logger.add_shared_sink(mem.clone());

    let installed = global::init(logger).expect("first init succeeds");
    assert!(std::ptr::eq(installed, global::logger()));
    assert!(matches!(
        global::init(Logger::default()),
        Err(LoggerError::AlreadyInitialized)
    ));

    veneer::log_info!("filtered %d", 1);
    veneer::log_warn!("kept %d", 2);
    veneer::log_at!(LogLevel::Error, "also kept");
    assert_eq!(mem.len(), 2);
    assert!(mem.messages()[0].ends_with("kept 2"));
    assert!(
        mem.records()[0]
            .site
            .function
            .ends_with("global_instance_macros_and_log_bridge")
    );

    global::logger().set_level(LevelMask::ALL);
    veneer::log_debug!("now visible");
    assert_eq!(mem.len(), 3);
    mem.take();

    install_log_bridge(global::logger()).expect("bridge installs once");
    assert!(matches!(
        install_log_bridge(global::logger()),
        Err(LoggerError::BridgeAlreadyInstalled)
    ));

    log::error!("from the log crate: {}", 7);
    global::logger().set_level(LevelMask::ERROR);
    log::info!("suppressed by the mask");

    let records = mem.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Error);
    assert!(records[0].message.ends_with("from the log crate: 7"));
    assert!(records[0].message.contains("global_logger."));
}
