//! End-to-end behavior of the logger core over local and custom backends.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cloud_logging::{
    fields, kv, Encoding, FieldValue, Level, LocalConfig, Logger, LoggingError, Options,
    RemoteConfig,
};
use common::{Capture, CountingBackend, JournalBackend, MockTransport};

#[test]
fn test_with_additional_fields_merges_without_mutating_parent() {
    let root = Logger::must_new(
        Options::new()
            .backend(Arc::new(CountingBackend::default()))
            .common_fields(fields! { "key1" => "value1", "key2" => false }),
    );

    let child = root.with_additional_fields(fields! { "key3" => 123 });
    assert_eq!(
        child.common_fields(),
        &fields! { "key1" => "value1", "key2" => false, "key3" => 123 }
    );

    let grandchild = child.with_additional_fields(kv!["key1", "new", "new_key", "x"]);
    assert_eq!(
        grandchild.common_fields(),
        &fields! { "key1" => "new", "key2" => false, "key3" => 123, "new_key" => "x" }
    );

    assert_eq!(
        child.common_fields(),
        &fields! { "key1" => "value1", "key2" => false, "key3" => 123 }
    );
    assert_eq!(
        root.common_fields(),
        &fields! { "key1" => "value1", "key2" => false }
    );
}

#[test]
fn test_level_gate_reaches_every_backend_exactly_once() {
    let a = Arc::new(CountingBackend::default());
    let b = Arc::new(CountingBackend::default());
    let fatal_calls = Arc::new(AtomicUsize::new(0));
    let counter = fatal_calls.clone();

    let logger = Logger::must_new(
        Options::new()
            .level(Level::Warning)
            .backend(a.clone())
            .backend(b.clone())
            .on_fatal(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    );

    logger.debug("d", ());
    logger.info("i", ());
    logger.infof(format_args!("i {}", 1));
    assert_eq!(a.emitted(), 0);
    assert_eq!(b.emitted(), 0);

    logger.warning("w", ());
    logger.error("e", ());
    logger.fatal("f", ());

    for backend in [&a, &b] {
        assert_eq!(backend.emitted(), 3);
        assert_eq!(
            *backend.levels.lock().unwrap(),
            vec![Level::Warning, Level::Error, Level::Fatal]
        );
    }
    assert_eq!(fatal_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_set_level_moves_the_gate() {
    let backend = Arc::new(CountingBackend::default());
    let mut logger = Logger::must_new(Options::new().level(Level::Error).backend(backend.clone()));

    logger.info("dropped", ());
    logger.set_level(Level::Debug);
    logger.info("kept", ());
    logger.debugf(format_args!("kept {}", 2));

    assert_eq!(logger.level(), Level::Debug);
    assert_eq!(backend.emitted(), 2);
}

#[test]
fn test_null_logger_accepts_everything() {
    let logger = Logger::null();
    assert!(logger.is_null());

    logger.trace("t", ());
    logger.debug("d", kv!["k", 1]);
    logger.info("i", fields! { "a" => "b" });
    logger.warning("w", ());
    logger.error("e", ());
    logger.fatal("f", ());
    logger.printf(format_args!("p {}", 1));
    logger.fatalf(format_args!("f {}", 2));

    let derived = logger.with_additional_fields(kv!["x", true]);
    assert!(derived.is_null());
    assert!(logger.flush().is_ok());
    assert!(logger.close().is_ok());
}

#[test]
fn test_empty_project_id_fails_construction() {
    let capture = Capture::default();
    let result = Logger::new(
        Options::new()
            .local_writer(capture.clone(), Capture::default())
            .remote(RemoteConfig::new("", "app")),
    );

    assert!(matches!(result, Err(LoggingError::MissingProjectId)));
    assert!(capture.contents().is_empty());
}

#[test]
#[should_panic]
fn test_odd_fields_panic_on_log_call() {
    let logger = Logger::must_new(Options::new().backend(Arc::new(CountingBackend::default())));
    logger.info("msg", kv!["dangling"]);
}

#[test]
#[should_panic]
fn test_odd_fields_panic_even_below_level() {
    let logger = Logger::must_new(Options::new().level(Level::Error));
    logger.debug("msg", kv!["a", 1, "b"]);
}

#[test]
#[should_panic]
fn test_odd_fields_panic_on_derive() {
    Logger::null().with_additional_fields(kv!["a", 1, "b"]);
}

#[test]
fn test_try_with_additional_fields_reports_odd_count() {
    let err = Logger::null()
        .try_with_additional_fields(kv!["a", 1, "b"])
        .unwrap_err();
    assert!(matches!(err, LoggingError::OddFieldCount(3)));
}

#[test]
fn test_local_json_line_round_trip() {
    let out = Capture::default();
    let logger = Logger::must_new(
        Options::new()
            .local(LocalConfig::json())
            .local_writer(out.clone(), Capture::default()),
    );

    logger.info("msg", kv!["a", "b"]);
    logger.flush().unwrap();

    let lines = out.lines();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert!(value["timestamp"].is_string());
    assert_eq!(value["level"], "info");
    assert!(value["message"].as_str().unwrap().contains("msg"));
    assert_eq!(value["a"], "b");
}

#[test]
fn test_local_text_line_carries_common_and_call_fields() {
    let out = Capture::default();
    let logger = Logger::must_new(
        Options::new()
            .local(LocalConfig::text())
            .local_writer(out.clone(), Capture::default())
            .common_fields(kv!["service", "api"]),
    );

    logger
        .with_additional_fields(kv!["request", 7])
        .warning("slow request", kv!["elapsed_ms", 1500]);

    let lines = out.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" WARN slow request"));
    assert!(lines[0].contains("service=api"));
    assert!(lines[0].contains("request=7"));
    assert!(lines[0].contains("elapsed_ms=1500"));
}

#[test]
fn test_call_site_fields_win_on_collision() {
    let backend = Arc::new(CountingBackend::default());
    let logger = Logger::must_new(
        Options::new()
            .backend(backend.clone())
            .common_fields(fields! { "bool" => false, "int" => 123 }),
    );

    logger.info("msg", fields! { "bool" => true });

    let records = backend.records();
    assert_eq!(records[0].fields.get("bool"), Some(&FieldValue::Bool(true)));
    assert_eq!(records[0].fields.get("int"), Some(&FieldValue::Int(123)));
}

#[test]
fn test_fatal_flushes_backends_before_handler() {
    let backend = Arc::new(CountingBackend::default());
    let flushed_at_fatal = Arc::new(AtomicUsize::new(usize::MAX));
    let observed = flushed_at_fatal.clone();
    let probe = backend.clone();

    let logger = Logger::must_new(Options::new().backend(backend.clone()).on_fatal(move || {
        observed.store(probe.flushed.load(Ordering::SeqCst), Ordering::SeqCst);
    }));

    logger.fatalf(format_args!("giving up after {} attempts", 3));

    assert_eq!(backend.emitted(), 1);
    assert_eq!(flushed_at_fatal.load(Ordering::SeqCst), 1);
}

#[test]
fn test_local_file_output_and_unopenable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let path = path.to_str().unwrap();

    let logger = Logger::must_new(
        Options::new().local(LocalConfig::json().with_paths(&[path, "stderr"])),
    );
    logger.info("to file", ());
    logger.close().unwrap();

    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains("to file"));

    let missing = dir.path().join("no/such/dir/app.log");
    let err = Logger::new(
        Options::new().local(LocalConfig::text().with_paths(&[missing.to_str().unwrap()])),
    )
    .unwrap_err();
    assert!(matches!(err, LoggingError::OpenOutput { .. }));
}

#[test]
fn test_options_last_wins() {
    let logger = Logger::must_new(
        Options::new()
            .level(Level::Error)
            .local(LocalConfig::json())
            .level(Level::Info)
            .local(LocalConfig::text())
            .local_writer(Capture::default(), Capture::default()),
    );
    assert_eq!(logger.level(), Level::Info);
    assert_eq!(logger.backend_names(), vec!["local"]);
    assert_eq!(LocalConfig::text().encoding, Encoding::Text);
}

#[test]
fn test_derived_level_does_not_gate_parent_on_shared_local() {
    let out = Capture::default();
    let transport = Arc::new(MockTransport::default());
    let mut remote = RemoteConfig::new("test-project", "test-log");
    remote.flush_interval_ms = 60_000;

    let root = Logger::must_new(
        Options::new()
            .local(LocalConfig::text())
            .local_writer(out.clone(), Capture::default())
            .remote(remote)
            .transport(transport.clone()),
    );

    let mut child = root.with_additional_fields(kv!["req", 1]);
    child.set_level(Level::Error);
    assert_eq!(root.level(), Level::Debug);

    root.warning("root still logs", ());
    child.warning("child drops", ());
    root.close().unwrap();

    let lines = out.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("root still logs"));
    assert_eq!(transport.entries().len(), 1);
}

#[test]
fn test_fatal_with_self_exiting_backend_goes_last() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let counter = handler_calls.clone();

    let logger = Logger::must_new(
        Options::new()
            .backend(Arc::new(JournalBackend::new("exiting", true, journal.clone())))
            .backend(Arc::new(JournalBackend::new("plain", false, journal.clone())))
            .on_fatal(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    );

    logger.fatal("shutting down", ());

    assert_eq!(
        *journal.lock().unwrap(),
        vec!["plain:emit", "plain:flush", "exiting:emit"]
    );
    // The exiting backend terminates the process itself.
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
}
