//! Unit tests for LineBufferedSink

#![cfg(test)]


use std::{
    fmt::Write,
    sync::{Mutex, Once},
};

use log::{Level, LevelFilter, Log, Metadata, Record};

use shurup::{
    FailurePolicy, LineBufferedSink, LogLineLogger, RunnerSettings, TestRegistry, TestRunner,
};
use test_helpers::{passing_case, recording_sink, texts};

#[test]
fn test_lines_are_forwarded_on_newline_and_drop() {
    let (mut sink, lines) = recording_sink("shurup");

    write!(sink, "abc\ndef").unwrap();
    assert_eq!(texts(&lines), ["abc"]);
    assert_eq!(sink.buffered(), "def");

    drop(sink);
    assert_eq!(texts(&lines), ["abc", "def"]);
}

#[test]
fn test_crlf_alone_forwards_nothing() {
    let (mut sink, lines) = recording_sink("shurup");

    sink.write_str("\r\n").unwrap();
    drop(sink);

    assert!(lines.borrow().is_empty());
}

#[test]
fn test_carriage_returns_are_stripped() {
    let (mut sink, lines) = recording_sink("shurup");

    sink.write_str("one\r\ntw\ro\r\n").unwrap();

    assert_eq!(texts(&lines), ["one", "two"]);
    assert!(sink.buffered().is_empty());
}

#[test]
fn test_empty_lines_are_suppressed() {
    let (mut sink, lines) = recording_sink("shurup");

    sink.write_str("\n\nfirst\n\n\nsecond\n").unwrap();

    assert_eq!(texts(&lines), ["first", "second"]);
}

#[test]
fn test_tag_is_passed_with_every_line() {
    let (mut sink, lines) = recording_sink("ShurupTests");

    sink.put_char('x');
    sink.put_char('\n');
    sink.write_char('y').unwrap();
    sink.flush();

    assert_eq!(sink.tag(), "ShurupTests");
    assert_eq!(
        *lines.borrow(),
        [
            ("ShurupTests".to_string(), "x".to_string()),
            ("ShurupTests".to_string(), "y".to_string()),
        ]
    );
}

#[test]
fn test_flush_then_drop_forwards_once() {
    let (mut sink, lines) = recording_sink("shurup");

    sink.write_str("partial").unwrap();
    sink.flush();
    drop(sink);

    assert_eq!(texts(&lines), ["partial"]);
}

#[test]
fn test_runner_output_through_sink() {
    let (sink, lines) = recording_sink("shurup");
    let mut registry = TestRegistry::new();
    registry.group("Sink").case("first", passing_case);
    registry.group("Skipped").case("second", passing_case);

    let mut settings = RunnerSettings::new();
    settings.parse_arguments(["-shurup_skip", "Skipped"]);
    let mut runner = TestRunner::new(&settings, sink).with_policy(FailurePolicy::Stop);
    assert!(runner.run(&registry).is_success());
    drop(runner);

    assert_eq!(
        texts(&lines),
        [
            "Sink:",
            "  Testing first: Ok",
            "Skipped:",
            "   Testing second: SKIPPED",
        ]
    );
}

/// Records every `log` record whose target starts with `capture-`.
struct CapturingLogger {
    records: Mutex<Vec<(String, Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("capture-")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records.lock().unwrap().push((
                record.target().to_string(),
                record.level(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

fn captured(target: &str) -> Vec<(Level, String)> {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(tag, ..)| tag == target)
        .map(|(_, level, text)| (*level, text.clone()))
        .collect()
}

#[test]
fn test_log_line_logger_emits_records() {
    captured("capture-default");
    let mut sink = LineBufferedSink::new("capture-default", LogLineLogger::default());

    sink.write_str("Group:\n\r\n  Testing case: Ok\n").unwrap();

    assert_eq!(
        captured("capture-default"),
        [
            (Level::Info, "Group:".to_string()),
            (Level::Info, "  Testing case: Ok".to_string()),
        ]
    );
}

#[test]
fn test_log_line_logger_uses_its_level() {
    captured("capture-warn");
    let mut sink = LineBufferedSink::new("capture-warn", LogLineLogger::new(Level::Warn));

    sink.write_str("left in the buffer").unwrap();
    assert!(captured("capture-warn").is_empty());
    drop(sink);

    assert_eq!(
        captured("capture-warn"),
        [(Level::Warn, "left in the buffer".to_string())]
    );
}
