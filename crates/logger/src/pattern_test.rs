use super::*;
use chrono::{Local, TimeDelta, TimeZone};

use crate::field::{kv, kv_string};
use crate::level::Level;

fn record(fields: Vec<crate::field::Field>) -> Record {
    let time = Local.with_ymd_and_hms(2025, 1, 15, 13, 4, 5).unwrap() + TimeDelta::milliseconds(123);
    Record {
        time,
        level: Level::Warn,
        source: "src/main.rs:42".to_string(),
        fields,
    }
}

#[test]
fn test_default_pattern() {
    let render = PatternRender::default();
    let line = render.render_string(&record(vec![
        kv("user", "alice"),
        kv_string(LOG_KEY, "login failed"),
    ]));
    assert_eq!(
        line,
        "[2025/01/15 13:04:05.123] [WARN] [src/main.rs:42] user=alice login failed"
    );
}

#[test]
fn test_fields_keep_insertion_order() {
    let render = PatternRender::new("%M");
    let line = render.render_string(&record(vec![
        kv("b", 2),
        kv_string(LOG_KEY, "done"),
        kv("a", 1),
        kv("c", true),
    ]));
    assert_eq!(line, "b=2 a=1 c=true done");
}

#[test]
fn test_message_only() {
    let render = PatternRender::new("%M");
    assert_eq!(render.render_string(&record(vec![kv_string(LOG_KEY, "hello")])), "hello");
}

#[test]
fn test_fields_without_message() {
    let render = PatternRender::new("%M");
    assert_eq!(render.render_string(&record(vec![kv("k", "v")])), "k=v");
    assert_eq!(render.render_string(&record(vec![])), "");
}

#[test]
fn test_reserved_fields_are_not_rendered() {
    let render = PatternRender::new("%M");
    let line = render.render_string(&record(vec![
        kv_string("source", "elsewhere.rs:1"),
        kv_string("level", "fake"),
        kv_string(LOG_KEY, "msg"),
    ]));
    assert_eq!(line, "msg");
}

#[test]
fn test_unknown_directive_is_literal() {
    let render = PatternRender::new("%X %L 100%");
    assert_eq!(render.render_string(&record(vec![])), "%X WARN 100%");
}

#[test]
fn test_double_percent_before_directive() {
    let render = PatternRender::new("%%L");
    assert_eq!(render.render_string(&record(vec![])), "%WARN");
}

#[test]
fn test_plain_text() {
    let render = PatternRender::new("no directives");
    assert_eq!(render.render_string(&record(vec![])), "no directives");
    assert_eq!(PatternRender::new("").render_string(&record(vec![])), "");
}

#[test]
fn test_individual_directives() {
    let r = record(vec![]);
    assert_eq!(PatternRender::new("%D").render_string(&r), "2025/01/15");
    assert_eq!(PatternRender::new("%T").render_string(&r), "13:04:05.123");
    assert_eq!(PatternRender::new("%L").render_string(&r), "WARN");
    assert_eq!(PatternRender::new("%S").render_string(&r), "src/main.rs:42");
}

#[test]
fn test_render_appends() {
    let render = PatternRender::new("%L");
    let mut out = String::from("> ");
    render.render(&record(vec![]), &mut out);
    assert_eq!(out, "> WARN");
}
