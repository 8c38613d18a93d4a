use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::level::{Flags, Level};

/// Renders one complete record (header, message, trailing newline) into `buf`.
///
/// `t` is the wall-clock timestamp, already shifted to UTC by the caller when
/// the UTC flag is set. `site` is the resolved call site; `None` renders the
/// `???:0` sentinel when a file field is requested.
pub(crate) fn render(
    buf: &mut Vec<u8>,
    prefix: &str,
    flags: Flags,
    level: Level,
    t: NaiveDateTime,
    site: Option<(&str, u32)>,
    msg: &str,
) {
    format_header(buf, prefix, flags, level, t, site);
    buf.extend_from_slice(msg.as_bytes());
    if !msg.is_empty() && !msg.ends_with('\n') {
        buf.push(b'\n');
    }
}

fn format_header(
    buf: &mut Vec<u8>,
    prefix: &str,
    flags: Flags,
    level: Level,
    t: NaiveDateTime,
    site: Option<(&str, u32)>,
) {
    if !prefix.is_empty() {
        buf.push(b'<');
        buf.extend_from_slice(prefix.as_bytes());
        buf.extend_from_slice(b"> ");
    }

    if flags.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS) {
        if flags.contains(Flags::DATE) {
            push_decimal(buf, t.year() as u64, Some(4));
            buf.push(b'/');
            push_decimal(buf, t.month() as u64, Some(2));
            buf.push(b'/');
            push_decimal(buf, t.day() as u64, Some(2));
            buf.push(b' ');
        }
        if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
            push_decimal(buf, t.hour() as u64, Some(2));
            buf.push(b':');
            push_decimal(buf, t.minute() as u64, Some(2));
            buf.push(b':');
            push_decimal(buf, t.second() as u64, Some(2));
            if flags.contains(Flags::MICROSECONDS) {
                buf.push(b'.');
                push_decimal(buf, (t.nanosecond() / 1_000) as u64, Some(6));
            }
            buf.push(b' ');
        }
    }

    buf.extend_from_slice(level.tag().as_bytes());
    buf.push(b' ');

    if flags.intersects(Flags::LONG_FILE | Flags::SHORT_FILE) {
        let (file, line) = site.unwrap_or(("???", 0));
        let file = if flags.contains(Flags::SHORT_FILE) {
            short_path(file)
        } else {
            file
        };
        buf.extend_from_slice(file.as_bytes());
        buf.push(b':');
        push_decimal(buf, u64::from(line), None);
        buf.extend_from_slice(b": ");
    }
}

/// Final segment of a `/`-separated path; paths without a separator are
/// returned unchanged.
pub(crate) fn short_path(file: &str) -> &str {
    match file.rsplit_once('/') {
        Some((_, short)) => short,
        None => file,
    }
}

/// Cheap fixed-width decimal rendering. `Some(width)` zero-pads to `width`
/// digits; `None` renders with no padding. Zero with width ≤ 1 is a single
/// `0`.
pub(crate) fn push_decimal(buf: &mut Vec<u8>, value: u64, width: Option<usize>) {
    if value == 0 && width.is_none_or(|w| w <= 1) {
        buf.push(b'0');
        return;
    }
    // Assemble digits in reverse.
    let mut digits = [0u8; 32];
    let mut pos = digits.len();
    let mut v = value;
    let mut wid = width.unwrap_or(0);
    while v > 0 || wid > 0 {
        pos -= 1;
        digits[pos] = b'0' + (v % 10) as u8;
        v /= 10;
        wid = wid.saturating_sub(1);
    }
    buf.extend_from_slice(&digits[pos..]);
}

#[cfg(test)]
fn fixed_time() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2020, 2, 14)
        .unwrap()
        .and_hms_micro_opt(17, 37, 50, 123)
        .unwrap()
}

#[cfg(test)]
fn render_to_string(
    prefix: &str,
    flags: Flags,
    level: Level,
    site: Option<(&str, u32)>,
    msg: &str,
) -> String {
    let mut buf = Vec::new();
    render(&mut buf, prefix, flags, level, fixed_time(), site, msg);
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_push_decimal() {
    let cases: &[(u64, Option<usize>, &str)] = &[
        (5, Some(2), "05"),
        (0, Some(1), "0"),
        (0, None, "0"),
        (123, None, "123"),
        (123, Some(6), "000123"),
        (2020, Some(4), "2020"),
        (0, Some(4), "0000"),
    ];
    for &(value, width, expected) in cases {
        let mut buf = Vec::new();
        push_decimal(&mut buf, value, width);
        assert_eq!(buf, expected.as_bytes(), "value {value} width {width:?}");
    }
}

#[test]
fn test_short_path() {
    assert_eq!(short_path("/a/b/c.ext"), "c.ext");
    assert_eq!(short_path("src/logger.rs"), "logger.rs");
    assert_eq!(short_path("c.ext"), "c.ext");
}

#[test]
fn test_full_header() {
    let flags = Flags::DATE | Flags::TIME | Flags::SHORT_FILE;
    let line = render_to_string("", flags, Level::Info, Some(("/x/y/z.go", 42)), "info");
    assert_eq!(line, "2020/02/14 17:37:50 [INFO ] z.go:42: info\n");
}

#[test]
fn test_render_is_deterministic() {
    let flags = Flags::DEFAULT | Flags::MICROSECONDS;
    let a = render_to_string("svc", flags, Level::Warn, Some(("a/b.rs", 7)), "watch out");
    let b = render_to_string("svc", flags, Level::Warn, Some(("a/b.rs", 7)), "watch out");
    assert_eq!(a, b);
    assert_eq!(a, "<svc> 2020/02/14 17:37:50.000123 [WARN ] b.rs:7: watch out\n");
}

#[test]
fn test_bare_flags_render_tag_only() {
    let line = render_to_string("", Flags::NONE, Level::Error, None, "boom");
    assert_eq!(line, "[ERROR] boom\n");
}

#[test]
fn test_missing_site_renders_sentinel() {
    let line = render_to_string("", Flags::SHORT_FILE, Level::Debug, None, "lost");
    assert_eq!(line, "[DEBUG] ???:0: lost\n");
}

#[test]
fn test_long_file_keeps_full_path() {
    let line = render_to_string("", Flags::LONG_FILE, Level::Info, Some(("/x/y/z.rs", 3)), "m");
    assert_eq!(line, "[INFO ] /x/y/z.rs:3: m\n");
}

#[test]
fn test_trailing_newline_not_doubled() {
    let line = render_to_string("", Flags::NONE, Level::Info, None, "done\n");
    assert_eq!(line, "[INFO ] done\n");
}

#[test]
fn test_microseconds_imply_time_field() {
    let line = render_to_string("", Flags::MICROSECONDS, Level::Info, None, "t");
    assert_eq!(line, "17:37:50.000123 [INFO ] t\n");
}
