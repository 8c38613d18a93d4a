use std::{
    fmt,
    io::{self, Write},
    panic::Location,
    process,
    sync::Mutex,
};

use chrono::Local;

use crate::{
    format,
    level::{Flags, Level},
};

/// A leveled logger writing formatted records atomically to one sink.
///
/// All state lives behind a single mutex, so any number of threads may share
/// a `Logger` (or the process-wide default instance) and records never
/// interleave their bytes. Configuration changes made concurrently with
/// emission take effect from the next record onward.
pub struct Logger {
    inner: Mutex<Inner>,
}

struct Inner {
    /// Destination for output. The logger never flushes or closes it.
    out: Box<dyn Write + Send>,
    /// Written as `<prefix> ` at the start of each record when non-empty.
    prefix: String,
    /// Header elements to render.
    flags: Flags,
    /// Lowest severity that is emitted.
    level: Level,
    /// Scratch buffer, cleared and reused per record.
    buf: Vec<u8>,
}

impl Logger {
    /// Creates a logger writing to `out`.
    ///
    /// `prefix` appears at the beginning of each record, `flags` selects the
    /// header elements and `level` is the lowest severity emitted.
    pub fn new<W>(out: W, prefix: impl Into<String>, flags: Flags, level: Level) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                out: Box::new(out),
                prefix: prefix.into(),
                flags,
                level,
                buf: Vec::new(),
            }),
        }
    }

    /// Writes one record at `level`, attributed to the caller's location.
    ///
    /// Records below the configured minimum level are dropped without
    /// capturing a timestamp or touching the sink. A trailing newline is
    /// appended when `msg` does not already end with one. The only error
    /// that can surface is the sink's write error.
    ///
    /// The call site is resolved through `#[track_caller]` before the lock
    /// is taken, so location resolution never blocks a concurrent emitter.
    #[track_caller]
    pub fn output(&self, level: Level, msg: &str) -> io::Result<()> {
        let loc = Location::caller();
        self.write_record(level, Some((loc.file(), loc.line())), msg)
    }

    /// Emission path shared by [`Logger::output`] and the `log`-facade
    /// bridge, which supplies the call site from the record metadata.
    pub(crate) fn write_record(
        &self,
        level: Level,
        site: Option<(&str, u32)>,
        msg: &str,
    ) -> io::Result<()> {
        debug_assert!(level != Level::Off, "Off is a threshold, not a record level");
        let mut inner = self.inner.lock().unwrap();
        if level < inner.level {
            return Ok(());
        }
        let now = Local::now();
        let Inner {
            out,
            prefix,
            flags,
            buf,
            ..
        } = &mut *inner;
        let t = if flags.contains(Flags::UTC) {
            now.naive_utc()
        } else {
            now.naive_local()
        };
        buf.clear();
        format::render(buf, prefix, *flags, level, t, site, msg);
        out.write_all(buf)
    }

    /// Writes a debug record. Write errors are discarded.
    #[track_caller]
    pub fn debug<T: fmt::Display>(&self, msg: T) {
        let _ = self.output(Level::Debug, &msg.to_string());
    }

    /// Writes an info record. Write errors are discarded.
    #[track_caller]
    pub fn info<T: fmt::Display>(&self, msg: T) {
        let _ = self.output(Level::Info, &msg.to_string());
    }

    /// Writes a warning record. Write errors are discarded.
    #[track_caller]
    pub fn warn<T: fmt::Display>(&self, msg: T) {
        let _ = self.output(Level::Warn, &msg.to_string());
    }

    /// Writes an error record. Write errors are discarded.
    #[track_caller]
    pub fn error<T: fmt::Display>(&self, msg: T) {
        let _ = self.output(Level::Error, &msg.to_string());
    }

    /// Writes a panic record, then panics with the rendered message.
    ///
    /// The panic is raised after the write attempt regardless of whether the
    /// write succeeded.
    #[track_caller]
    pub fn panic<T: fmt::Display>(&self, msg: T) -> ! {
        let s = msg.to_string();
        let _ = self.output(Level::Panic, &s);
        panic!("{s}");
    }

    /// Writes a fatal record, then terminates the process with status 1.
    ///
    /// The exit happens after the write attempt regardless of whether the
    /// write succeeded.
    #[track_caller]
    pub fn fatal<T: fmt::Display>(&self, msg: T) -> ! {
        let _ = self.output(Level::Fatal, &msg.to_string());
        process::exit(1);
    }

    /// Replaces the output sink.
    pub fn set_output<W>(&self, out: W)
    where
        W: Write + Send + 'static,
    {
        self.inner.lock().unwrap().out = Box::new(out);
    }

    pub fn flags(&self) -> Flags {
        self.inner.lock().unwrap().flags
    }

    pub fn set_flags(&self, flags: Flags) {
        self.inner.lock().unwrap().flags = flags;
    }

    pub fn prefix(&self) -> String {
        self.inner.lock().unwrap().prefix.clone()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.lock().unwrap().prefix = prefix.into();
    }

    pub fn level(&self) -> Level {
        self.inner.lock().unwrap().level
    }

    pub fn set_level(&self, level: Level) {
        self.inner.lock().unwrap().level = level;
    }
}

/// Shared sink recording each write call separately, for asserting that one
/// record maps to exactly one write.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TestSink {
    writes: std::sync::Arc<Mutex<Vec<Vec<u8>>>>,
}

#[cfg(test)]
impl TestSink {
    pub(crate) fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|w| String::from_utf8(w.clone()).unwrap())
            .collect()
    }

    pub(crate) fn contents(&self) -> String {
        self.writes().concat()
    }
}

#[cfg(test)]
impl Write for TestSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_level_gating() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "", Flags::NONE, Level::Warn);
    log.debug("dropped");
    log.info("dropped");
    log.warn("kept");
    log.error("kept");
    assert_eq!(sink.writes(), vec!["[WARN ] kept\n", "[ERROR] kept\n"]);
}

#[test]
fn test_one_write_per_record() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "", Flags::NONE, Level::ALL);
    log.output(Level::Info, "one").unwrap();
    log.output(Level::Info, "two").unwrap();
    let writes = sink.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], "[INFO ] one\n");
    assert_eq!(writes[1], "[INFO ] two\n");
}

#[test]
fn test_raising_level_silences_lower_records() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "", Flags::DEFAULT, Level::ALL);
    log.set_level(Level::Error);
    log.debug("nothing");
    assert_eq!(sink.contents(), "");
    log.set_level(Level::Off);
    log.error("still nothing");
    assert_eq!(sink.contents(), "");
}

#[test]
fn test_accessors_round_trip() {
    let log = Logger::new(std::io::sink(), "boot", Flags::STD, Level::Info);
    assert_eq!(log.prefix(), "boot");
    assert_eq!(log.flags(), Flags::STD);
    assert_eq!(log.level(), Level::Info);
    log.set_prefix("run");
    log.set_flags(Flags::DEFAULT | Flags::UTC);
    log.set_level(Level::Debug);
    assert_eq!(log.prefix(), "run");
    assert_eq!(log.flags(), Flags::DEFAULT | Flags::UTC);
    assert_eq!(log.level(), Level::Debug);
}

#[test]
fn test_prefix_is_bracketed() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "net", Flags::NONE, Level::ALL);
    log.info("up");
    assert_eq!(sink.contents(), "<net> [INFO ] up\n");
}

#[test]
fn test_caller_location_points_here() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "", Flags::SHORT_FILE, Level::ALL);
    log.info("here");
    let line = sink.contents();
    assert!(
        line.starts_with("[INFO ] logger.rs:"),
        "unexpected record: {line:?}"
    );
}

#[test]
fn test_write_error_propagates_from_output() {
    struct FailingSink;
    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("sink down"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
    let log = Logger::new(FailingSink, "", Flags::NONE, Level::ALL);
    assert!(log.output(Level::Info, "lost").is_err());
    // Gated records never reach the sink, so they cannot fail.
    log.set_level(Level::Off);
    assert!(log.output(Level::Info, "gated").is_ok());
}

#[test]
fn test_panic_writes_record_before_unwinding() {
    let sink = TestSink::default();
    let log = Logger::new(sink.clone(), "", Flags::NONE, Level::ALL);
    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        log.panic("boom");
    }));
    let payload = caught.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().unwrap(), "boom");
    assert_eq!(sink.contents(), "[PANIC] boom\n");
}

#[test]
fn test_concurrent_emission_never_interleaves() {
    use std::sync::Arc;

    let sink = TestSink::default();
    let log = Arc::new(Logger::new(sink.clone(), "", Flags::NONE, Level::Info));
    let threads = 8;
    let per_thread = 25;
    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let log = Arc::clone(&log);
            std::thread::spawn(move || {
                for j in 0..per_thread {
                    log.info(format_args!("thread {i} msg {j}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut writes = sink.writes();
    assert_eq!(writes.len(), threads * per_thread);
    writes.sort();
    let mut expected: Vec<String> = (0..threads)
        .flat_map(|i| (0..per_thread).map(move |j| format!("[INFO ] thread {i} msg {j}\n")))
        .collect();
    expected.sort();
    assert_eq!(writes, expected);
}
