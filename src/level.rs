use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

/// Record severity, ordered from least to most severe.
///
/// `Off` is a threshold-only value: setting a logger's minimum level to
/// `Off` suppresses all emission, but no record ever carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
    Off,
}

impl Level {
    /// Alias for the lowest threshold: every record passes.
    pub const ALL: Level = Level::Debug;

    /// Fixed-width bracketed tag written in each record header.
    /// Empty for `Off`, which never appears as a record level.
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Level::Debug => "[DEBUG]",
            Level::Info => "[INFO ]",
            Level::Warn => "[WARN ]",
            Level::Error => "[ERROR]",
            Level::Panic => "[PANIC]",
            Level::Fatal => "[FATAL]",
            Level::Off => "",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Off => "off",
        };
        f.write_str(name)
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    unknown: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: {:?}", self.unknown)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "all" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            "off" => Ok(Level::Off),
            _ => Err(ParseLevelError { unknown: s.into() }),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

/// Bitset selecting which header elements are rendered.
///
/// Bits combine with `|`. `SHORT_FILE` takes precedence over `LONG_FILE`
/// when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u32);

impl Flags {
    /// No header elements besides the level tag (and prefix, if any).
    pub const NONE: Flags = Flags(0);
    /// Date of the record: `2020/02/14`.
    pub const DATE: Flags = Flags(1);
    /// Time of the record: `17:37:50`.
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution: `17:37:50.123456`. Implies the time field.
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full call-site path and line number: `/a/b/c.rs:23`.
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final path segment and line number: `c.rs:23`.
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Render the timestamp in UTC rather than local time.
    pub const UTC: Flags = Flags(1 << 5);
    /// Standard header: date and time.
    pub const STD: Flags = Flags(Self::DATE.0 | Self::TIME.0);
    /// Standard header plus the short call site.
    pub const DEFAULT: Flags = Flags(Self::STD.0 | Self::SHORT_FILE.0);

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Rebuilds a set from raw bits. Unknown bits are kept and ignored.
    pub const fn from_bits(bits: u32) -> Flags {
        Flags(bits)
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::DEFAULT
    }
}

impl BitOr for Flags {
    type Output = Flags;
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

#[test]
fn test_level_ordering() {
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::Panic);
    assert!(Level::Panic < Level::Fatal);
    assert!(Level::Fatal < Level::Off);
    assert_eq!(Level::ALL, Level::Debug);
}

#[test]
fn test_level_tags_are_fixed_width() {
    for level in [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ] {
        assert_eq!(level.tag().len(), 7, "tag {:?}", level.tag());
    }
    assert_eq!(Level::Off.tag(), "");
}

#[test]
fn test_level_parsing() {
    assert_eq!("debug".parse(), Ok(Level::Debug));
    assert_eq!("ALL".parse(), Ok(Level::Debug));
    assert_eq!("Info".parse(), Ok(Level::Info));
    assert_eq!("warning".parse(), Ok(Level::Warn));
    assert_eq!("off".parse(), Ok(Level::Off));
    assert!("verbose".parse::<Level>().is_err());
}

#[test]
fn test_flag_composition() {
    let flags = Flags::DATE | Flags::TIME | Flags::UTC;
    assert!(flags.contains(Flags::STD));
    assert!(flags.intersects(Flags::UTC | Flags::SHORT_FILE));
    assert!(!flags.contains(Flags::SHORT_FILE));
    assert_eq!(Flags::DEFAULT, Flags::STD | Flags::SHORT_FILE);
    assert_eq!(Flags::default(), Flags::DEFAULT);
    let mut f = Flags::NONE;
    f |= Flags::MICROSECONDS;
    assert!(f.contains(Flags::MICROSECONDS));
}
