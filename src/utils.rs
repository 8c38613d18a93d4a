use std::{
    fs::{self, File},
    io,
    path::Path,
};

/// Opens `path` for appending, creating it and its parent directory when
/// missing. A path that exists but is not a regular file is rejected.
///
/// Pairs with [`Logger::new`](crate::Logger::new) and
/// [`Logger::set_output`](crate::Logger::set_output); the logger itself
/// never creates, flushes or closes its sink.
pub fn open_log_file<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let path = path.as_ref();
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    if let Ok(meta) = path.metadata()
        && !meta.is_file()
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} exists but is not a regular file", path.display()),
        ));
    }
    File::options().create(true).append(true).open(path)
}

#[test]
fn test_open_log_file_creates_parent_and_appends() {
    use std::io::Write;

    let dir = "/tmp/synclog_test_open_log_file";
    std::fs::remove_dir_all(dir).ok();
    let path = format!("{dir}/nested/app.log");

    let mut file = open_log_file(&path).unwrap();
    writeln!(file, "first").unwrap();
    drop(file);
    let mut file = open_log_file(&path).unwrap();
    writeln!(file, "second").unwrap();
    drop(file);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_open_log_file_rejects_non_regular_paths() {
    let dir = "/tmp/synclog_test_open_log_dir";
    std::fs::create_dir_all(dir).unwrap();
    let err = open_log_file(dir).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    std::fs::remove_dir_all(dir).ok();
}
