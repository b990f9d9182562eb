use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Where formatted log lines end up.
#[derive(Clone, Debug)]
enum LogTarget {
    File(Arc<Mutex<File>>),
    Stderr,
    /// The alternate screen owns stderr while the desktop is running.
    Sink,
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
    Sink,
}

impl DelegatingWriter {
    fn new(target: &LogTarget) -> Self {
        let inner = match target {
            LogTarget::File(file) => DelegatingInner::File(Arc::clone(file)),
            LogTarget::Stderr => DelegatingInner::Stderr(io::stderr()),
            LogTarget::Sink => DelegatingInner::Sink,
        };
        DelegatingWriter { inner }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
            DelegatingInner::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
            DelegatingInner::Sink => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    target: LogTarget,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(&self.target)
    }
}

impl SubscriberMakeWriter {
    /// Append to `log_file` when given. Without a file, interactive sessions
    /// discard output and everything else goes to stderr.
    pub fn new(log_file: Option<&Path>, interactive: bool) -> io::Result<Self> {
        let target = match log_file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                LogTarget::File(Arc::new(Mutex::new(file)))
            }
            None if interactive => LogTarget::Sink,
            None => LogTarget::Stderr,
        };
        Ok(Self { target })
    }
}

/// Install the global subscriber. Safe to call multiple times; later calls
/// leave the first subscriber in place.
pub fn init(log_file: Option<&Path>, interactive: bool, verbose: bool) -> io::Result<()> {
    let writer = SubscriberMakeWriter::new(log_file, interactive)?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wm.log");
        fs::write(&path, "first\n").unwrap();

        let make = SubscriberMakeWriter::new(Some(&path), true).unwrap();
        let mut writer = make.make_writer();
        writer.write_all(b"second\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn interactive_without_file_discards() {
        let make = SubscriberMakeWriter::new(None, true).unwrap();
        let mut writer = make.make_writer();
        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        assert!(matches!(make.target, LogTarget::Sink));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("wm.log");
        assert!(SubscriberMakeWriter::new(Some(&path), false).is_err());
    }
}
