use std::{fs::OpenOptions, io::Write, path::Path, time::Duration};

use flume::{Receiver, Sender};
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<ChannelLogger> = OnceCell::new();

const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("a logger is already installed")]
    AlreadyInitialized,
}

enum LogMessage {
    Line(String),
    /// Acknowledged once every line queued before it has been written.
    Flush(Sender<()>),
}

/// Hands formatted records to the writer thread so request handlers never block on I/O.
struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.send(LogMessage::Line(format_record(record)));
        }
    }

    fn flush(&self) {
        let (ack, done) = flume::bounded(1);
        if self.sender.send(LogMessage::Flush(ack)).is_ok() {
            let _ = done.recv_timeout(FLUSH_TIMEOUT);
        }
    }
}

pub fn format_record(record: &Record<'_>) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

fn write_buffer(buffer: &str, sinks: &mut [&mut dyn Write]) {
    if buffer.is_empty() {
        return;
    }
    for sink in sinks.iter_mut() {
        let _ = sink.write_all(buffer.as_bytes());
        let _ = sink.flush();
    }
}

/// Writes every line received to all sinks, batching whatever is already queued.
/// Returns once every sender is gone.
fn write_lines(rx: &Receiver<LogMessage>, sinks: &mut [&mut dyn Write]) {
    let mut buffer = String::new();
    while let Ok(message) = rx.recv() {
        buffer.clear();
        let mut pending = Some(message);
        while let Some(message) = pending.take() {
            match message {
                LogMessage::Line(line) => {
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
                LogMessage::Flush(ack) => {
                    write_buffer(&buffer, sinks);
                    buffer.clear();
                    let _ = ack.send(());
                }
            }
            pending = rx.try_recv().ok();
        }
        write_buffer(&buffer, sinks);
    }
}

/// Installs the global logger. Lines go to stderr and, if given, are appended to `file`.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<(), LoggerError> {
    let mut file = file
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .transpose()?;

    let (sender, rx) = flume::unbounded::<LogMessage>();
    let logger = LOGGER
        .try_insert(ChannelLogger { sender, level })
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    log::set_logger(logger).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::set_max_level(level);

    std::thread::spawn(move || {
        let mut stderr = std::io::stderr();
        let mut sinks: Vec<&mut dyn Write> = vec![&mut stderr];
        if let Some(file) = file.as_mut() {
            sinks.push(file);
        }
        write_lines(&rx, &mut sinks);
    });
    Ok(())
}
