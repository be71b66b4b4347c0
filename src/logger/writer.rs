//! Size-based rolling file writer

use crate::logger::config::FileConfig;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Log file that rolls over to `<path>.1`, `<path>.2`, ... once it
/// exceeds `max_size` bytes, keeping at most `max_files` old files.
#[derive(Clone)]
pub struct RollingFileWriter {
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    file: File,
    path: PathBuf,
    current_size: u64,
    max_size: u64,
    max_files: usize,
}

impl RollingFileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                path: config.path.clone(),
                current_size,
                max_size: config.max_size,
                max_files: config.max_files,
            })),
        })
    }
}

impl WriterState {
    fn needs_rollover(&self, incoming: usize) -> bool {
        self.max_size > 0
            && self.current_size > 0
            && self.current_size + incoming as u64 > self.max_size
    }

    fn roll_over(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = rolled_path(&self.path, self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = rolled_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, rolled_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, rolled_path(&self.path, 1))?;

        self.file = open_log_file(&self.path, false)?;
        self.current_size = 0;
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriterGuard {
            state: self.state.clone(),
        }
    }
}

pub struct RollingWriterGuard {
    state: Arc<Mutex<WriterState>>,
}

impl Write for RollingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;

        if state.needs_rollover(buf.len()) {
            if let Err(e) = state.roll_over() {
                // Keep logging to the current file rather than losing lines.
                eprintln!("log rollover failed for {}: {}", state.path.display(), e);
            }
        }

        let written = state.file.write(buf)?;
        state.current_size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        state.file.flush()
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options.open(path)
}

fn rolled_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
