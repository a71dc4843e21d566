use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::events::{EventSink, SimEvent};

const HEADER: &str = "kind\tcurrentTime\tpriv\tarrivedAt\tservedTime\twaitingTime";

/// Event sink writing one tab-separated file per replication,
/// `<dir>/logs_<replication>.txt`. Writes are batched by `buffer_size`; the
/// first I/O error is kept and reported when the replication ends.
pub struct FileLogger {
    dir: PathBuf,
    buffer: Vec<SimEvent>,
    buffer_size: usize,
    file: Option<File>,
    error: Option<io::Error>,
}

impl FileLogger {

    pub fn new<P: AsRef<Path>>(buffer_size: usize, dir: P) -> Self
    {
        FileLogger {
            dir: dir.as_ref().to_path_buf(),
            buffer: Vec::with_capacity(buffer_size),
            buffer_size: buffer_size.max(1),
            file: None,
            error: None,
        }
    }

    pub fn path_for(&self, replication: usize) -> PathBuf
    {
        self.dir.join(format!("logs_{}.txt", replication))
    }

    fn format_event(event: &SimEvent) -> String
    {
        let priority = match event.priority {
            Some(p) => p.to_string(),
            None => "-".to_owned(),
        };
        format!("{}\t{}\t{}\t{}\t{}\t{}",
                event.kind, event.current_time, priority,
                event.arrival_time, event.service_time, event.waiting_time)
    }

    fn dump_log(&mut self) -> io::Result<()>
    {
        let file = match self.file {
            Some(ref mut f) => f,
            None => {
                self.buffer.clear();
                return Ok(());
            }
        };
        let mut s = String::new();
        for event in self.buffer.drain(..) {
            s.push_str(&Self::format_event(&event));
            s.push('\n');
        }
        file.write_all(s.as_bytes())
    }

    fn latch(&mut self, result: io::Result<()>)
    {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    fn take_error(&mut self, replication: usize) -> Result<(), SimError>
    {
        match self.error.take() {
            Some(source) => Err(SimError::EventLog { replication, source }),
            None => Ok(()),
        }
    }
}

impl EventSink for FileLogger {

    fn begin_replication(&mut self, replication: usize) -> Result<(), SimError>
    {
        let path = self.path_for(replication);
        let opened = File::create(&path).and_then(|mut f| {
            writeln!(f, "{}", HEADER)?;
            Ok(f)
        });
        match opened {
            Ok(f) => {
                self.file = Some(f);
                Ok(())
            },
            Err(source) => Err(SimError::EventLog { replication, source }),
        }
    }

    fn record(&mut self, event: &SimEvent)
    {
        self.buffer.push(*event);
        if self.buffer.len() >= self.buffer_size {
            let result = self.dump_log();
            self.latch(result);
        }
    }

    fn end_replication(&mut self, replication: usize) -> Result<(), SimError>
    {
        let result = self.dump_log().and_then(|_| match self.file.take() {
            Some(mut f) => f.flush(),
            None => Ok(()),
        });
        self.latch(result);
        self.take_error(replication)
    }
}

impl Drop for FileLogger {

    fn drop(&mut self) {
        // best effort for a replication that never ended
        let _ = self.dump_log();
    }
}
