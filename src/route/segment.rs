//! A single segment of a route and sequential iteration over its events.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use super::message::LogMessage;
use crate::error::{Error, Result};

/// Full-resolution log, preferred when present.
pub const RLOG_FILE: &str = "rlog.jsonl";
/// Decimated log used when no rlog was kept.
pub const QLOG_FILE: &str = "qlog.jsonl";

/// One time-ordered chunk of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    route: String,
    number: usize,
    log_path: PathBuf,
}

impl Segment {
    pub fn new(route: impl Into<String>, number: usize, log_path: impl Into<PathBuf>) -> Self {
        Self {
            route: route.into(),
            number,
            log_path: log_path.into(),
        }
    }

    /// Locate the log file inside a segment directory.
    pub(crate) fn locate(route: &str, number: usize, dir: &Path) -> Result<Self> {
        [RLOG_FILE, QLOG_FILE]
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file())
            .map(|path| Self::new(route, number, path))
            .ok_or_else(|| Error::MissingLog(dir.to_path_buf()))
    }

    /// Canonical route name this segment belongs to.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Open the log for sequential reading.
    pub fn messages(&self) -> Result<Messages> {
        let file = File::open(&self.log_path).map_err(|e| Error::io(&self.log_path, e))?;
        Ok(Messages {
            path: self.log_path.clone(),
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.route, self.number)
    }
}

/// Iterator over the events of a segment, in log order.
///
/// Blank lines are skipped. Undecodable lines yield [`Error::MalformedLog`]
/// carrying their 1-based line number.
#[derive(Debug)]
pub struct Messages {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl Iterator for Messages {
    type Item = Result<LogMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::io(&self.path, e))),
            };
            self.line += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(LogMessage::parse(&line).map_err(|e| Error::MalformedLog {
                path: self.path.clone(),
                line: self.line,
                reason: e.to_string(),
            }));
        }
    }
}
