//! Route names and the local log reader.
//!
//! A route is named `<dongle_id>|<timestamp>` and stored on disk as one
//! directory per segment:
//!
//! ```text
//! <data_dir>/
//!   a2a0ccea32023010/
//!     2023-07-27--13-01-19--0/rlog.jsonl
//!     2023-07-27--13-01-19--1/rlog.jsonl
//!     2023-07-27--13-01-19--2/qlog.jsonl
//! ```
//!
//! A name may carry a segment selection:
//!
//! | Name                     | Segments              |
//! |--------------------------|-----------------------|
//! | `dongle\|ts`             | all                   |
//! | `dongle\|ts--2`          | 2                     |
//! | `dongle\|ts/2`           | 2                     |
//! | `dongle\|ts/1:3`         | 1, 2                  |
//! | `dongle\|ts/4:`          | 4 to the last         |
//! | `dongle\|ts/:2`          | 0, 1                  |
//! | `dongle\|ts/-1`          | the last one          |

mod message;
mod segment;

pub use message::{LogMessage, MessageError};
pub use segment::{Messages, Segment, QLOG_FILE, RLOG_FILE};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};

const DONGLE_ID_LEN: usize = 16;
/// `YYYY-MM-DD--HH-MM-SS`
const TIMESTAMP_LEN: usize = 20;

/// Which segments of a route to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentSelector {
    #[default]
    All,
    /// One segment by number.
    Single(usize),
    /// Segments numbered within `[start, end)`.
    Range {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// The n-th segment counted from the end, 1 being the last.
    FromEnd(usize),
}

impl SegmentSelector {
    /// Pick the selected segment numbers out of the sorted `available` list.
    pub fn apply(&self, available: &[usize]) -> Vec<usize> {
        match *self {
            SegmentSelector::All => available.to_vec(),
            SegmentSelector::Single(n) => available.iter().copied().filter(|&s| s == n).collect(),
            SegmentSelector::Range { start, end } => available
                .iter()
                .copied()
                .filter(|&s| start.is_none_or(|a| s >= a) && end.is_none_or(|b| s < b))
                .collect(),
            SegmentSelector::FromEnd(n) => available
                .len()
                .checked_sub(n)
                .filter(|_| n > 0)
                .map(|i| vec![available[i]])
                .unwrap_or_default(),
        }
    }

    fn parse(s: &str) -> std::result::Result<Self, String> {
        let number = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| format!("invalid segment number {:?}", part))
        };

        if let Some(n) = s.strip_prefix('-') {
            return match number(n)? {
                0 => Err("segment offset from the end must be at least 1".to_string()),
                n => Ok(SegmentSelector::FromEnd(n)),
            };
        }

        match s.split_once(':') {
            Some((start, end)) => {
                let start = (!start.is_empty()).then(|| number(start)).transpose()?;
                let end = (!end.is_empty()).then(|| number(end)).transpose()?;
                Ok(SegmentSelector::Range { start, end })
            }
            None => Ok(SegmentSelector::Single(number(s)?)),
        }
    }
}

impl fmt::Display for SegmentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentSelector::All => Ok(()),
            SegmentSelector::Single(n) => write!(f, "/{}", n),
            SegmentSelector::Range { start, end } => {
                f.write_str("/")?;
                if let Some(start) = start {
                    write!(f, "{}", start)?;
                }
                f.write_str(":")?;
                if let Some(end) = end {
                    write!(f, "{}", end)?;
                }
                Ok(())
            }
            SegmentSelector::FromEnd(n) => write!(f, "/-{}", n),
        }
    }
}

/// A parsed route or segment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    dongle_id: String,
    timestamp: String,
    selector: SegmentSelector,
}

impl Route {
    pub fn dongle_id(&self) -> &str {
        &self.dongle_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn selector(&self) -> SegmentSelector {
        self.selector
    }

    /// `<dongle_id>|<timestamp>`, without any segment selection.
    pub fn canonical_name(&self) -> String {
        format!("{}|{}", self.dongle_id, self.timestamp)
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidRoute {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = name.trim();
        let (dongle_id, rest) = trimmed
            .split_once(['|', '/'])
            .ok_or_else(|| invalid("expected <dongle_id>|<timestamp>"))?;

        if dongle_id.len() != DONGLE_ID_LEN || !dongle_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("dongle id must be 16 hex characters"));
        }

        let timestamp = rest
            .get(..TIMESTAMP_LEN)
            .filter(|ts| is_timestamp(ts))
            .ok_or_else(|| invalid("timestamp must look like YYYY-MM-DD--HH-MM-SS"))?;

        let suffix = &rest[TIMESTAMP_LEN..];
        let selector = if suffix.is_empty() {
            SegmentSelector::All
        } else if let Some(n) = suffix.strip_prefix("--") {
            let n = n
                .parse()
                .map_err(|_| invalid("segment suffix must be --<number>"))?;
            SegmentSelector::Single(n)
        } else if let Some(sel) = suffix.strip_prefix('/') {
            SegmentSelector::parse(sel).map_err(|reason| invalid(&reason))?
        } else {
            return Err(invalid("unexpected text after timestamp"));
        };

        Ok(Self {
            dongle_id: dongle_id.to_ascii_lowercase(),
            timestamp: timestamp.to_string(),
            selector,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.canonical_name(), self.selector)
    }
}

fn is_timestamp(ts: &str) -> bool {
    // Positions of the separators in YYYY-MM-DD--HH-MM-SS
    const DASHES: [usize; 6] = [4, 7, 10, 11, 14, 17];
    ts.char_indices().all(|(i, c)| {
        if DASHES.contains(&i) {
            c == '-'
        } else {
            c.is_ascii_digit()
        }
    })
}

/// Resolves a route against the local data directory.
#[derive(Debug, Clone)]
pub struct LogReader {
    route: Route,
    segments: Vec<Segment>,
}

impl LogReader {
    /// Parse `name` and find its selected segments under `data_dir`.
    pub fn open(name: &str, data_dir: &Path) -> Result<Self> {
        let route: Route = name.parse()?;
        let route_dir = data_dir.join(route.dongle_id());
        let canonical = route.canonical_name();

        let not_found = || Error::RouteNotFound {
            route: route.to_string(),
            dir: route_dir.clone(),
        };

        if !route_dir.is_dir() {
            return Err(not_found());
        }

        let mut available = segment_dirs(&route_dir, route.timestamp())?;
        available.sort_unstable_by_key(|(n, _)| *n);
        let numbers: Vec<usize> = available.iter().map(|(n, _)| *n).collect();
        debug!(route = %canonical, available = numbers.len(), "scanned route directory");

        let selected = route.selector().apply(&numbers);
        if selected.is_empty() {
            return Err(not_found());
        }

        let segments = available
            .iter()
            .filter(|(n, _)| selected.contains(n))
            .map(|(n, dir)| Segment::locate(&canonical, *n, dir))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { route, segments })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Selected segments in ascending order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Directories named `<timestamp>--<n>` under `route_dir`.
fn segment_dirs(route_dir: &Path, timestamp: &str) -> Result<Vec<(usize, PathBuf)>> {
    let prefix = format!("{}--", timestamp);
    let entries = fs::read_dir(route_dir).map_err(|e| Error::io(route_dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(route_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let number = entry
            .file_name()
            .to_str()
            .and_then(|name| name.strip_prefix(&prefix))
            .and_then(|n| n.parse::<usize>().ok());
        if let Some(number) = number {
            dirs.push((number, path));
        }
    }
    Ok(dirs)
}
