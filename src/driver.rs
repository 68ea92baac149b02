//! Segment driver.
//!
//! ```text
//!             LogReader
//!                 │ segments
//!                 ▼
//!   ┌──────── worker pool ────────┐
//!   │ segment 0   segment 1  ...  │   one session per segment
//!   └──────┬──────────────────────┘
//!          │ for each message, in log order
//!          ▼
//!   set_time_nanos(logMonoTime)
//!          │
//!          ├── which == "thumbnail" ──▶ thumbnail::extract ──▶ log_image
//!          └── otherwise ─────────────▶ walk::walk ─────────▶ log_scalar
//! ```

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::layout::Layout;
use crate::route::{LogMessage, Segment};
use crate::session::{Session, SessionFactory};
use crate::thumbnail::{self, THUMBNAIL_KIND, THUMBNAIL_PATH};
use crate::walk;

/// Counters gathered while streaming one segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Segment name, `<route>--<n>`.
    pub segment: String,
    pub messages: u64,
    pub scalars: u64,
    pub images: u64,
}

impl SegmentStats {
    fn new(segment: &Segment) -> Self {
        Self {
            segment: segment.to_string(),
            ..Self::default()
        }
    }
}

/// Route one message to the thumbnail handler or the log walker.
pub fn log_message<S: Session>(
    session: &mut S,
    msg: &LogMessage,
    stats: &mut SegmentStats,
) -> Result<()> {
    session.set_time_nanos(msg.time_nanos());
    stats.messages += 1;

    if msg.which == THUMBNAIL_KIND {
        if let Some(contents) = thumbnail::extract(&msg.payload) {
            session.log_image(THUMBNAIL_PATH, contents)?;
            stats.images += 1;
        }
        return Ok(());
    }

    let scalars = &mut stats.scalars;
    walk::walk(&msg.payload, &msg.which, &mut |path: &str, value: f64| {
        *scalars += 1;
        session.log_scalar(path, value)
    })
}

/// Stream every message of `segment` into a fresh session.
pub fn process_segment<F: SessionFactory>(
    factory: &F,
    layout: &Layout,
    segment: &Segment,
) -> Result<SegmentStats> {
    let mut session = factory.open(segment)?;
    session.declare_layout(layout)?;

    let mut stats = SegmentStats::new(segment);
    for msg in segment.messages()? {
        log_message(&mut session, &msg?, &mut stats)?;
    }
    session.finish()?;

    debug!(
        segment = %stats.segment,
        messages = stats.messages,
        scalars = stats.scalars,
        images = stats.images,
        "segment done"
    );
    Ok(stats)
}

/// Process `segments` on a pool of `workers` threads.
///
/// Segments run in no particular order; the returned statistics follow the
/// order of `segments`. The first error aborts the run.
pub fn run_across_segments<F: SessionFactory>(
    factory: &F,
    layout: &Layout,
    segments: &[Segment],
    workers: usize,
) -> Result<Vec<SegmentStats>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("segment-worker-{}", i))
        .build()?;

    info!(segments = segments.len(), workers, "processing segments");
    pool.install(|| {
        segments
            .par_iter()
            .map(|segment| process_segment(factory, layout, segment))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Recorder {
        time: i64,
        scalars: Vec<(i64, String, f64)>,
        images: Vec<(i64, String, usize)>,
    }

    impl Session for Recorder {
        fn declare_layout(&mut self, _layout: &Layout) -> Result<()> {
            Ok(())
        }

        fn set_time_nanos(&mut self, nanos: i64) {
            self.time = nanos;
        }

        fn log_scalar(&mut self, path: &str, value: f64) -> Result<()> {
            self.scalars.push((self.time, path.to_string(), value));
            Ok(())
        }

        fn log_image(&mut self, path: &str, contents: Vec<u8>) -> Result<()> {
            self.images.push((self.time, path.to_string(), contents.len()));
            Ok(())
        }
    }

    fn message(time: u64, which: &str, payload: serde_json::Value) -> LogMessage {
        LogMessage {
            log_mono_time: time,
            which: which.to_string(),
            payload,
        }
    }

    #[test]
    fn test_log_message_walks_numeric_payload() {
        let mut session = Recorder::default();
        let mut stats = SegmentStats::default();
        let msg = message(42, "carState", json!({ "vEgo": 1.5, "gas": [0.1], "brand": "x" }));

        log_message(&mut session, &msg, &mut stats).unwrap();

        let mut scalars = session.scalars.clone();
        scalars.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            scalars,
            vec![
                (42, "carState/gas/0".to_string(), 0.1),
                (42, "carState/vEgo".to_string(), 1.5),
            ]
        );
        assert!(session.images.is_empty());
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.scalars, 2);
    }

    #[test]
    fn test_log_message_thumbnail_is_single_image() {
        let mut session = Recorder::default();
        let mut stats = SegmentStats::default();
        let msg = message(
            7,
            "thumbnail",
            json!({ "frameId": 3, "timestampEof": 99, "thumbnail": [1, 2, 3] }),
        );

        log_message(&mut session, &msg, &mut stats).unwrap();

        assert_eq!(session.images, vec![(7, "/thumbnail".to_string(), 3)]);
        assert!(session.scalars.is_empty());
        assert_eq!(stats.images, 1);
        assert_eq!(stats.scalars, 0);
    }

    #[test]
    fn test_log_message_thumbnail_without_content() {
        let mut session = Recorder::default();
        let mut stats = SegmentStats::default();
        let msg = message(7, "thumbnail", json!({ "frameId": 3 }));

        log_message(&mut session, &msg, &mut stats).unwrap();

        assert!(session.images.is_empty());
        assert!(session.scalars.is_empty());
        assert_eq!(stats.messages, 1);
    }

    #[test]
    fn test_log_message_sets_time_before_logging() {
        let mut session = Recorder::default();
        let mut stats = SegmentStats::default();

        log_message(&mut session, &message(1, "a", json!({ "x": 1 })), &mut stats).unwrap();
        log_message(&mut session, &message(5, "b", json!({ "y": 2 })), &mut stats).unwrap();

        let times: Vec<i64> = session.scalars.iter().map(|(t, _, _)| *t).collect();
        assert_eq!(times, vec![1, 5]);
        assert_eq!(stats.messages, 2);
    }
}
