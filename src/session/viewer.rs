//! Rerun viewer sessions.

use rerun::{EncodedImage, RecordingStream, RecordingStreamBuilder, Scalar, SeriesLine};
use tracing::debug;

use super::{Session, SessionFactory};
use crate::error::Result;
use crate::layout::Layout;
use crate::route::Segment;

/// Spawns (or connects to) a local Rerun viewer for every segment.
///
/// All sessions of one factory share the application id and recording id,
/// so the viewer merges the segments of a route into a single recording.
#[derive(Debug, Clone)]
pub struct RerunSessionFactory {
    app_id: String,
    recording_id: String,
    timeline: String,
}

impl RerunSessionFactory {
    pub fn new(
        app_id: impl Into<String>,
        recording_id: impl Into<String>,
        timeline: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            recording_id: recording_id.into(),
            timeline: timeline.into(),
        }
    }
}

impl SessionFactory for RerunSessionFactory {
    type Session = RerunSession;

    fn open(&self, segment: &Segment) -> Result<RerunSession> {
        debug!(segment = %segment, recording = %self.recording_id, "spawning viewer session");
        let rec = RecordingStreamBuilder::new(self.app_id.as_str())
            .recording_id(self.recording_id.clone())
            .spawn()?;
        Ok(RerunSession {
            rec,
            timeline: self.timeline.clone(),
        })
    }
}

/// A recording stream tied to one segment.
pub struct RerunSession {
    rec: RecordingStream,
    timeline: String,
}

impl Session for RerunSession {
    fn declare_layout(&mut self, layout: &Layout) -> Result<()> {
        // Only series names are declared; panel visibility, the collapsed
        // selection/time panels and the image view are left to the viewer.
        for topic in layout.series_topics() {
            self.rec.log_static(topic, &SeriesLine::new().with_name(topic))?;
        }
        Ok(())
    }

    fn set_time_nanos(&mut self, nanos: i64) {
        self.rec.set_time_nanos(self.timeline.as_str(), nanos);
    }

    fn log_scalar(&mut self, path: &str, value: f64) -> Result<()> {
        self.rec.log(path, &Scalar::new(value))?;
        Ok(())
    }

    fn log_image(&mut self, path: &str, contents: Vec<u8>) -> Result<()> {
        self.rec.log(path, &EncodedImage::from_file_contents(contents))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.rec.flush_blocking();
        Ok(())
    }
}
