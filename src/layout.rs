//! Static dashboard layout.
//!
//! The layout describes the intended dashboard. Sessions declare what their
//! visualization tool can express of it; the Rerun session declares one
//! named series per time-series panel (see [`Layout::series_topics`]).
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────┐
//! │ Vertical                     │                  │
//! │  ├─ TimeSeries  accelerometer│  Image           │
//! │  ├─ TimeSeries  androidLog   │  /thumbnail      │
//! │  ├─ ...          (hidden)    │                  │
//! │  ├─ Selection   (collapsed)  │                  │
//! │  └─ Time        (collapsed)  │                  │
//! └──────────────────────────────┴──────────────────┘
//! ```

use crate::services::ServiceRegistry;
use crate::thumbnail::THUMBNAIL_PATH;

/// A single panel of the dashboard description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Plot of every scalar logged under `origin`.
    TimeSeries {
        name: String,
        origin: String,
        visible: bool,
    },
    /// Encoded image view.
    Image { name: String, origin: String },
    /// Entity selection inspector.
    Selection { expanded: bool },
    /// Timeline scrubber.
    Time { expanded: bool },
}

/// Grid of two columns: the stacked telemetry panels and the image panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub column: Vec<Panel>,
    pub image: Panel,
}

impl Layout {
    /// Build the layout for every service in `registry`, sorted by name.
    pub fn build(registry: &ServiceRegistry) -> Self {
        let mut topics: Vec<&str> = registry.names().collect();
        topics.sort_unstable();

        let mut column: Vec<Panel> = topics
            .into_iter()
            .map(|topic| Panel::TimeSeries {
                name: topic.to_string(),
                origin: format!("/{}/", topic),
                visible: false,
            })
            .collect();
        column.push(Panel::Selection { expanded: false });
        column.push(Panel::Time { expanded: false });

        Self {
            column,
            image: Panel::Image {
                name: "thumbnail".to_string(),
                origin: THUMBNAIL_PATH.to_string(),
            },
        }
    }

    /// Topic names of the time-series panels, in layout order.
    pub fn series_topics(&self) -> impl Iterator<Item = &str> {
        self.column.iter().filter_map(|panel| match panel {
            Panel::TimeSeries { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}
