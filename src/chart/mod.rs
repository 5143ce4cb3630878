pub mod projector;

pub use projector::{choose_scale, ChartProjector, DEFAULT_SCALE_FLOOR_MS, GRIDLINE_COUNT};

use crate::metrics::host::HostId;
use crate::metrics::sample::Sample;

/// One host's history as read at a single instant.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSnapshot {
    pub host: HostId,
    pub samples: Vec<Sample>,
    pub last_known_good: Option<f64>,
}

/// A plotted sample.
///
/// `fraction` is the distance from the top of the plot area, in `[0, 1]`:
/// 0 is the top edge (labelled with the scale), 1 is the bottom edge
/// (labelled 0 ms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub slot: usize,
    pub fraction: f64,
    pub latency_ms: f64,
    /// A gap precedes this point; do not join it to the previous point.
    pub gap_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSeries {
    pub host: HostId,
    pub last_known_good: Option<f64>,
    /// Number of samples (including gaps) behind this series.
    pub sample_count: usize,
    pub points: Vec<ChartPoint>,
}

impl ProjectedSeries {
    /// Runs of points that may be joined by line segments.
    pub fn segments(&self) -> Vec<&[ChartPoint]> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (i, point) in self.points.iter().enumerate() {
            if point.gap_before && i > start {
                segments.push(&self.points[start..i]);
                start = i;
            }
        }
        if start < self.points.len() {
            segments.push(&self.points[start..]);
        }
        segments
    }
}

/// Horizontal gridline position and its axis label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gridline {
    pub fraction: f64,
    pub value_ms: f64,
}

/// Everything a renderer needs for one frame of the latency chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub scale: f64,
    /// Width of the shared time axis; the newest sample sits in `slots - 1`.
    pub slots: usize,
    pub gridlines: Vec<Gridline>,
    pub series: Vec<ProjectedSeries>,
}
