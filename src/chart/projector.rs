//! Turns per-host sample histories into chart geometry.
//!
//! Projection is a pure function of the snapshots it is given: the vertical
//! scale is picked from every visible reading, each host's history is
//! right-aligned so that "now" is the last slot for everyone, and gaps split
//! a host's line into separate segments.

use super::{ChartPoint, Gridline, HostSnapshot, ProjectedSeries, Projection};
use crate::metrics::sample::{Sample, DEFAULT_CAPACITY};

/// The vertical axis never shows less than this many milliseconds.
pub const DEFAULT_SCALE_FLOOR_MS: f64 = 100.0;

/// Number of labelled horizontal gridlines (the 0 ms baseline excluded).
pub const GRIDLINE_COUNT: usize = 5;

/// Largest reading (at least `floor`), rounded up to a multiple of 10.
pub fn choose_scale<'a>(samples: impl IntoIterator<Item = &'a Sample>, floor: f64) -> f64 {
    let observed = samples
        .into_iter()
        .filter_map(Sample::latency)
        .fold(floor, f64::max);
    (observed / 10.0).ceil() * 10.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartProjector {
    slots: usize,
    scale_floor: f64,
}

impl ChartProjector {
    pub fn new(slots: usize, scale_floor: f64) -> Self {
        assert!(slots > 0, "chart needs at least one slot");
        Self { slots, scale_floor }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn project(&self, hosts: &[HostSnapshot]) -> Projection {
        let scale = choose_scale(
            hosts.iter().flat_map(|h| self.visible(&h.samples)),
            self.scale_floor,
        );

        let series = hosts
            .iter()
            .map(|h| self.project_host(h, scale))
            .collect();

        Projection {
            scale,
            slots: self.slots,
            gridlines: gridlines(scale),
            series,
        }
    }

    fn visible<'a>(&self, samples: &'a [Sample]) -> &'a [Sample] {
        &samples[samples.len().saturating_sub(self.slots)..]
    }

    fn project_host(&self, host: &HostSnapshot, scale: f64) -> ProjectedSeries {
        let samples = self.visible(&host.samples);
        let first_slot = self.slots - samples.len();

        let mut points = Vec::with_capacity(samples.len());
        let mut gap_before = false;
        for (i, sample) in samples.iter().enumerate() {
            match sample {
                Sample::Gap => gap_before = true,
                Sample::Latency(ms) => {
                    points.push(ChartPoint {
                        slot: first_slot + i,
                        fraction: 1.0 - (ms / scale).clamp(0.0, 1.0),
                        latency_ms: *ms,
                        gap_before,
                    });
                    gap_before = false;
                }
            }
        }

        ProjectedSeries {
            host: host.host.clone(),
            last_known_good: host.last_known_good,
            sample_count: samples.len(),
            points,
        }
    }
}

impl Default for ChartProjector {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_SCALE_FLOOR_MS)
    }
}

fn gridlines(scale: f64) -> Vec<Gridline> {
    (0..GRIDLINE_COUNT)
        .map(|i| {
            let fraction = i as f64 / GRIDLINE_COUNT as f64;
            Gridline {
                fraction,
                value_ms: scale * (1.0 - fraction),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::host::HostId;
    use pretty_assertions::assert_eq;

    fn snapshot(host: &str, samples: Vec<Sample>) -> HostSnapshot {
        let last_known_good = samples.iter().rev().find_map(Sample::latency);
        HostSnapshot {
            host: HostId::parse(host).unwrap(),
            samples,
            last_known_good,
        }
    }

    fn latencies(values: &[f64]) -> Vec<Sample> {
        values.iter().map(|v| Sample::Latency(*v)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_scale_floor_without_readings() {
        assert_eq!(choose_scale(std::iter::empty(), DEFAULT_SCALE_FLOOR_MS), 100.0);
        assert_eq!(
            choose_scale(&[Sample::Gap, Sample::Gap], DEFAULT_SCALE_FLOOR_MS),
            100.0
        );
        assert_eq!(choose_scale(&latencies(&[3.0, 99.9]), 100.0), 100.0);
    }

    #[test]
    fn test_scale_rounds_up_to_multiple_of_ten() {
        assert_eq!(choose_scale(&latencies(&[101.0]), 100.0), 110.0);
        assert_eq!(choose_scale(&latencies(&[150.0]), 100.0), 150.0);
        assert_eq!(choose_scale(&latencies(&[150.1]), 100.0), 160.0);
        assert_eq!(choose_scale(&latencies(&[40.0, 1234.5, 7.0]), 100.0), 1240.0);
    }

    #[test]
    fn test_scale_is_monotonic_in_added_readings() {
        let mut samples = vec![Sample::Gap];
        let mut previous = choose_scale(&samples, DEFAULT_SCALE_FLOOR_MS);
        for value in [5.0, 80.0, 100.0, 100.5, 133.3, 133.3, 260.0, 999.99] {
            samples.push(Sample::Latency(value));
            let scale = choose_scale(&samples, DEFAULT_SCALE_FLOOR_MS);
            assert!(scale >= previous);
            assert!(scale >= 100.0);
            assert_eq!(scale % 10.0, 0.0);
            previous = scale;
        }
    }

    #[test]
    fn test_scale_spans_all_hosts() {
        let projector = ChartProjector::new(10, DEFAULT_SCALE_FLOOR_MS);
        let projection = projector.project(&[
            snapshot("a", latencies(&[10.0, 20.0])),
            snapshot("b", latencies(&[250.0])),
        ]);
        assert_eq!(projection.scale, 250.0);
    }

    #[test]
    fn test_short_history_is_right_aligned() {
        let projector = ChartProjector::new(120, DEFAULT_SCALE_FLOOR_MS);
        let full: Vec<f64> = (0..120).map(|i| i as f64).collect();
        let projection = projector.project(&[
            snapshot("full", latencies(&full)),
            snapshot("new", latencies(&[1.0, 2.0, 3.0])),
        ]);

        let full_slots: Vec<usize> = projection.series[0].points.iter().map(|p| p.slot).collect();
        let new_slots: Vec<usize> = projection.series[1].points.iter().map(|p| p.slot).collect();

        assert_eq!(full_slots, (0..120).collect::<Vec<_>>());
        assert_eq!(new_slots, vec![117, 118, 119]);
        assert_eq!(full_slots.last(), new_slots.last());
    }

    #[test]
    fn test_gap_splits_line() {
        let projector = ChartProjector::new(3, DEFAULT_SCALE_FLOOR_MS);
        let projection = projector.project(&[snapshot(
            "a",
            vec![Sample::Latency(10.0), Sample::Gap, Sample::Latency(20.0)],
        )]);

        let series = &projection.series[0];
        let segments = series.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[0][0].slot, 0);
        assert_eq!(segments[1].len(), 1);
        assert_eq!(segments[1][0].slot, 2);
        assert!(segments[1][0].gap_before);
    }

    #[test]
    fn test_leading_and_repeated_gaps() {
        let projector = ChartProjector::new(6, DEFAULT_SCALE_FLOOR_MS);
        let projection = projector.project(&[snapshot(
            "a",
            vec![
                Sample::Gap,
                Sample::Latency(1.0),
                Sample::Latency(2.0),
                Sample::Gap,
                Sample::Gap,
                Sample::Latency(3.0),
            ],
        )]);

        let slots: Vec<Vec<usize>> = projection.series[0]
            .segments()
            .iter()
            .map(|s| s.iter().map(|p| p.slot).collect())
            .collect();
        assert_eq!(slots, vec![vec![1, 2], vec![5]]);
    }

    #[test]
    fn test_all_gaps_projects_no_points() {
        let projector = ChartProjector::new(4, DEFAULT_SCALE_FLOOR_MS);
        let projection = projector.project(&[snapshot("a", vec![Sample::Gap; 4])]);

        let series = &projection.series[0];
        assert!(series.points.is_empty());
        assert!(series.segments().is_empty());
        assert_eq!(series.sample_count, 4);
        assert_eq!(series.last_known_good, None);
        assert_eq!(projection.scale, 100.0);
    }

    #[test]
    fn test_scenario_with_gap_and_high_latency() {
        let projector = ChartProjector::new(5, 100.0);
        let projection = projector.project(&[snapshot(
            "example.com",
            vec![
                Sample::Latency(20.0),
                Sample::Gap,
                Sample::Latency(150.0),
                Sample::Latency(150.0),
                Sample::Latency(150.0),
            ],
        )]);

        assert_eq!(projection.scale, 150.0);
        let series = &projection.series[0];
        assert_eq!(series.last_known_good, Some(150.0));

        let slots: Vec<usize> = series.points.iter().map(|p| p.slot).collect();
        assert_eq!(slots, vec![0, 2, 3, 4]);

        // 20 ms sits near the bottom, 150 ms touches the top edge.
        assert_close(series.points[0].fraction, 1.0 - 20.0 / 150.0);
        assert!((series.points[0].fraction - 0.867).abs() < 1e-3);
        for point in &series.points[1..] {
            assert_close(point.fraction, 0.0);
        }

        assert_eq!(series.segments().len(), 2);
    }

    #[test]
    fn test_gridlines_label_from_top() {
        let projector = ChartProjector::new(5, 100.0);
        let projection = projector.project(&[snapshot("a", latencies(&[150.0]))]);

        assert_eq!(projection.gridlines.len(), GRIDLINE_COUNT);
        let expected = [(0.0, 150.0), (0.2, 120.0), (0.4, 90.0), (0.6, 60.0), (0.8, 30.0)];
        for (line, (fraction, value)) in projection.gridlines.iter().zip(expected) {
            assert_close(line.fraction, fraction);
            assert_close(line.value_ms, value);
        }
    }

    #[test]
    fn test_history_longer_than_chart_keeps_newest() {
        let projector = ChartProjector::new(2, 100.0);
        let series = projector.project_host(&snapshot("a", latencies(&[500.0, 1.0, 2.0])), 100.0);

        let slots: Vec<(usize, f64)> = series.points.iter().map(|p| (p.slot, p.latency_ms)).collect();
        assert_eq!(slots, vec![(0, 1.0), (1, 2.0)]);
    }

    #[test]
    fn test_empty_registry_projects_empty_chart() {
        let projection = ChartProjector::default().project(&[]);
        assert_eq!(projection.scale, 100.0);
        assert_eq!(projection.slots, DEFAULT_CAPACITY);
        assert!(projection.series.is_empty());
        assert_eq!(projection.gridlines.len(), 5);
    }
}
