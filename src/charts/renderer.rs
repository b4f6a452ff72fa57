//! Static Chart Renderer
//! Draws the decade histogram of event records to a PNG file.
//!
//! Layout:
//! 1. Title: "Storm events recorded per decade" centered
//! 2. One bar per decade bucket, labelled with its start year (the final
//!    bucket is labelled "YYYY-YYYY" up to the latest event date)
//! 3. Y axis: record count, topped at a rounded step above the tallest bar

use chrono::Datelike;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::stats::DecadeHistogram;

const BAR: RGBColor = RGBColor(91, 155, 213);
const BAR_EDGE: RGBColor = RGBColor(31, 78, 121);

const TITLE: &str = "Storm events recorded per decade";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Histogram has no dated records to draw")]
    Empty,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `hist` as a bar chart PNG at `path`.
    pub fn render_decade_histogram(
        hist: &DecadeHistogram,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ChartError> {
        if hist.buckets.is_empty() {
            return Err(ChartError::Empty);
        }

        let labels = Self::bucket_labels(hist);
        let max_count = hist.buckets.iter().map(|b| b.count).max().unwrap_or(0);
        let y_top = Self::axis_top(max_count);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d((0..labels.len()).into_segmented(), 0usize..y_top)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    labels.get(*i).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .x_desc("Begin date")
            .y_desc("Records")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR.filled())
                    .margin(6)
                    .data(hist.buckets.iter().enumerate().map(|(i, b)| (i, b.count))),
            )
            .map_err(render_err)?;

        // Outline pass so adjacent bars stay distinct at small sizes.
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_EDGE.stroke_width(1))
                    .margin(6)
                    .data(hist.buckets.iter().enumerate().map(|(i, b)| (i, b.count))),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        info!("histogram written to {}", path.display());
        Ok(())
    }

    fn bucket_labels(hist: &DecadeHistogram) -> Vec<String> {
        let last = hist.buckets.len().saturating_sub(1);
        hist.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if i == last {
                    format!("{}-{}", b.start.year(), b.end.year())
                } else {
                    format!("{}s", b.start.year())
                }
            })
            .collect()
    }

    /// Round `max_count` up to the next multiple of a 1/2/5 step, leaving
    /// headroom above the tallest bar.
    fn axis_top(max_count: usize) -> usize {
        if max_count == 0 {
            return 1;
        }
        let step = Self::nice_step(max_count as f64, 8);
        let top = ((max_count as f64 / step).floor() + 1.0) * step;
        top.ceil() as usize
    }

    fn nice_step(range: f64, target_steps: usize) -> f64 {
        let raw_step = (range / target_steps as f64).max(1.0);
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        nice * magnitude
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DecadeBucket;
    use chrono::NaiveDate;

    fn bucket(start: i32, end: (i32, u32, u32), count: usize) -> DecadeBucket {
        DecadeBucket {
            start: NaiveDate::from_ymd_opt(start, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            count,
        }
    }

    #[test]
    fn labels_name_decades_and_final_span() {
        let hist = DecadeHistogram {
            buckets: vec![bucket(1950, (1960, 1, 1), 3), bucket(1960, (2011, 11, 30), 9)],
            undated: 0,
            before_range: 0,
        };
        assert_eq!(
            StaticChartRenderer::bucket_labels(&hist),
            vec!["1950s".to_string(), "1960-2011".to_string()]
        );
    }

    #[test]
    fn axis_top_leaves_headroom() {
        assert_eq!(StaticChartRenderer::axis_top(0), 1);
        assert_eq!(StaticChartRenderer::axis_top(7), 8);
        assert_eq!(StaticChartRenderer::axis_top(95), 100);
        assert_eq!(StaticChartRenderer::axis_top(100), 120);
        assert!(StaticChartRenderer::axis_top(398_000) > 398_000);
    }

    #[test]
    fn empty_histogram_is_rejected() {
        let err = StaticChartRenderer::render_decade_histogram(
            &DecadeHistogram::default(),
            Path::new("unused.png"),
            (640, 480),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::Empty));
    }
}
