//! Chart rendering - turning a price series into an image
//!
//! Rendering itself sits behind [`ChartRenderer`]; the core only decides
//! whether there is enough data to draw at all.

use std::fmt::Write as _;

use crate::shared::types::PriceSample;

/// A series needs at least this many samples to be drawable.
pub const MIN_SAMPLES: usize = 2;

/// Result of a chart request. Too little data is an expected outcome,
/// not an error.
#[derive(Debug)]
pub enum ChartOutcome {
    Image(Vec<u8>),
    InsufficientData,
}

/// Renders an ordered sample series to image bytes
pub trait ChartRenderer: Send + Sync {
    fn render(&self, samples: &[PriceSample]) -> Vec<u8>;
}

/// Apply the minimum-data rule, then delegate to the renderer.
pub fn render_series(renderer: &dyn ChartRenderer, samples: &[PriceSample]) -> ChartOutcome {
    if samples.len() < MIN_SAMPLES {
        return ChartOutcome::InsufficientData;
    }
    ChartOutcome::Image(renderer.render(samples))
}

/// Plain SVG polyline over the series
pub struct SvgLineChart {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgLineChart {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
        }
    }
}

impl SvgLineChart {
    const MARGIN: f64 = 60.0;

    fn points(&self, samples: &[PriceSample]) -> String {
        let (min, max) = samples.iter().fold((u64::MAX, 0u64), |(lo, hi), s| {
            (lo.min(s.price), hi.max(s.price))
        });
        let span = if max > min { (max - min) as f64 } else { 1.0 };

        let plot_w = self.width as f64 - 2.0 * Self::MARGIN;
        let plot_h = self.height as f64 - 2.0 * Self::MARGIN;
        let step = if samples.len() > 1 {
            plot_w / (samples.len() - 1) as f64
        } else {
            0.0
        };

        let mut points = String::new();
        for (i, sample) in samples.iter().enumerate() {
            let x = Self::MARGIN + step * i as f64;
            let y = self.height as f64 - Self::MARGIN
                - (sample.price - min) as f64 / span * plot_h;
            let _ = write!(points, "{:.1},{:.1} ", x, y);
        }
        points.trim_end().to_string()
    }
}

impl ChartRenderer for SvgLineChart {
    fn render(&self, samples: &[PriceSample]) -> Vec<u8> {
        let (w, h) = (self.width, self.height);
        let m = Self::MARGIN;
        let points = self.points(samples);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(
            svg,
            r#"<rect width="{w}" height="{h}" fill="white"/>"#
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="30" text-anchor="middle" font-size="20">График изменения цены</text>"#,
            w / 2
        );
        // axes
        let _ = write!(
            svg,
            r#"<line x1="{m}" y1="{y}" x2="{x2}" y2="{y}" stroke="black"/>"#,
            m = m,
            y = h as f64 - m,
            x2 = w as f64 - m
        );
        let _ = write!(
            svg,
            r#"<line x1="{m}" y1="{m}" x2="{m}" y2="{y2}" stroke="black"/>"#,
            m = m,
            y2 = h as f64 - m
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">Время</text>"#,
            w / 2,
            h - 15
        );
        let _ = write!(
            svg,
            r#"<text x="20" y="{}" transform="rotate(-90 20 {})" text-anchor="middle" font-size="14">Цена</text>"#,
            h / 2,
            h / 2
        );
        let _ = write!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="steelblue" stroke-width="2"/>"#,
            points
        );
        svg.push_str("</svg>");
        svg.into_bytes()
    }
}
