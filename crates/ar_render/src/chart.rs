//! Horizontal bar chart of an aspect space.
//!
//! Layout is a pure function of the aspect space and a [`ChartConfig`]; the
//! resulting [`BarChart`] can be serialized to SVG.

use ar_core::{AspectSpace, Dimension};
use serde::Serialize;
use std::fmt::Write;

use crate::scale::{BandScale, LinearScale};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height_per_bar: f64,
    pub margin: Margin,
    pub padding_inner: f64,
    /// Bars narrower than this get their label placed outside the bar.
    pub short_bar_threshold: f64,
    pub fill: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height_per_bar: 32.0,
            margin: Margin::uniform(5.0),
            padding_inner: 0.05,
            short_bar_threshold: 100.0,
            fill: "rebeccapurple".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub dx: &'static str,
    pub dy: &'static str,
    pub anchor: TextAnchor,
    pub fill: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub bars: Vec<Bar>,
    pub labels: Vec<Label>,
}

/// Text shown for a dimension: its only aspect, or a count when the
/// dimension summarizes several.
pub fn dimension_label(dimension: &Dimension) -> String {
    match dimension.aspects.as_slice() {
        [] => String::new(),
        [single] => single.clone(),
        many => format!("{} other", many.len()),
    }
}

pub fn layout_bar_chart(space: &AspectSpace, config: &ChartConfig) -> BarChart {
    let dimensions = &space.dimensions;
    let height = config.height_per_bar * dimensions.len() as f64;

    let mut chart = BarChart {
        width: config.width,
        height,
        fill: config.fill.clone(),
        bars: Vec::with_capacity(dimensions.len()),
        labels: Vec::with_capacity(dimensions.len()),
    };
    if dimensions.is_empty() {
        return chart;
    }

    let max_weight = dimensions
        .iter()
        .map(|d| d.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    let x = LinearScale::new(
        (0.0, max_weight),
        (config.margin.left, config.width - config.margin.right),
    );
    let y = BandScale::new(
        dimensions.len(),
        (config.margin.top, height - config.margin.bottom),
        config.padding_inner,
        0.0,
        true,
    );
    let x0 = x.scale(0.0);

    for (i, dimension) in dimensions.iter().enumerate() {
        let top = y.position(i).unwrap_or_default();
        let bar_width = x.scale(dimension.weight) - x0;
        let short = bar_width < config.short_bar_threshold;

        chart.bars.push(Bar {
            x: x0,
            y: top,
            width: bar_width,
            height: y.bandwidth(),
        });
        chart.labels.push(Label {
            x: bar_width,
            y: top + (y.bandwidth() - 1.0) / 2.0,
            dx: if short { ".6em" } else { "0" },
            dy: ".35em",
            anchor: if short { TextAnchor::Start } else { TextAnchor::End },
            fill: if short { "black" } else { "white" },
            text: dimension_label(dimension),
        });
    }

    chart
}

impl BarChart {
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
            num(self.width),
            num(self.height)
        );
        svg.push_str("<g>\n");
        for bar in &self.bars {
            let _ = writeln!(
                svg,
                r#"<rect fill="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
                escape(&self.fill),
                num(bar.x),
                num(bar.y),
                num(bar.width),
                num(bar.height)
            );
        }
        for label in &self.labels {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" dx="{}" dy="{}" text-anchor="{}" fill="{}">{}</text>"#,
                num(label.x),
                num(label.y),
                label.dx,
                label.dy,
                label.anchor.as_str(),
                label.fill,
                escape(&label.text)
            );
        }
        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimension(weight: f64, aspects: &[&str]) -> Dimension {
        Dimension {
            weight,
            aspects: aspects.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn space() -> AspectSpace {
        AspectSpace {
            dimensions: vec![
                dimension(2.0, &["cost"]),
                dimension(1.0, &["safety"]),
                dimension(0.1, &["waste", "jobs", "climate"]),
            ],
        }
    }

    #[test]
    fn test_layout_dimensions() {
        let chart = layout_bar_chart(&space(), &ChartConfig::default());
        assert_eq!(chart.height, 96.0);
        assert_eq!(chart.bars.len(), 3);
        assert_eq!(chart.labels.len(), 3);

        // x maps [0, 2] onto [5, 995]
        assert_eq!(chart.bars[0].x, 5.0);
        assert_eq!(chart.bars[0].width, 990.0);
        assert_eq!(chart.bars[1].width, 495.0);
        assert!((chart.bars[2].width - 49.5).abs() < 1e-9);

        assert_eq!(chart.bars[0].y, 5.0);
        assert_eq!(chart.bars[1].y, 34.0);
        assert_eq!(chart.bars[0].height, 28.0);
        assert_eq!(chart.labels[0].y, 5.0 + 13.5);
    }

    #[test]
    fn test_label_placement() {
        let chart = layout_bar_chart(&space(), &ChartConfig::default());

        let long = &chart.labels[0];
        assert_eq!(long.text, "cost");
        assert_eq!(long.anchor, TextAnchor::End);
        assert_eq!(long.fill, "white");
        assert_eq!(long.dx, "0");
        assert_eq!(long.x, 990.0);

        let short = &chart.labels[2];
        assert_eq!(short.text, "3 other");
        assert_eq!(short.anchor, TextAnchor::Start);
        assert_eq!(short.fill, "black");
        assert_eq!(short.dx, ".6em");
    }

    #[test]
    fn test_empty_space() {
        let chart = layout_bar_chart(&AspectSpace::default(), &ChartConfig::default());
        assert_eq!(chart.height, 0.0);
        assert!(chart.bars.is_empty());
        assert!(chart.to_svg().contains(r#"viewBox="0 0 1000 0""#));
    }

    #[test]
    fn test_dimension_label() {
        assert_eq!(dimension_label(&dimension(1.0, &[])), "");
        assert_eq!(dimension_label(&dimension(1.0, &["cost"])), "cost");
        assert_eq!(dimension_label(&dimension(1.0, &["a", "b"])), "2 other");
    }

    #[test]
    fn test_svg_output() {
        let space = AspectSpace {
            dimensions: vec![dimension(1.0, &["r&d <costs>"])],
        };
        let svg = layout_bar_chart(&space, &ChartConfig::default()).to_svg();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1000 32">"#));
        assert!(svg.contains(r#"<rect fill="rebeccapurple" x="5" y="6" width="990" height="21"/>"#));
        assert!(svg.contains("r&amp;d &lt;costs&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
