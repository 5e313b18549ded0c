//! Bar, pie and grouped-bar charts drawn as proportional text bars.

use std::fmt::Write as _;

use serde::Serialize;

use crate::store::Frame;

/// Glyph used to draw bars.
const BAR_GLYPH: &str = "█";

/// The three chart kinds used on the overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One bar per category.
    Bar,
    /// Share of the total per category.
    Pie,
    /// Bars per category, split by a second grouping column.
    GroupedBar,
}

/// How to read a chart out of a result frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    /// Chart kind.
    pub kind: ChartKind,
    /// Chart title.
    pub title: &'static str,
    /// Column providing category labels.
    pub label_column: &'static str,
    /// Column splitting categories into groups (grouped bar only).
    pub group_column: Option<&'static str>,
    /// Column providing the plotted value.
    pub value_column: &'static str,
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Category label.
    pub label: String,
    /// Group within the category, for grouped bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Plotted value.
    pub value: f64,
}

/// A chart ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Chart kind.
    pub kind: ChartKind,
    /// Chart title.
    pub title: String,
    /// Points in frame order.
    pub points: Vec<Point>,
}

impl Chart {
    /// Build a chart from `frame` following `spec`.
    ///
    /// Returns `None` when the frame is empty or lacks a required column.
    /// Rows whose value is not numeric are skipped.
    #[must_use]
    pub fn from_frame(spec: &ChartSpec, frame: &Frame) -> Option<Self> {
        if frame.is_empty() {
            return None;
        }
        let label_idx = frame.column_index(spec.label_column)?;
        let value_idx = frame.column_index(spec.value_column)?;
        let group_idx = match spec.group_column {
            Some(name) => Some(frame.column_index(name)?),
            None => None,
        };

        let points = frame
            .rows()
            .iter()
            .filter_map(|row| {
                Some(Point {
                    label: row[label_idx].to_string(),
                    group: group_idx.map(|i| row[i].to_string()),
                    value: row[value_idx].as_f64()?,
                })
            })
            .collect();

        Some(Self {
            kind: spec.kind,
            title: spec.title.to_string(),
            points,
        })
    }

    /// Draw the chart; the largest bar is `width` glyphs long.
    #[must_use]
    pub fn render_text(&self, width: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        match self.kind {
            ChartKind::Bar => self.render_bars(&mut out, width),
            ChartKind::Pie => self.render_pie(&mut out, width),
            ChartKind::GroupedBar => self.render_grouped(&mut out, width),
        }
        out
    }

    fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    fn render_bars(&self, out: &mut String, width: usize) {
        let max = self.max_value();
        let label_width = label_width(self.points.iter().map(|p| p.label.as_str()));
        for point in &self.points {
            let _ = writeln!(
                out,
                "  {:<label_width$} │{} {}",
                point.label,
                bar(point.value, max, width),
                format_value(point.value)
            );
        }
    }

    fn render_pie(&self, out: &mut String, width: usize) {
        let total: f64 = self.points.iter().map(|p| p.value).sum();
        let label_width = label_width(self.points.iter().map(|p| p.label.as_str()));
        for point in &self.points {
            let share = if total > 0.0 { point.value / total } else { 0.0 };
            let _ = writeln!(
                out,
                "  {:<label_width$} │{} {:.1}% ({})",
                point.label,
                bar(share, 1.0, width),
                share * 100.0,
                format_value(point.value)
            );
        }
    }

    fn render_grouped(&self, out: &mut String, width: usize) {
        let max = self.max_value();
        let group_width = label_width(self.points.iter().filter_map(|p| p.group.as_deref()));
        let mut current: Option<&str> = None;
        for point in &self.points {
            if current != Some(point.label.as_str()) {
                let _ = writeln!(out, "  {}", point.label);
                current = Some(point.label.as_str());
            }
            let _ = writeln!(
                out,
                "    {:<group_width$} │{} {}",
                point.group.as_deref().unwrap_or_default(),
                bar(point.value, max, width),
                format_value(point.value)
            );
        }
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round().max(1.0) as usize;
    BAR_GLYPH.repeat(len.min(width))
}

#[allow(clippy::cast_possible_truncation)]
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Cell;

    const BAR_SPEC: ChartSpec = ChartSpec {
        kind: ChartKind::Bar,
        title: "Violation Types",
        label_column: "violation",
        group_column: None,
        value_column: "count",
    };

    fn counts_frame() -> Frame {
        Frame::new(
            vec!["violation".to_string(), "count".to_string()],
            vec![
                vec![Cell::from("Speeding"), Cell::from(4)],
                vec![Cell::from("DUI"), Cell::from(2)],
            ],
        )
    }

    #[test]
    fn test_from_frame_bar() {
        let chart = Chart::from_frame(&BAR_SPEC, &counts_frame()).unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].label, "Speeding");
        assert!((chart.points[0].value - 4.0).abs() < f64::EPSILON);
        assert!(chart.points[0].group.is_none());
    }

    #[test]
    fn test_from_frame_missing_column() {
        let spec = ChartSpec {
            value_column: "stop_count",
            ..BAR_SPEC
        };
        assert!(Chart::from_frame(&spec, &counts_frame()).is_none());
    }

    #[test]
    fn test_from_frame_empty() {
        assert!(Chart::from_frame(&BAR_SPEC, &Frame::empty()).is_none());
    }

    #[test]
    fn test_bar_render_is_proportional() {
        let chart = Chart::from_frame(&BAR_SPEC, &counts_frame()).unwrap();
        let text = chart.render_text(10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Violation Types");
        assert_eq!(lines[1].matches(BAR_GLYPH).count(), 10);
        assert_eq!(lines[2].matches(BAR_GLYPH).count(), 5);
        assert!(lines[1].ends_with(" 4"));
    }

    #[test]
    fn test_pie_render_shares() {
        let frame = Frame::new(
            vec!["gender".to_string(), "count".to_string()],
            vec![
                vec![Cell::from("M"), Cell::from(3)],
                vec![Cell::from("F"), Cell::from(1)],
            ],
        );
        let spec = ChartSpec {
            kind: ChartKind::Pie,
            title: "Driver Gender",
            label_column: "gender",
            group_column: None,
            value_column: "count",
        };
        let text = Chart::from_frame(&spec, &frame).unwrap().render_text(20);
        assert!(text.contains("75.0% (3)"));
        assert!(text.contains("25.0% (1)"));
    }

    #[test]
    fn test_grouped_render_headers_once_per_label() {
        let frame = Frame::new(
            vec![
                "country_name".to_string(),
                "drugs_related".to_string(),
                "count".to_string(),
            ],
            vec![
                vec![Cell::from("India"), Cell::from("No"), Cell::from(3)],
                vec![Cell::from("India"), Cell::from("Yes"), Cell::from(1)],
                vec![Cell::from("USA"), Cell::from("No"), Cell::from(2)],
            ],
        );
        let spec = ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Drugs",
            label_column: "country_name",
            group_column: Some("drugs_related"),
            value_column: "count",
        };
        let chart = Chart::from_frame(&spec, &frame).unwrap();
        assert_eq!(chart.points[1].group.as_deref(), Some("Yes"));

        let text = chart.render_text(12);
        assert_eq!(text.matches("  India\n").count(), 1);
        assert_eq!(text.matches("  USA\n").count(), 1);
    }

    #[test]
    fn test_bar_helper() {
        assert_eq!(bar(0.0, 10.0, 10), "");
        assert_eq!(bar(5.0, 0.0, 10), "");
        // Tiny non-zero values still get one glyph.
        assert_eq!(bar(0.01, 100.0, 10), BAR_GLYPH);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(33.333), "33.33");
    }
}
