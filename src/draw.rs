use crate::coord::{format_number, nice_ticks};
use crate::error::{render_err, PlotResult};
use crate::figure::{BoxLayer, Figure, Layer, Marker, SeriesLayer};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::ops::Range;

const FONT: &str = "sans-serif";
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;
const MARKER_SIZE: i32 = 5;
const MEDIAN_COLOR: RGBColor = RGBColor(255, 127, 14);
const Y_TICKS: usize = 10;

type FigureChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<TickAxis, TickAxis>>;

/// A linear f64 axis whose grid lines and labels sit at the given positions.
#[derive(Debug, Clone)]
pub struct TickAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl TickAxis {
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> TickAxis {
        let ticks = ticks
            .into_iter()
            .filter(|t| *t >= range.start && *t <= range.end)
            .collect();
        TickAxis { range, ticks }
    }
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        // halved so that spans close to f64::MAX stay finite
        let span = self.range.end / 2. - self.range.start / 2.;
        if !(span > 0.) || !value.is_finite() {
            return limit.0 + (limit.1 - limit.0) / 2;
        }
        let ratio = (value / 2. - self.range.start / 2.) / span;
        let pixels = ((limit.1 - limit.0) as f64 * ratio + 1e-3).floor();
        limit.0.saturating_add(pixels as i32)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() || hint.max_num_points() == 0 {
            return Vec::new();
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

/// Text can only be drawn at quarter turns: the nearest one to `degrees`,
/// counter-clockwise.
pub fn label_transform(degrees: f64) -> FontTransform {
    let quarters = (degrees / 90.).round().rem_euclid(4.) as u8;
    match quarters {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

/// Draws the whole figure on `root`; the caller presents the drawing area.
pub fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> PlotResult<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let bounds = figure.bounds();
    let ticks = figure.x_ticks();
    let rotation = label_transform(figure.tick_rotation());
    let vertical = matches!(rotation, FontTransform::Rotate90 | FontTransform::Rotate270);
    let longest = ticks
        .iter()
        .map(|(_, l)| l.chars().count())
        .max()
        .unwrap_or(0) as u32;
    let x_area: u32 = if vertical { 60 + 12 * longest } else { 70 };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(x_area)
        .y_label_area_size(100);
    if !figure.title().is_empty() {
        builder.caption(figure.title(), (FONT, 32));
    }
    let x_axis = TickAxis::new(
        bounds.x.0..bounds.x.1,
        ticks.iter().map(|(p, _)| *p).collect(),
    );
    let y_axis = TickAxis::new(
        bounds.y.0..bounds.y.1,
        nice_ticks(bounds.y.0, bounds.y.1, Y_TICKS),
    );
    let mut chart = builder
        .build_cartesian_2d(x_axis, y_axis)
        .map_err(render_err)?;

    let x_formatter = |x: &f64| {
        ticks
            .iter()
            .find(|(p, _)| (p - x).abs() < 1e-9)
            .map(|(_, l)| l.clone())
            .unwrap_or_else(|| format_number(*x))
    };
    let y_formatter = |y: &f64| format_number(*y);
    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(220, 220, 220).stroke_width(1))
        .set_all_tick_mark_size(4)
        .x_labels(ticks.len().max(1))
        .y_labels(Y_TICKS)
        .x_label_style((FONT, 20).into_font().transform(rotation))
        .y_label_style((FONT, 20))
        .axis_desc_style((FONT, 24))
        .x_desc(figure.x_label())
        .y_desc(figure.y_label())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(render_err)?;

    for layer in figure.layers() {
        match layer {
            Layer::Series(s) => draw_series(&mut chart, s)?,
            Layer::Boxes(b) => draw_boxes(&mut chart, b)?,
        }
    }

    if !figure.legend_labels().is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((FONT, 20))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    chart: &mut FigureChart<'_, DB>,
    layer: &SeriesLayer,
) -> PlotResult<()> {
    match layer.marker {
        Marker::Line => {
            let style = layer.color.stroke_width(2);
            let mut segments = finite_segments(&layer.x, &layer.y);
            if segments.is_empty() {
                // keeps the legend entry of a series with nothing to draw
                segments.push(Vec::new());
            }
            for (i, segment) in segments.into_iter().enumerate() {
                let anno = chart
                    .draw_series(LineSeries::new(segment, style))
                    .map_err(render_err)?;
                if let (0, Some(label)) = (i, &layer.label) {
                    anno.label(label)
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                }
            }
        }
        Marker::Point => {
            let style = layer.color.filled();
            let points: Vec<(f64, f64)> = finite_segments(&layer.x, &layer.y)
                .into_iter()
                .flatten()
                .collect();
            let anno = chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, MARKER_SIZE, style)))
                .map_err(render_err)?;
            if let Some(label) = &layer.label {
                anno.label(label)
                    .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE, style));
            }
        }
    }
    Ok(())
}

fn draw_boxes<DB: DrawingBackend>(
    chart: &mut FigureChart<'_, DB>,
    layer: &BoxLayer,
) -> PlotResult<()> {
    let outline = BLACK.stroke_width(2);
    let median = MEDIAN_COLOR.stroke_width(3);
    for (i, stats) in layer.boxes.iter().enumerate() {
        let stats = match stats {
            Some(s) => s,
            None => continue,
        };
        let x = BoxLayer::position(i);
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                outline,
            )))
            .map_err(render_err)?;
        let whiskers = vec![
            vec![(x, stats.q1), (x, stats.whisker_low)],
            vec![(x, stats.q3), (x, stats.whisker_high)],
            vec![
                (x - CAP_HALF_WIDTH, stats.whisker_low),
                (x + CAP_HALF_WIDTH, stats.whisker_low),
            ],
            vec![
                (x - CAP_HALF_WIDTH, stats.whisker_high),
                (x + CAP_HALF_WIDTH, stats.whisker_high),
            ],
        ];
        chart
            .draw_series(whiskers.into_iter().map(|p| PathElement::new(p, outline)))
            .map_err(render_err)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(left, stats.median), (right, stats.median)],
                median,
            )))
            .map_err(render_err)?;
    }
    chart
        .draw_series(
            layer
                .visible_outliers()
                .into_iter()
                .map(|p| Circle::new(p, MARKER_SIZE, BLACK.stroke_width(1))),
        )
        .map_err(render_err)?;
    Ok(())
}

/// Runs of consecutive points with finite coordinates, in input order.
fn finite_segments(x: &[f64], y: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&px, &py) in x.iter().zip(y.iter()) {
        if px.is_finite() && py.is_finite() {
            current.push((px, py));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::coord::ranged1d::{BoldPoints, LightPoints};

    #[test]
    fn missing_readings_split_the_line() {
        let x = [1., 2., 3., 4., 5.];
        let y = [10., f64::NAN, 12., 13., f64::NAN];
        assert_eq!(
            finite_segments(&x, &y),
            vec![vec![(1., 10.)], vec![(3., 12.), (4., 13.)]]
        );
        assert!(finite_segments(&[], &[]).is_empty());
    }

    #[test]
    fn tick_axis_places_category_ticks() {
        let axis = TickAxis::new(0.5..3.5, vec![0., 1., 2., 3.]);
        assert_eq!(axis.key_points(BoldPoints(10)), vec![1., 2., 3.]);
        assert!(axis.key_points(LightPoints::new(10, 50)).is_empty());
        assert_eq!(axis.map(&0.5, (0, 300)), 0);
        assert_eq!(axis.map(&2., (0, 300)), 150);
        assert_eq!(axis.map(&3.5, (0, 300)), 300);
        assert!(axis.key_points(BoldPoints(0)).is_empty());
    }

    #[test]
    fn tick_axis_maps_huge_spans() {
        let axis = TickAxis::new(f64::MIN..f64::MAX, vec![0.]);
        assert_eq!(axis.map(&0., (0, 1000)), 500);
        assert_eq!(axis.map(&f64::MAX, (0, 1000)), 1000);
        // y axes run bottom to top
        assert_eq!(axis.map(&f64::MIN, (800, 0)), 800);
    }

    #[test]
    fn rotation_snaps_to_quarter_turns() {
        assert!(matches!(label_transform(0.), FontTransform::None));
        assert!(matches!(label_transform(30.), FontTransform::None));
        assert!(matches!(label_transform(60.), FontTransform::Rotate270));
        assert!(matches!(label_transform(90.), FontTransform::Rotate270));
        assert!(matches!(label_transform(-90.), FontTransform::Rotate90));
        assert!(matches!(label_transform(180.), FontTransform::Rotate180));
        assert!(matches!(label_transform(360.), FontTransform::None));
    }
}
