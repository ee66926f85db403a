use crate::coord::{format_x_tick, nice_ticks, AxisKind};
use crate::error::{PlotError, PlotResult};
use crate::min_and_max;
use crate::stats::BoxStats;
use plotters::style::RGBColor;
use std::cell::{Ref, RefCell, RefMut};
use std::path::Path;
use std::rc::Rc;

/// Colors cycled through by successive line and scatter layers of a figure.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const X_TICKS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Line,
    Point,
}

/// A line or scatter series, x already mapped to axis positions.
#[derive(Debug, Clone)]
pub struct SeriesLayer {
    pub marker: Marker,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Option<String>,
    pub color: RGBColor,
}

/// One box per group, the i-th box centered at x = i + 1.
/// Empty groups have no summary and draw nothing.
#[derive(Debug, Clone)]
pub struct BoxLayer {
    pub boxes: Vec<Option<BoxStats>>,
    pub show_outliers: bool,
}

impl BoxLayer {
    pub fn position(index: usize) -> f64 {
        (index + 1) as f64
    }

    /// Outlier markers that are actually drawn, as (x, y) points.
    pub fn visible_outliers(&self) -> Vec<(f64, f64)> {
        if !self.show_outliers {
            return Vec::new();
        }
        self.boxes
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (i, b)))
            .flat_map(|(i, b)| b.outliers.iter().map(move |&o| (BoxLayer::position(i), o)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum Layer {
    Series(SeriesLayer),
    Boxes(BoxLayer),
}

/// Data ranges of a figure, margins included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Everything drawn so far on one set of axes.
///
/// A figure is only rasterized when it is saved or shown, so layers added by
/// later calls end up in the same image as the earlier ones.
#[derive(Debug, Clone)]
pub struct Figure {
    size: (u32, u32),
    title: String,
    x_label: String,
    y_label: String,
    x_kind: Option<AxisKind>,
    tick_rotation: f64,
    category_ticks: Option<Vec<(f64, String)>>,
    layers: Vec<Layer>,
}

impl Figure {
    pub fn new(size: (u32, u32)) -> Figure {
        Figure {
            size,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_kind: None,
            tick_rotation: 0.,
            category_ticks: None,
            layers: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn x_kind(&self) -> AxisKind {
        self.x_kind.unwrap_or(AxisKind::Numeric)
    }

    /// Requested rotation of the x tick labels, in degrees.
    pub fn tick_rotation(&self) -> f64 {
        self.tick_rotation
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn series(&self) -> impl Iterator<Item = &SeriesLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Series(s) => Some(s),
            Layer::Boxes(_) => None,
        })
    }

    pub fn box_layers(&self) -> impl Iterator<Item = &BoxLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Boxes(b) => Some(b),
            Layer::Series(_) => None,
        })
    }

    /// Labels of the legend, in drawing order; no legend is drawn when empty.
    pub fn legend_labels(&self) -> Vec<&str> {
        self.series().filter_map(|s| s.label.as_deref()).collect()
    }

    /// Every outlier marker drawn on the figure.
    pub fn outlier_markers(&self) -> Vec<(f64, f64)> {
        self.box_layers().flat_map(|b| b.visible_outliers()).collect()
    }

    pub(crate) fn next_color(&self) -> RGBColor {
        PALETTE[self.series().count() % PALETTE.len()]
    }

    /// Fails when data of another axis kind was drawn before.
    pub(crate) fn check_x_kind(&self, kind: AxisKind) -> PlotResult<()> {
        match self.x_kind {
            Some(current) if current != kind => Err(PlotError::invalid(
                "x",
                format!(
                    "{:?} x values cannot be drawn on the {:?} x axis of the reused figure",
                    kind, current
                ),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn set_text(&mut self, title: &str, x_label: &str, y_label: &str) {
        self.title = title.to_string();
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
    }

    pub(crate) fn set_tick_rotation(&mut self, degrees: f64) {
        self.tick_rotation = degrees;
    }

    pub(crate) fn push_series(&mut self, kind: AxisKind, layer: SeriesLayer) {
        self.x_kind = Some(kind);
        self.layers.push(Layer::Series(layer));
    }

    pub(crate) fn push_boxes(&mut self, layer: BoxLayer, labels: Vec<String>) {
        self.x_kind = Some(AxisKind::Numeric);
        self.category_ticks = Some(
            labels
                .into_iter()
                .enumerate()
                .map(|(i, l)| (BoxLayer::position(i), l))
                .collect(),
        );
        self.layers.push(Layer::Boxes(layer));
    }

    pub fn bounds(&self) -> Bounds {
        let series_x = min_and_max(
            self.series()
                .flat_map(|s| s.x.iter().copied())
                .filter(|v| v.is_finite()),
        )
        .map(|(min, max)| pad(min, max, 20.));
        let boxes_x = self
            .box_layers()
            .map(|b| b.boxes.len())
            .max()
            .map(|n| (0.5, n as f64 + 0.5));
        let x = union(series_x, boxes_x).unwrap_or((0., 1.));

        let series_y = self
            .series()
            .flat_map(|s| s.y.iter().copied())
            .filter(|v| v.is_finite());
        let boxes_y = self.box_layers().flat_map(|b| {
            b.boxes
                .iter()
                .flatten()
                .flat_map(move |s| {
                    let (low, high) = s.extent(b.show_outliers);
                    vec![low, high]
                })
        });
        let y = min_and_max(series_y.chain(boxes_y))
            .map(|(min, max)| pad(min, max, 10.))
            .unwrap_or((0., 1.));
        Bounds { x, y }
    }

    /// Tick positions and labels of the x axis.
    pub fn x_ticks(&self) -> Vec<(f64, String)> {
        if let Some(ticks) = &self.category_ticks {
            return ticks.clone();
        }
        let (min, max) = self.bounds().x;
        let kind = self.x_kind();
        nice_ticks(min, max, X_TICKS)
            .into_iter()
            .map(|t| (t, format_x_tick(kind, t, max - min)))
            .collect()
    }
}

/// Widens a range by span / `divisor` on each side, or by one unit when flat.
/// The result never leaves the finite f64 range.
fn pad(min: f64, max: f64, divisor: f64) -> (f64, f64) {
    let margin = if max > min {
        max / divisor - min / divisor
    } else {
        1.
    };
    (
        (min - margin).max(f64::MIN),
        (max + margin).min(f64::MAX),
    )
}

fn union(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Caller-owned handle to a figure, passed back through
/// `PlotOptions::reuse_handle` to draw more data on the same axes.
///
/// The handle is single-threaded and not locked: one render call at a time.
#[derive(Debug, Clone)]
pub struct FigureHandle(Rc<RefCell<Figure>>);

impl FigureHandle {
    pub fn new(figure: Figure) -> FigureHandle {
        FigureHandle(Rc::new(RefCell::new(figure)))
    }

    /// Read access to the figure.
    ///
    /// Panics if called while a render call is drawing on this figure.
    pub fn figure(&self) -> Ref<'_, Figure> {
        self.0.borrow()
    }

    pub(crate) fn figure_mut(&self) -> PlotResult<RefMut<'_, Figure>> {
        self.0
            .try_borrow_mut()
            .map_err(|_| PlotError::invalid("reuse_handle", "figure is already being drawn on"))
    }

    /// True when both handles refer to the same figure.
    pub fn same_figure(&self, other: &FigureHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn legend_labels(&self) -> Vec<String> {
        self.figure()
            .legend_labels()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Writes the figure as it is now, same contract as `PlotOptions::save_path`.
    pub fn save(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        crate::save::save_figure(&self.figure(), path.as_ref())
    }
}
