use crate::coord::{AxisKind, XValue};
use crate::display::{SystemViewer, Viewer};
use crate::error::{PlotError, PlotResult};
use crate::figure::{BoxLayer, Figure, FigureHandle, Marker, SeriesLayer};
use crate::options::PlotOptions;
use crate::save::{check_format, save_figure};
use crate::stats::BoxStats;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Scatter,
    Box,
}

/// The data of one chart, for callers that pick the chart kind at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRequest {
    Line { x: Vec<XValue>, y: Vec<f64> },
    Scatter { x: Vec<XValue>, y: Vec<f64> },
    Box { groups: Vec<Vec<f64>> },
}

impl ChartRequest {
    pub fn line<X: Into<XValue>>(
        x: impl IntoIterator<Item = X>,
        y: impl IntoIterator<Item = f64>,
    ) -> ChartRequest {
        ChartRequest::Line {
            x: x.into_iter().map(Into::into).collect(),
            y: y.into_iter().collect(),
        }
    }

    pub fn scatter<X: Into<XValue>>(
        x: impl IntoIterator<Item = X>,
        y: impl IntoIterator<Item = f64>,
    ) -> ChartRequest {
        ChartRequest::Scatter {
            x: x.into_iter().map(Into::into).collect(),
            y: y.into_iter().collect(),
        }
    }

    pub fn boxes(groups: Vec<Vec<f64>>) -> ChartRequest {
        ChartRequest::Box { groups }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartRequest::Line { .. } => ChartKind::Line,
            ChartRequest::Scatter { .. } => ChartKind::Scatter,
            ChartRequest::Box { .. } => ChartKind::Box,
        }
    }
}

/// Draws line, scatter and box charts.
///
/// Whether figures can be shown is decided at construction: a headless
/// renderer skips `show` requests, an interactive one hands the figure to its
/// viewer and reports when no display can be reached.
pub struct ChartRenderer {
    viewer: Option<Box<dyn Viewer>>,
}

impl std::fmt::Debug for ChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRenderer")
            .field("interactive", &self.interactive_display_available())
            .finish()
    }
}

impl ChartRenderer {
    pub fn headless() -> ChartRenderer {
        ChartRenderer { viewer: None }
    }

    /// Shows figures in the system image viewer.
    pub fn interactive() -> ChartRenderer {
        ChartRenderer::with_viewer(SystemViewer)
    }

    pub fn with_viewer(viewer: impl Viewer + 'static) -> ChartRenderer {
        ChartRenderer {
            viewer: Some(Box::new(viewer)),
        }
    }

    pub fn interactive_display_available(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn render(&self, request: &ChartRequest, options: &PlotOptions) -> PlotResult<FigureHandle> {
        match request {
            ChartRequest::Line { x, y } => self.render_series(Marker::Line, x, y, options),
            ChartRequest::Scatter { x, y } => self.render_series(Marker::Point, x, y, options),
            ChartRequest::Box { groups } => self.render_box(groups, options),
        }
    }

    /// Connects the (x, y) points in the given order.
    pub fn render_line<X: Into<XValue> + Copy>(
        &self,
        x: &[X],
        y: &[f64],
        options: &PlotOptions,
    ) -> PlotResult<FigureHandle> {
        let x: Vec<XValue> = x.iter().map(|v| (*v).into()).collect();
        self.render_series(Marker::Line, &x, y, options)
    }

    /// Draws a marker at each (x, y) point and rotates the x tick labels.
    pub fn render_scatter<X: Into<XValue> + Copy>(
        &self,
        x: &[X],
        y: &[f64],
        options: &PlotOptions,
    ) -> PlotResult<FigureHandle> {
        let x: Vec<XValue> = x.iter().map(|v| (*v).into()).collect();
        self.render_series(Marker::Point, &x, y, options)
    }

    /// Draws one box-and-whisker summary per group, at x = 1, 2, ...
    pub fn render_box<G: AsRef<[f64]>>(
        &self,
        groups: &[G],
        options: &PlotOptions,
    ) -> PlotResult<FigureHandle> {
        if groups.is_empty() {
            return Err(PlotError::invalid("groups", "at least one group is required"));
        }
        let labels = match &options.category_labels {
            Some(labels) if labels.len() != groups.len() => {
                return Err(PlotError::invalid(
                    "category_labels",
                    format!("{} labels given for {} groups", labels.len(), groups.len()),
                ))
            }
            Some(labels) => labels.clone(),
            None => (0..groups.len()).map(|i| i.to_string()).collect(),
        };
        check_save_path(options)?;

        self.draw_on(options, |figure| {
            figure.check_x_kind(AxisKind::Numeric)?;
            let boxes: Vec<Option<BoxStats>> = groups
                .iter()
                .enumerate()
                .map(|(i, g)| {
                    let stats = BoxStats::from_values(g.as_ref());
                    if stats.is_none() {
                        debug!(group = i, "no values in group, no box drawn");
                    }
                    stats
                })
                .collect();
            debug!(
                groups = boxes.len(),
                show_outliers = options.show_outliers,
                "drawing boxes"
            );
            figure.set_text(&options.title, &options.x_label, &options.y_label);
            figure.set_tick_rotation(options.tick_rotation);
            figure.push_boxes(
                BoxLayer {
                    boxes,
                    show_outliers: options.show_outliers,
                },
                labels,
            );
            Ok(())
        })
    }

    fn render_series(
        &self,
        marker: Marker,
        x: &[XValue],
        y: &[f64],
        options: &PlotOptions,
    ) -> PlotResult<FigureHandle> {
        if x.len() != y.len() {
            return Err(PlotError::invalid(
                "y",
                format!("x has {} values but y has {}", x.len(), y.len()),
            ));
        }
        let kind = series_kind(x)?;
        check_save_path(options)?;

        self.draw_on(options, |figure| {
            if let Some(kind) = kind {
                figure.check_x_kind(kind)?;
            }
            let kind = kind.unwrap_or_else(|| figure.x_kind());
            debug!(
                ?marker,
                points = y.len(),
                label = ?options.plot_label,
                "drawing series"
            );
            figure.set_text(&options.title, &options.x_label, &options.y_label);
            if marker == Marker::Point {
                figure.set_tick_rotation(options.tick_rotation);
            }
            let layer = SeriesLayer {
                marker,
                x: x.iter().map(XValue::position).collect(),
                y: y.to_vec(),
                label: options.plot_label.clone(),
                color: figure.next_color(),
            };
            figure.push_series(kind, layer);
            Ok(())
        })
    }

    /// Draws on a copy of the reused figure, or on a new one, and hands the
    /// result back only once saving and showing it succeeded: a failed call
    /// leaves a reused figure as it was.
    fn draw_on(
        &self,
        options: &PlotOptions,
        draw: impl FnOnce(&mut Figure) -> PlotResult<()>,
    ) -> PlotResult<FigureHandle> {
        let mut figure = match &options.reuse_handle {
            Some(handle) => handle.figure_mut()?.clone(),
            None => Figure::new(options.figure_size),
        };
        draw(&mut figure)?;
        self.finish(&figure, options)?;
        match &options.reuse_handle {
            Some(handle) => {
                *handle.figure_mut()? = figure;
                Ok(handle.clone())
            }
            None => Ok(FigureHandle::new(figure)),
        }
    }

    /// Saves, then shows the figure as the options ask.
    fn finish(&self, figure: &Figure, options: &PlotOptions) -> PlotResult<()> {
        if let Some(path) = &options.save_path {
            save_figure(figure, path)?;
        }
        if options.show {
            match &self.viewer {
                Some(viewer) => viewer.show(figure)?,
                None => debug!("headless renderer, figure not shown"),
            }
        }
        Ok(())
    }
}

fn check_save_path(options: &PlotOptions) -> PlotResult<()> {
    match &options.save_path {
        Some(path) => check_format(path).map(|_| ()),
        None => Ok(()),
    }
}

/// The axis kind shared by all x values, `None` when there are none.
fn series_kind(x: &[XValue]) -> PlotResult<Option<AxisKind>> {
    let kind = match x.first() {
        Some(v) => v.kind(),
        None => return Ok(None),
    };
    if x.iter().any(|v| v.kind() != kind) {
        return Err(PlotError::invalid("x", "mixes numbers and dates"));
    }
    Ok(Some(kind))
}
