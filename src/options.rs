use crate::figure::FigureHandle;
use std::path::PathBuf;

/// Pixel size of a newly created figure.
pub const DEFAULT_FIGURE_SIZE: (u32, u32) = (1280, 960);

/// Options shared by the three chart kinds.
///
/// Options that do not apply to a chart kind are ignored by it:
/// `plot_label` only affects line and scatter plots, `show_outliers` and
/// `category_labels` only box plots, and `tick_rotation` only scatter and box plots.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry for the drawn series, none when absent.
    pub plot_label: Option<String>,
    /// Display the figure once drawn (and saved).
    pub show: bool,
    /// Output image, the format follows the extension.
    pub save_path: Option<PathBuf>,
    /// Figure returned by an earlier call to draw onto instead of a new one.
    pub reuse_handle: Option<FigureHandle>,
    /// Rotation of the x tick labels in degrees, counter-clockwise.
    pub tick_rotation: f64,
    pub show_outliers: bool,
    /// One label per box, zero-based positions when absent.
    pub category_labels: Option<Vec<String>>,
    pub figure_size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            plot_label: None,
            show: true,
            save_path: None,
            reuse_handle: None,
            tick_rotation: 0.,
            show_outliers: true,
            category_labels: None,
            figure_size: DEFAULT_FIGURE_SIZE,
        }
    }
}

impl PlotOptions {
    pub fn new() -> PlotOptions {
        PlotOptions::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn x_label(mut self, x_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self
    }

    pub fn y_label(mut self, y_label: impl Into<String>) -> Self {
        self.y_label = y_label.into();
        self
    }

    pub fn plot_label(mut self, label: impl Into<String>) -> Self {
        self.plot_label = Some(label.into());
        self
    }

    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn reuse(mut self, handle: &FigureHandle) -> Self {
        self.reuse_handle = Some(handle.clone());
        self
    }

    pub fn tick_rotation(mut self, degrees: f64) -> Self {
        self.tick_rotation = degrees;
        self
    }

    pub fn show_outliers(mut self, show_outliers: bool) -> Self {
        self.show_outliers = show_outliers;
        self
    }

    pub fn category_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.category_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_size = (width, height);
        self
    }
}
