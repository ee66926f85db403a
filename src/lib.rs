//! Line, scatter and box plots of air-quality measurements.
//!
//! The three chart kinds share one set of options, see [`PlotOptions`], and
//! return a [`FigureHandle`] that can be passed back to draw more data on the
//! same axes.
pub mod coord;
pub mod display;
pub mod draw;
pub mod error;
pub mod figure;
pub mod options;
pub mod renderer;
pub mod save;
pub mod stats;
pub mod telemetry;

pub use coord::{AxisKind, XValue};
pub use display::{SystemViewer, Viewer};
pub use error::{PlotError, PlotResult};
pub use figure::{Figure, FigureHandle};
pub use options::PlotOptions;
pub use renderer::{ChartKind, ChartRenderer, ChartRequest};
pub use stats::BoxStats;

/// Day-month-two-digit-year, the date format of the station readings.
pub const DATE_FORMAT: &str = "%d-%m-%y";

/// Smallest and largest of the values, `None` for an empty sequence.
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(
    values: impl IntoIterator<Item = T>,
) -> Option<(T, T)> {
    let mut values_iter = values.into_iter();
    let (mut min, mut max) = match values_iter.next() {
        Some(v) => (v, v),
        None => return None,
    };
    for v in values_iter {
        if v > max {
            max = v
        }
        if v < min {
            min = v
        }
    }
    Some((min, max))
}

/// Tick label format for a time axis spanning `d`.
pub fn suitable_xfmt(d: chrono::Duration) -> &'static str {
    let xfmt = if d > chrono::Duration::weeks(104) {
        "%m-%Y"
    } else if d > chrono::Duration::weeks(1) {
        DATE_FORMAT
    } else if d > chrono::Duration::days(1) {
        "%d-%m %H"
    } else {
        "%H:%M"
    };
    return xfmt;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_of_readings() {
        assert_eq!(min_and_max(vec![10., 20., 15.]), Some((10., 20.)));
        assert_eq!(min_and_max(vec![1987, 1991, 1990]), Some((1987, 1991)));
        assert_eq!(min_and_max(Vec::<f64>::new()), None);
    }

    #[test]
    fn time_formats_by_span() {
        assert_eq!(suitable_xfmt(chrono::Duration::weeks(520)), "%m-%Y");
        assert_eq!(suitable_xfmt(chrono::Duration::days(365)), DATE_FORMAT);
        assert_eq!(suitable_xfmt(chrono::Duration::days(3)), "%d-%m %H");
        assert_eq!(suitable_xfmt(chrono::Duration::hours(6)), "%H:%M");
    }
}
