/// Five-number summary of one group, as drawn by a box plot.
///
/// Whiskers end at the most extreme data points within 1.5 IQR of the box,
/// the points beyond them are the outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

const WHISKER_IQR: f64 = 1.5;

impl BoxStats {
    /// Summarizes the finite values of a group, `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<BoxStats> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;
        let inside = sorted.iter().filter(|v| **v >= low_fence && **v <= high_fence);
        // the quartiles lie inside the fences, so there is always a point inside
        let whisker_low = inside.clone().next().copied().unwrap_or(q1);
        let whisker_high = inside.last().copied().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();
        Some(BoxStats {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// The lowest and highest points drawn for this box.
    pub fn extent(&self, with_outliers: bool) -> (f64, f64) {
        let (mut low, mut high) = (self.whisker_low, self.whisker_high);
        if with_outliers {
            for &o in self.outliers.iter() {
                low = low.min(o);
                high = high.max(o);
            }
        }
        (low, high)
    }
}

/// Linear interpolation between the closest ranks of an ascending slice.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
