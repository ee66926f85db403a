use crate::suitable_xfmt;
use chrono::prelude::*;

const SECONDS_PER_DAY: f64 = 86400.;

/// A value on the x axis: a plain number (e.g. a year) or a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XValue {
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// The kind of x axis a figure is drawn on, fixed by its first layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Numeric,
    Temporal,
}

impl XValue {
    pub fn kind(&self) -> AxisKind {
        match self {
            XValue::Number(_) => AxisKind::Numeric,
            XValue::Date(_) | XValue::DateTime(_) => AxisKind::Temporal,
        }
    }

    /// Position on the axis; dates are counted in days from the common era.
    pub fn position(&self) -> f64 {
        match self {
            XValue::Number(v) => *v,
            XValue::Date(d) => d.num_days_from_ce() as f64,
            XValue::DateTime(dt) => {
                dt.date().num_days_from_ce() as f64
                    + dt.time().num_seconds_from_midnight() as f64 / SECONDS_PER_DAY
            }
        }
    }
}

macro_rules! number_into_xvalue {
    ($($t:ty),*) => {
        $(
            impl From<$t> for XValue {
                fn from(v: $t) -> XValue {
                    XValue::Number(v as f64)
                }
            }
        )*
    };
}

number_into_xvalue!(f64, f32, i16, i32, i64, u16, u32, u64, usize);

impl From<NaiveDate> for XValue {
    fn from(d: NaiveDate) -> XValue {
        XValue::Date(d)
    }
}

impl From<NaiveDateTime> for XValue {
    fn from(dt: NaiveDateTime) -> XValue {
        XValue::DateTime(dt)
    }
}

/// Inverse of `XValue::position` for temporal axes.
pub fn position_to_datetime(pos: f64) -> Option<NaiveDateTime> {
    let day = pos.floor();
    let seconds = ((pos - day) * SECONDS_PER_DAY).round() as i64;
    let midnight = NaiveDate::from_num_days_from_ce_opt(day as i32)?.and_hms_opt(0, 0, 0)?;
    Some(midnight + chrono::Duration::seconds(seconds))
}

/// Evenly spaced ticks at 1, 2 or 5 times a power of ten, about `target` of them.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || !min.is_finite() || !max.is_finite() {
        return vec![min];
    }
    let target = target.max(1) as f64;
    let raw_step = max / target - min / target;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let factor = if normalized <= 1. {
        1.
    } else if normalized <= 2. {
        2.
    } else if normalized <= 5. {
        5.
    } else {
        10.
    };
    let step = factor * magnitude;
    let first = (min / step).ceil();
    let tolerance = step * 1e-9;
    (0..)
        .map(|i| (first + i as f64) * step)
        .take_while(|v| *v <= max + tolerance)
        .collect()
}

/// Numbers without trailing zeros, so that years read as `1987`.
pub fn format_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 * v.abs().max(1.) {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Tick label for an x position; temporal labels depend on the visible span.
pub fn format_x_tick(kind: AxisKind, pos: f64, span_days: f64) -> String {
    match kind {
        AxisKind::Numeric => format_number(pos),
        AxisKind::Temporal => match position_to_datetime(pos) {
            Some(dt) => {
                let span = chrono::Duration::seconds((span_days * SECONDS_PER_DAY) as i64);
                dt.format(suitable_xfmt(span)).to_string()
            }
            None => format_number(pos),
        },
    }
}
