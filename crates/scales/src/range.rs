//! Numeric axis ranges
//!
//! Picks a tick step, bounds and step count for a numeric axis from raw data
//! values. The step starts at the order of magnitude of the value range and
//! is doubled or halved until the number of ticks fits the space available
//! for labels.

use crate::error::{ScaleError, ScaleResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Fewest steps a fitted range will have
pub const MIN_STEPS: u32 = 2;

/// Most steps an explicit override or step size may produce
pub const MAX_STEPS: u32 = 1000;

/// Tick limit for generated ticks when none is configured
pub const DEFAULT_MAX_TICKS: usize = 11;

/// Generated steps smaller than this collapse to the two range ends
const MIN_SPACING: f64 = 1e-14;

/// Decimal places generated ticks are rounded to at most
const MAX_TICK_DECIMALS: usize = 20;

/// Labels are spaced at 1.5x their height
const LABEL_SPACING: f64 = 1.5;

/// Upper bound on doubling/halving rounds
const MAX_FIT_ITERATIONS: usize = 64;

/// Slack when converting a range into a whole number of steps
const STEP_EPSILON: f64 = 1e-9;

/// A resolved numeric axis domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub step_count: u32,
}

impl AxisRange {
    /// Range used when nothing usable can be computed
    pub const FALLBACK: AxisRange = AxisRange {
        min: 0.0,
        max: 1.0,
        step: 0.5,
        step_count: 2,
    };

    /// Build a range from an explicit override
    pub fn from_override(range_override: &RangeOverride) -> ScaleResult<Self> {
        range_override.validate()?;
        Ok(Self {
            min: range_override.start,
            max: range_override.start + range_override.steps as f64 * range_override.step_width,
            step: range_override.step_width,
            step_count: range_override.steps,
        })
    }

    /// Distance between min and max
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Tick values from min to max inclusive
    pub fn ticks(&self) -> Vec<f64> {
        (0..=self.step_count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Explicit range supplied by the user instead of fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOverride {
    pub steps: u32,
    pub step_width: f64,
    pub start: f64,
}

impl RangeOverride {
    /// Create a new override
    pub fn new(steps: u32, step_width: f64, start: f64) -> Self {
        Self {
            steps,
            step_width,
            start,
        }
    }

    /// Check that the override describes between 1 and [`MAX_STEPS`]
    /// finite, positive steps
    pub fn validate(&self) -> ScaleResult<()> {
        if self.steps == 0 {
            return Err(ScaleError::InvalidOverride("steps must be at least 1".into()));
        }
        if self.steps > MAX_STEPS {
            return Err(ScaleError::InvalidOverride(format!(
                "steps must be at most {}, got {}",
                MAX_STEPS, self.steps
            )));
        }
        if !self.step_width.is_finite() || self.step_width <= 0.0 {
            return Err(ScaleError::InvalidOverride(format!(
                "step width must be positive and finite, got {}",
                self.step_width
            )));
        }
        if !self.start.is_finite() {
            return Err(ScaleError::InvalidOverride(format!(
                "start must be finite, got {}",
                self.start
            )));
        }
        Ok(())
    }
}

/// Inputs for fitting a range to an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeParams {
    /// Pixel length of the axis
    pub drawing_size_px: f64,
    /// Pixel height of a tick label
    pub label_size_px: f64,
    /// Keep zero inside the range
    pub begin_at_zero: bool,
    /// Only allow integer steps on axes whose range is at least 1
    pub integers_only: bool,
}

impl RangeParams {
    /// Create new params
    pub fn new(drawing_size_px: f64, label_size_px: f64) -> Self {
        Self {
            drawing_size_px,
            label_size_px,
            begin_at_zero: false,
            integers_only: true,
        }
    }

    /// Set begin-at-zero
    pub fn with_begin_at_zero(mut self, begin_at_zero: bool) -> Self {
        self.begin_at_zero = begin_at_zero;
        self
    }

    /// Set integers-only
    pub fn with_integers_only(mut self, integers_only: bool) -> Self {
        self.integers_only = integers_only;
        self
    }

    /// Most ticks whose labels fit along the axis
    pub fn max_steps(&self) -> f64 {
        let per_label = LABEL_SPACING * self.label_size_px;
        if per_label > 0.0 && per_label.is_finite() && self.drawing_size_px.is_finite() {
            (self.drawing_size_px / per_label).floor()
        } else {
            MIN_STEPS as f64
        }
    }
}

/// Compute a nice axis range for `values`.
///
/// Absent and non-finite values are ignored. If nothing usable remains the
/// range is computed as if the data were `[0]`.
pub fn compute_nice_range<I, V>(values: I, params: &RangeParams) -> AxisRange
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    let (mut lo, mut hi) = data_extent(values).unwrap_or_else(|| {
        debug!("no usable values, fitting range around zero");
        (0.0, 0.0)
    });

    if params.begin_at_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }

    if hi == lo {
        hi += 0.5;
        if lo >= 0.5 && !params.begin_at_zero {
            lo -= 0.5;
        } else {
            hi += 0.5;
        }
    }

    let range = fit_range(lo, hi, params);
    if range.min.is_finite() && range.max.is_finite() && range.step.is_finite() && range.min < range.max {
        range
    } else {
        warn!(lo, hi, "range computation produced non-finite bounds, using fallback");
        AxisRange::FALLBACK
    }
}

fn fit_range(lo: f64, hi: f64, params: &RangeParams) -> AxisRange {
    let value_range = hi - lo;
    if !value_range.is_finite() {
        return AxisRange::FALLBACK;
    }

    let magnitude = order_of_magnitude(value_range);
    let power = 10f64.powi(magnitude as i32);
    let graph_max = (hi / power).ceil() * power;
    let graph_min = if params.begin_at_zero && lo >= 0.0 {
        0.0
    } else {
        (lo / power).floor() * power
    };
    let graph_max = if graph_max > graph_min {
        graph_max
    } else {
        graph_min + power
    };
    let graph_range = graph_max - graph_min;

    let max_steps = params.max_steps();
    let mut skip_fitting = max_steps <= MIN_STEPS as f64;
    let mut step = power;
    let mut steps = steps_for(graph_range, step);
    let mut iterations = 0;

    while !skip_fitting && (steps > max_steps || steps * 2.0 < max_steps) {
        if iterations == MAX_FIT_ITERATIONS {
            debug!(steps, max_steps, "step fitting did not converge");
            skip_fitting = true;
            break;
        }
        iterations += 1;

        if steps > max_steps {
            step *= 2.0;
        } else if params.integers_only && magnitude >= 0.0 && (step / 2.0).fract() != 0.0 {
            break;
        } else {
            step /= 2.0;
        }
        steps = steps_for(graph_range, step);
    }

    if skip_fitting {
        steps = MIN_STEPS as f64;
        step = graph_range / steps;
    }
    if steps < MIN_STEPS as f64 {
        steps = MIN_STEPS as f64;
    }

    trace!(graph_min, step, steps, iterations, "fitted axis range");
    AxisRange {
        min: graph_min,
        max: graph_min + steps * step,
        step,
        step_count: steps as u32,
    }
}

/// Smallest and largest finite value, if any
fn data_extent<I, V>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    values
        .into_iter()
        .filter_map(|value| -> Option<f64> { value.into() })
        .filter(|value| value.is_finite())
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

/// User bounds that switch a numeric axis from fitting to tick generation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickBounds {
    /// Exact first tick
    pub min: Option<f64>,
    /// Exact last tick
    pub max: Option<f64>,
    /// Lower end the range must reach
    pub suggested_min: Option<f64>,
    /// Upper end the range must reach
    pub suggested_max: Option<f64>,
    /// Steps are a nice multiple of this
    pub step_size: Option<f64>,
    /// Most ticks generated, [`DEFAULT_MAX_TICKS`] if unset
    pub max_ticks_limit: Option<usize>,
}

impl TickBounds {
    /// True if any bound is set
    pub fn is_set(&self) -> bool {
        *self != Self::default()
    }
}

/// Ticks produced by [`generate_ticks`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTicks {
    pub range: AxisRange,
    /// Ascending values; explicit `min`/`max` ends may sit off the step grid
    pub values: Vec<f64>,
}

impl GeneratedTicks {
    /// Evenly stepped ticks covering `range`
    pub fn from_range(range: AxisRange) -> Self {
        Self {
            values: range.ticks(),
            range,
        }
    }
}

/// Generate ticks for `values` under user `bounds`.
///
/// The data range is widened to the suggested ends and replaced by explicit
/// `min`/`max`. The step is the nice number spreading that range over at
/// most `max_ticks_limit` ticks, further limited by the label room along the
/// axis. Explicit ends become the first and last tick as given.
pub fn generate_ticks<I, V>(values: I, params: &RangeParams, bounds: &TickBounds) -> GeneratedTicks
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
    let (mut min, mut max) = (finite(bounds.min), finite(bounds.max));
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo >= hi {
            warn!(min = lo, max = hi, "ignoring empty explicit tick bounds");
            min = None;
            max = None;
        }
    }
    let suggested_min = finite(bounds.suggested_min);
    let suggested_max = finite(bounds.suggested_max);

    let (mut lo, mut hi) = data_extent(values).unwrap_or((0.0, 0.0));
    if params.begin_at_zero {
        if lo < 0.0 && hi < 0.0 {
            hi = 0.0;
        } else if lo > 0.0 && hi > 0.0 {
            lo = 0.0;
        }
    }
    match (min, suggested_min) {
        (Some(min), _) => lo = min,
        (None, Some(suggested)) => lo = lo.min(suggested),
        (None, None) => {}
    }
    match (max, suggested_max) {
        (Some(max), _) => hi = max,
        (None, Some(suggested)) => hi = hi.max(suggested),
        (None, None) => {}
    }
    let set_min = min.is_some() || suggested_min.is_some();
    let set_max = max.is_some() || suggested_max.is_some();
    if set_min != set_max && lo >= hi {
        if set_min {
            hi = lo + 1.0;
        } else {
            lo = hi - 1.0;
        }
    }
    if lo == hi {
        hi += 1.0;
        if !params.begin_at_zero {
            lo -= 1.0;
        }
    }
    if !(hi - lo).is_finite() || lo >= hi {
        warn!(lo, hi, "tick generation produced non-finite bounds, using fallback");
        return GeneratedTicks::from_range(AxisRange::FALLBACK);
    }

    let max_spaces = (tick_limit(params, bounds.max_ticks_limit) - 1) as f64;
    let step_size = bounds.step_size.filter(|step| step.is_finite() && *step > 0.0);
    let unit = step_size.unwrap_or(1.0);
    let mut spacing = nice_number((hi - lo) / max_spaces / unit, false) * unit;
    if !spacing.is_finite() || spacing < MIN_SPACING {
        return GeneratedTicks {
            range: AxisRange {
                min: lo,
                max: hi,
                step: hi - lo,
                step_count: 1,
            },
            values: vec![lo, hi],
        };
    }
    let spaces = grid_ceil(hi / spacing) - grid_floor(lo / spacing);
    if spaces > max_spaces {
        spacing = nice_number(spaces * spacing / max_spaces / unit, false) * unit;
    }

    let factor = 10f64.powi(decimal_places(spacing).min(MAX_TICK_DECIMALS) as i32);
    let round = |value: f64| {
        let rounded = (value * factor).round() / factor;
        if rounded.is_finite() {
            rounded
        } else {
            value
        }
    };
    let mut nice_min = grid_floor(lo / spacing) * spacing;
    let mut nice_max = grid_ceil(hi / spacing) * spacing;
    if step_size.is_some() {
        let tolerance = spacing / 1000.0;
        if let Some(min) = min.filter(|min| almost_whole(min / spacing, tolerance)) {
            nice_min = min;
        }
        if let Some(max) = max.filter(|max| almost_whole(max / spacing, tolerance)) {
            nice_max = max;
        }
    }
    let raw_spaces = (nice_max - nice_min) / spacing;
    let spaces = if (raw_spaces - raw_spaces.round()).abs() < spacing / 1000.0 {
        raw_spaces.round()
    } else {
        raw_spaces.ceil()
    };
    let spaces = spaces.clamp(1.0, MAX_STEPS as f64) as u32;
    let nice_min = round(nice_min);
    let nice_max = round(nice_max);

    let mut values = Vec::with_capacity(spaces as usize + 1);
    values.push(min.unwrap_or(nice_min));
    values.extend((1..spaces).map(|j| round(nice_min + j as f64 * spacing)));
    values.push(max.unwrap_or(nice_max));

    trace!(spacing, spaces, "generated bounded ticks");
    GeneratedTicks {
        range: AxisRange {
            min: values[0],
            max: values[values.len() - 1],
            step: spacing,
            step_count: spaces,
        },
        values,
    }
}

/// Most ticks that fit: the user limit, capped by label room along the axis
fn tick_limit(params: &RangeParams, limit: Option<usize>) -> usize {
    let limit = limit.unwrap_or(DEFAULT_MAX_TICKS).min(MAX_STEPS as usize + 1) as f64;
    let per_label = LABEL_SPACING * params.label_size_px;
    let room = if per_label > 0.0 && params.drawing_size_px.is_finite() {
        (params.drawing_size_px / per_label).ceil()
    } else {
        limit
    };
    limit.min(room).max(2.0) as usize
}

/// Floor that treats values within rounding error of a whole number as whole
fn grid_floor(value: f64) -> f64 {
    if almost_whole(value, STEP_EPSILON) {
        value.round()
    } else {
        value.floor()
    }
}

fn grid_ceil(value: f64) -> f64 {
    if almost_whole(value, STEP_EPSILON) {
        value.round()
    } else {
        value.ceil()
    }
}

fn almost_whole(value: f64, tolerance: f64) -> bool {
    let rounded = value.round();
    rounded - tolerance <= value && rounded + tolerance >= value
}

/// Whole number of steps covering `range`
fn steps_for(range: f64, step: f64) -> f64 {
    (range / step - STEP_EPSILON).ceil().max(1.0)
}

/// Decimal order of magnitude, e.g. 2 for 250
pub fn order_of_magnitude(value: f64) -> f64 {
    value.log10().floor()
}

/// A "nice" 1, 2, 5 or 10 times a power of ten near `range`.
///
/// With `round` the nearest nice value is chosen, otherwise the smallest nice
/// value not below `range`. Non-positive or non-finite input yields 0.
pub fn nice_number(range: f64, round: bool) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 0.0;
    }
    let exponent = order_of_magnitude(range);
    let power = 10f64.powi(exponent as i32);
    let fraction = range / power;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * power
}

/// Number of digits after the decimal point
pub fn decimal_places(value: f64) -> usize {
    if !value.is_finite() || value.fract() == 0.0 {
        return 0;
    }
    let text = format!("{}", value.abs());
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

/// Labels for tick `values`, all with the decimal places of `step`
pub fn format_ticks(values: &[f64], step: f64) -> Vec<String> {
    let places = decimal_places(step);
    values.iter().map(|&value| format_tick(value, places, step)).collect()
}

fn format_tick(value: f64, places: usize, step: f64) -> String {
    // -0 and accumulated error around zero print as "0"
    let value = if value.abs() < step.abs() * STEP_EPSILON {
        0.0
    } else {
        value
    };
    format!("{:.*}", places, value)
}
