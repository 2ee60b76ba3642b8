//! Numeric ticks
//!
//! Resolves the tick values and labels shared by the linear and radial
//! scales: an explicit override, bounded generation when the user sets tick
//! bounds, or nice-range fitting otherwise. Reversed axes keep their ticks in
//! drawing order, so the first tick is the range maximum.

use crate::options::TickOptions;
use crate::range::{compute_nice_range, format_ticks, generate_ticks, AxisRange, GeneratedTicks, RangeParams};
use tracing::warn;

/// Resolved ticks of a numeric scale
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTicks {
    range: AxisRange,
    values: Vec<f64>,
    labels: Vec<String>,
    reverse: bool,
}

impl Default for NumericTicks {
    fn default() -> Self {
        Self::from_generated(GeneratedTicks::from_range(AxisRange::FALLBACK), false)
    }
}

impl NumericTicks {
    /// Resolve ticks for `values` on an axis `drawing_size` pixels long
    pub fn resolve(scale_id: &str, values: &[f64], drawing_size: f64, options: &TickOptions) -> Self {
        let params = RangeParams::new(drawing_size, options.font_size)
            .with_begin_at_zero(options.begin_at_zero)
            .with_integers_only(options.integers_only);
        let fitted = || {
            let bounds = options.bounds();
            if bounds.is_set() {
                generate_ticks(values.iter().copied(), &params, &bounds)
            } else {
                GeneratedTicks::from_range(compute_nice_range(values.iter().copied(), &params))
            }
        };
        let generated = match options.range_override.as_ref().map(AxisRange::from_override) {
            Some(Ok(range)) => GeneratedTicks::from_range(range),
            Some(Err(err)) => {
                warn!(scale = %scale_id, %err, "ignoring range override");
                fitted()
            }
            None => fitted(),
        };

        let mut ticks = Self::from_generated(generated, options.reverse);
        if let Some(callback) = &options.callback {
            callback.apply(&mut ticks.labels);
        }
        ticks
    }

    fn from_generated(generated: GeneratedTicks, reverse: bool) -> Self {
        let GeneratedTicks { range, mut values } = generated;
        if reverse {
            values.reverse();
        }
        let labels = format_ticks(&values, range.step);
        Self {
            range,
            values,
            labels,
            reverse,
        }
    }

    pub fn range(&self) -> AxisRange {
        self.range
    }

    /// Tick values in drawing order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Tick labels in drawing order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Value at the origin end of the axis
    pub fn start(&self) -> f64 {
        if self.reverse {
            self.range.max
        } else {
            self.range.min
        }
    }

    /// Value at the far end of the axis
    pub fn end(&self) -> f64 {
        if self.reverse {
            self.range.min
        } else {
            self.range.max
        }
    }

    /// Position of `value` between start (0) and end (1)
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.end() - self.start();
        if span == 0.0 {
            0.0
        } else {
            (value - self.start()) / span
        }
    }

    /// Value at `fraction` between start and end
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.start() + fraction * (self.end() - self.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::RangeOverride;

    #[test]
    fn test_fitted_without_bounds() {
        let ticks = NumericTicks::resolve("y", &[-100.0, 200.0], 300.0, &TickOptions::default());
        let range = ticks.range();
        assert_eq!(ticks.values(), range.ticks().as_slice());
        assert_eq!(ticks.labels().len(), ticks.values().len());
        assert_eq!(ticks.start(), range.min);
        assert_eq!(ticks.end(), range.max);
    }

    #[test]
    fn test_explicit_bounds_clamp_end_ticks() {
        let options = TickOptions {
            min: Some(-1010.0),
            max: Some(1010.0),
            ..TickOptions::default()
        };
        let ticks = NumericTicks::resolve("y", &[1.0, 2.0, 0.0], 300.0, &options);
        assert_eq!(ticks.labels(), &["-1010", "-1000", "-500", "0", "500", "1000", "1010"]);
        assert_eq!(ticks.range().min, -1010.0);
        assert_eq!(ticks.range().max, 1010.0);
    }

    #[test]
    fn test_reverse_keeps_drawing_order() {
        let options = TickOptions {
            reverse: true,
            max_ticks_limit: Some(11),
            ..TickOptions::default()
        };
        let ticks = NumericTicks::resolve("y", &[10.0, 5.0, 0.0, 25.0, 78.0], 300.0, &options);
        assert_eq!(ticks.labels(), &["80", "70", "60", "50", "40", "30", "20", "10", "0"]);
        assert_eq!(ticks.start(), 80.0);
        assert_eq!(ticks.end(), 0.0);
        assert_eq!(ticks.fraction(80.0), 0.0);
        assert_eq!(ticks.fraction(0.0), 1.0);
        assert_eq!(ticks.value_at(0.25), 60.0);
    }

    #[test]
    fn test_callback_sees_drawing_order() {
        let options = TickOptions {
            reverse: true,
            ..TickOptions::default()
        }
        .with_callback(|label, index| format!("{}@{}", label, index));
        let ticks = NumericTicks::resolve("y", &[0.0, 10.0], 300.0, &options);
        let first = &ticks.labels()[0];
        assert!(first.ends_with("@0"));
        assert!(first.starts_with(&format!("{}", ticks.range().max)));
    }

    #[test]
    fn test_override_beats_bounds() {
        let options = TickOptions {
            range_override: Some(RangeOverride::new(4, 5.0, 0.0)),
            min: Some(-50.0),
            ..TickOptions::default()
        };
        let ticks = NumericTicks::resolve("y", &[1.0, 2.0], 300.0, &options);
        assert_eq!(ticks.values(), &[0.0, 5.0, 10.0, 15.0, 20.0]);
    }
}
