//! Linear scale
//!
//! A numeric axis whose ticks come from [`NumericTicks`]: an explicit
//! override, generation under user tick bounds, or nice-range fitting.

use crate::options::{LinearScaleOptions, Position};
use crate::range::AxisRange;
use crate::scale::{Margins, MinSize, Scale, ScaleBounds, ScaleGeometry};
use crate::ticks::NumericTicks;
use canvas::{alias_pixel, longest_text, Canvas, TextAlign, TextBaseline};
use tracing::trace;

/// Length of the tick marks drawn next to labels
pub const TICK_LENGTH: f64 = 10.0;

/// Horizontal room around vertical-axis labels
const LABEL_PADDING: f64 = 16.0;

/// A numeric axis
#[derive(Debug, Clone)]
pub struct LinearScale {
    options: LinearScaleOptions,
    values: Vec<f64>,
    ticks: NumericTicks,
    bounds: ScaleBounds,
}

impl LinearScale {
    /// Create a new linear scale
    pub fn new(options: LinearScaleOptions) -> Self {
        Self {
            options,
            values: Vec::new(),
            ticks: NumericTicks::default(),
            bounds: ScaleBounds::default(),
        }
    }

    pub fn options(&self) -> &LinearScaleOptions {
        &self.options
    }

    /// Replace the values the range is computed from. Absent and
    /// non-finite values are dropped.
    pub fn set_data<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<f64>>,
    {
        self.values = values
            .into_iter()
            .filter_map(|value| -> Option<f64> { value.into() })
            .filter(|value| value.is_finite())
            .collect();
    }

    pub fn range(&self) -> AxisRange {
        self.ticks.range()
    }

    pub fn ticks(&self) -> &NumericTicks {
        &self.ticks
    }

    /// Tick labels in drawing order
    pub fn labels(&self) -> &[String] {
        self.ticks.labels()
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Recompute the ticks for an axis `drawing_size` pixels long
    pub fn update_range(&mut self, drawing_size: f64) {
        self.ticks = NumericTicks::resolve(&self.options.id, &self.values, drawing_size, &self.options.ticks);
        let range = self.ticks.range();
        trace!(scale = %self.options.id, min = range.min, max = range.max, "updated linear range");
    }

    /// Pixel for `value`; grows rightwards or upwards from the start value
    pub fn pixel_for_value(&self, value: f64) -> f64 {
        let fraction = self.ticks.fraction(value);
        if self.is_horizontal() {
            self.bounds.left + fraction * self.bounds.width()
        } else {
            self.bounds.bottom - fraction * self.bounds.height()
        }
    }

    /// Value at `pixel`
    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        let fraction = if self.is_horizontal() {
            let width = self.bounds.width();
            if width == 0.0 {
                0.0
            } else {
                (pixel - self.bounds.left) / width
            }
        } else {
            let height = self.bounds.height();
            if height == 0.0 {
                0.0
            } else {
                (self.bounds.bottom - pixel) / height
            }
        };
        self.ticks.value_at(fraction)
    }

    /// Value bars grow from: zero, or the range end nearest to it
    pub fn base_value(&self) -> f64 {
        let range = self.ticks.range();
        if range.min > 0.0 {
            range.min
        } else if range.max < 0.0 {
            range.max
        } else {
            0.0
        }
    }

    pub fn base_pixel(&self) -> f64 {
        self.pixel_for_value(self.base_value())
    }

    fn is_zero_tick(&self, tick: f64) -> bool {
        tick.abs() < self.ticks.range().step.abs() * 1e-9
    }
}

impl Scale for LinearScale {
    fn id(&self) -> &str {
        &self.options.id
    }

    fn position(&self) -> Position {
        self.options.position
    }

    fn fit(&mut self, max_width: f64, max_height: f64, _margins: Margins, ctx: &dyn Canvas) -> MinSize {
        if !self.options.display {
            let length = if self.is_horizontal() { max_width } else { max_height };
            self.update_range(length);
            self.bounds = self.bounds.resized(0.0, 0.0);
            return MinSize::default();
        }
        let ticks_shown = self.options.ticks.show;
        let min_size = if self.is_horizontal() {
            self.bounds = self.bounds.resized(max_width, self.bounds.height());
            self.update_range(max_width);
            let label_height = if ticks_shown {
                self.options.ticks.font_size * 1.5 + TICK_LENGTH
            } else {
                0.0
            };
            MinSize {
                width: max_width,
                height: label_height.min(max_height),
            }
        } else {
            self.bounds = self.bounds.resized(self.bounds.width(), max_height);
            self.update_range(max_height);
            let width = if ticks_shown {
                let font = self.options.ticks.font();
                (longest_text(ctx, &font, self.ticks.labels()) + LABEL_PADDING).min(max_width)
            } else {
                0.0
            };
            MinSize {
                width,
                height: max_height,
            }
        };
        self.bounds = self.bounds.resized(min_size.width, min_size.height);
        min_size
    }

    fn place(&mut self, bounds: ScaleBounds) {
        self.bounds = bounds;
    }

    fn geometry(&self) -> ScaleGeometry {
        ScaleGeometry::Cartesian(self.bounds)
    }

    fn draw(&self, ctx: &mut dyn Canvas, chart_area: &ScaleBounds) {
        if !self.options.display {
            return;
        }
        let grid = &self.options.grid_lines;
        let ticks = self.ticks.values();
        let horizontal = self.is_horizontal();

        if grid.show {
            for &tick in ticks {
                let (width, color) = if self.is_zero_tick(tick) {
                    (grid.zero_line_width, grid.zero_line_color.as_str())
                } else {
                    (grid.line_width, grid.color.as_str())
                };
                ctx.set_line_width(width);
                ctx.set_stroke_style(color);
                let line = self.pixel_for_value(tick).round() + alias_pixel(width);
                ctx.begin_path();
                if horizontal {
                    if grid.draw_ticks {
                        let (start, end) = match self.options.position {
                            Position::Top => (self.bounds.bottom - TICK_LENGTH, self.bounds.bottom),
                            _ => (self.bounds.top, self.bounds.top + TICK_LENGTH),
                        };
                        ctx.move_to(line, start);
                        ctx.line_to(line, end);
                    }
                    if grid.draw_on_chart_area {
                        ctx.move_to(line, chart_area.top);
                        ctx.line_to(line, chart_area.bottom);
                    }
                } else {
                    if grid.draw_ticks {
                        let (start, end) = match self.options.position {
                            Position::Right => (self.bounds.left, self.bounds.left + TICK_LENGTH),
                            _ => (self.bounds.right - TICK_LENGTH, self.bounds.right),
                        };
                        ctx.move_to(start, line);
                        ctx.line_to(end, line);
                    }
                    if grid.draw_on_chart_area {
                        ctx.move_to(chart_area.left, line);
                        ctx.line_to(chart_area.right, line);
                    }
                }
                ctx.stroke();
            }
        }

        if self.options.ticks.show {
            ctx.set_font(&self.options.ticks.font());
            ctx.set_fill_style(&self.options.ticks.font_color);
            if horizontal {
                ctx.set_text_align(TextAlign::Center);
                let (y, baseline) = match self.options.position {
                    Position::Top => (self.bounds.bottom - TICK_LENGTH, TextBaseline::Bottom),
                    _ => (self.bounds.top + TICK_LENGTH, TextBaseline::Top),
                };
                ctx.set_text_baseline(baseline);
                for (tick, label) in ticks.iter().zip(self.ticks.labels()) {
                    ctx.fill_text(label, self.pixel_for_value(*tick), y);
                }
            } else {
                let (x, align) = match self.options.position {
                    Position::Right => (self.bounds.left + TICK_LENGTH + 5.0, TextAlign::Left),
                    _ => (self.bounds.right - TICK_LENGTH - 5.0, TextAlign::Right),
                };
                ctx.set_text_align(align);
                ctx.set_text_baseline(TextBaseline::Middle);
                for (tick, label) in ticks.iter().zip(self.ticks.labels()) {
                    ctx.fill_text(label, x, self.pixel_for_value(*tick));
                }
            }
        }
    }
}
