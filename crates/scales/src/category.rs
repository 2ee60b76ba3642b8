//! Category scale
//!
//! Maps label indices to evenly spaced pixel positions and exposes the
//! geometry bar charts need.

use crate::label_fit::{edge_paddings, fit_rotation, LabelRotation, RotationRequest};
use crate::linear::TICK_LENGTH;
use crate::options::{CategoryScaleOptions, Position};
use crate::scale::{Margins, MinSize, Scale, ScaleBounds, ScaleGeometry};
use canvas::{alias_pixel, longest_text, Canvas, TextAlign, TextBaseline};
use tracing::trace;

/// Clearance kept between neighbouring labels
const SLOT_CLEARANCE: f64 = 6.0;

/// An axis of discrete, labelled categories
#[derive(Debug, Clone)]
pub struct CategoryScale {
    options: CategoryScaleOptions,
    labels: Vec<String>,
    bounds: ScaleBounds,
    padding_left: f64,
    padding_right: f64,
    rotation: LabelRotation,
}

impl CategoryScale {
    /// Create a new category scale. The tick callback, if any, rewrites the
    /// labels.
    pub fn new(options: CategoryScaleOptions, labels: Vec<String>) -> Self {
        let mut scale = Self {
            options,
            labels: Vec::new(),
            bounds: ScaleBounds::default(),
            padding_left: 0.0,
            padding_right: 0.0,
            rotation: LabelRotation::default(),
        };
        scale.set_labels(labels);
        scale
    }

    pub fn options(&self) -> &CategoryScaleOptions {
        &self.options
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn set_labels(&mut self, mut labels: Vec<String>) {
        if let Some(callback) = &self.options.ticks.callback {
            callback.apply(&mut labels);
        }
        self.labels = labels;
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn padding(&self) -> (f64, f64) {
        (self.padding_left, self.padding_right)
    }

    pub fn rotation(&self) -> LabelRotation {
        self.rotation
    }

    fn offset_mode(&self) -> bool {
        self.options.grid_lines.offset_grid_lines
    }

    fn slot_count(&self) -> f64 {
        let count = self.labels.len() as f64;
        let slots = if self.offset_mode() { count } else { count - 1.0 };
        slots.max(1.0)
    }

    /// Pixel of category `index`. With `include_offset` in offset mode the
    /// pixel is the center of the category's slot instead of its leading edge.
    pub fn pixel_for_index(&self, index: usize, include_offset: bool) -> f64 {
        let centered = self.offset_mode() && include_offset;
        if self.is_horizontal() {
            let inner = self.bounds.width() - (self.padding_left + self.padding_right);
            let value_width = inner / self.slot_count();
            let mut offset = value_width * index as f64 + self.padding_left;
            if centered {
                offset += value_width / 2.0;
            }
            self.bounds.left + offset.round()
        } else {
            let value_height = self.bounds.height() / self.slot_count();
            let mut offset = value_height * index as f64;
            if centered {
                offset += value_height / 2.0;
            }
            self.bounds.top + offset.round()
        }
    }

    /// Width of one category slot minus category spacing on both sides
    pub fn bar_base_width(&self) -> f64 {
        self.pixel_for_index(1, true) - self.pixel_for_index(0, true) - 2.0 * self.options.category_spacing
    }

    /// Width of one bar when `dataset_count` bars share a slot
    pub fn bar_width(&self, dataset_count: usize) -> f64 {
        let base = self.bar_base_width();
        if self.options.stacked || dataset_count == 0 {
            return base;
        }
        let count = dataset_count as f64;
        (base - (count - 1.0) * self.options.spacing) / count
    }

    /// Center x of the bar for `dataset_index` in category `index`
    pub fn bar_x(&self, index: usize, dataset_index: usize, dataset_count: usize) -> f64 {
        let base = self.bar_base_width();
        let bar_width = self.bar_width(dataset_count);
        let start = self.pixel_for_index(index, true) - base / 2.0;
        if self.options.stacked {
            return start + bar_width / 2.0;
        }
        let position = dataset_index as f64;
        start + bar_width * position + position * self.options.spacing + bar_width / 2.0
    }

    fn calculate_label_rotation(&mut self, max_height: f64, margins: Margins, ctx: &dyn Canvas) {
        self.rotation = LabelRotation::default();
        self.padding_left = 0.0;
        self.padding_right = 0.0;
        if !self.options.display || self.labels.is_empty() || !self.is_horizontal() {
            return;
        }

        let font = self.options.ticks.font();
        let (left, right) = edge_paddings(&self.labels, &font, 0.0, ctx);
        self.padding_left = left;
        self.padding_right = right;

        let slot_width = (self.pixel_for_index(1, false) - self.pixel_for_index(0, false)).floor() - SLOT_CLEARANCE;
        let request = RotationRequest {
            labels: &self.labels,
            font: &font,
            slot_width,
            available_height: max_height,
            max_rotation_degrees: self.options.ticks.max_rotation,
            reserved_left: 0.0,
        };
        let fit = fit_rotation(&request, ctx);

        self.padding_left = (fit.padding_left - margins.left).max(0.0);
        self.padding_right = (fit.padding_right - margins.right).max(0.0);
        self.rotation = fit;
        trace!(rotation = fit.rotation_degrees, slot_width, "category label rotation");
    }

    fn skip_ratio(&self) -> usize {
        if self.rotation.rotation_degrees != 0 {
            return 1;
        }
        let inner = self.bounds.width() - (self.padding_left + self.padding_right);
        let needed = (self.rotation.longest_label + self.options.ticks.font_size / 2.0) * self.labels.len() as f64;
        if inner > 0.0 && needed > inner {
            1 + (needed / inner).floor() as usize
        } else {
            1
        }
    }

    fn draw_horizontal(&self, ctx: &mut dyn Canvas, chart_area: &ScaleBounds) {
        let grid = &self.options.grid_lines;
        let ticks = &self.options.ticks;
        let skip = self.skip_ratio();
        let rotated = self.rotation.rotation_degrees != 0;
        let top_position = self.options.position == Position::Top;
        let (tick_start, tick_end) = if top_position {
            (self.bounds.bottom - TICK_LENGTH, self.bounds.bottom)
        } else {
            (self.bounds.top, self.bounds.top + TICK_LENGTH)
        };

        for (index, label) in self.labels.iter().enumerate() {
            if skip > 1 && index % skip > 0 {
                continue;
            }
            let label_x = self.pixel_for_index(index, true);

            if grid.show {
                let (width, color) = if index == 0 {
                    (grid.zero_line_width, grid.zero_line_color.as_str())
                } else {
                    (grid.line_width, grid.color.as_str())
                };
                let line_x = self.pixel_for_index(index, false) + alias_pixel(width);
                ctx.set_line_width(width);
                ctx.set_stroke_style(color);
                ctx.begin_path();
                if grid.draw_ticks {
                    ctx.move_to(line_x, tick_start);
                    ctx.line_to(line_x, tick_end);
                }
                if grid.draw_on_chart_area {
                    ctx.move_to(line_x, chart_area.top);
                    ctx.line_to(line_x, chart_area.bottom);
                }
                ctx.stroke();
            }

            if ticks.show {
                let label_y = if rotated {
                    self.bounds.top + 12.0
                } else if top_position {
                    self.bounds.bottom - TICK_LENGTH
                } else {
                    self.bounds.top + TICK_LENGTH
                };
                ctx.save();
                ctx.translate(label_x, label_y);
                ctx.rotate(-self.rotation.radians());
                ctx.set_font(&ticks.font());
                ctx.set_fill_style(&ticks.font_color);
                ctx.set_text_align(if rotated { TextAlign::Right } else { TextAlign::Center });
                ctx.set_text_baseline(if rotated {
                    TextBaseline::Middle
                } else if top_position {
                    TextBaseline::Bottom
                } else {
                    TextBaseline::Top
                });
                ctx.fill_text(label, 0.0, 0.0);
                ctx.restore();
            }
        }
    }

    fn draw_vertical(&self, ctx: &mut dyn Canvas, chart_area: &ScaleBounds) {
        let grid = &self.options.grid_lines;
        let ticks = &self.options.ticks;
        let right_position = self.options.position == Position::Right;

        for (index, label) in self.labels.iter().enumerate() {
            if grid.show {
                let width = grid.line_width;
                let line_y = self.pixel_for_index(index, false) + alias_pixel(width);
                ctx.set_line_width(width);
                ctx.set_stroke_style(&grid.color);
                ctx.begin_path();
                if grid.draw_ticks {
                    let (start, end) = if right_position {
                        (self.bounds.left, self.bounds.left + TICK_LENGTH)
                    } else {
                        (self.bounds.right - TICK_LENGTH, self.bounds.right)
                    };
                    ctx.move_to(start, line_y);
                    ctx.line_to(end, line_y);
                }
                if grid.draw_on_chart_area {
                    ctx.move_to(chart_area.left, line_y);
                    ctx.line_to(chart_area.right, line_y);
                }
                ctx.stroke();
            }
            if ticks.show {
                ctx.set_font(&ticks.font());
                ctx.set_fill_style(&ticks.font_color);
                ctx.set_text_baseline(TextBaseline::Middle);
                let (x, align) = if right_position {
                    (self.bounds.left + TICK_LENGTH, TextAlign::Left)
                } else {
                    (self.bounds.right - TICK_LENGTH, TextAlign::Right)
                };
                ctx.set_text_align(align);
                ctx.fill_text(label, x, self.pixel_for_index(index, true));
            }
        }
    }
}

impl Scale for CategoryScale {
    fn id(&self) -> &str {
        &self.options.id
    }

    fn position(&self) -> Position {
        self.options.position
    }

    fn fit(&mut self, max_width: f64, max_height: f64, margins: Margins, ctx: &dyn Canvas) -> MinSize {
        if !self.options.display {
            self.calculate_label_rotation(max_height, margins, ctx);
            self.bounds = self.bounds.resized(0.0, 0.0);
            return MinSize::default();
        }
        let labels_shown = self.options.ticks.show;
        let min_size = if self.is_horizontal() {
            self.bounds = self.bounds.resized(max_width, self.bounds.height());
            self.calculate_label_rotation(max_height, margins, ctx);
            let label_height = if labels_shown {
                self.rotation.rotated_height() + 1.5 * self.options.ticks.font_size
            } else {
                0.0
            };
            MinSize {
                width: max_width,
                height: label_height.min(max_height),
            }
        } else {
            self.bounds = self.bounds.resized(self.bounds.width(), max_height);
            self.calculate_label_rotation(max_height, margins, ctx);
            let width = if labels_shown {
                let font = self.options.ticks.font();
                (longest_text(ctx, &font, &self.labels) + SLOT_CLEARANCE + TICK_LENGTH).min(max_width)
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
        if self.is_horizontal() {
            self.draw_horizontal(ctx, chart_area);
        } else {
            self.draw_vertical(ctx, chart_area);
        }
    }
}
