//! Category label rotation
//!
//! Rotates x-axis labels one degree at a time until they fit in their
//! category slot, never taller than the space below the axis allows.

use canvas::{longest_text, FontSpec, TextMeasure};
use tracing::trace;

/// Extra room to the right of the last label
pub const LAST_LABEL_PADDING: f64 = 3.0;

/// Labels and space to fit them into
#[derive(Debug, Clone, Copy)]
pub struct RotationRequest<'a> {
    pub labels: &'a [String],
    pub font: &'a FontSpec,
    /// Pixel width of one category slot
    pub slot_width: f64,
    /// Pixel height the rotated labels may occupy
    pub available_height: f64,
    pub max_rotation_degrees: u32,
    /// Space already reserved left of the axis, e.g. by a vertical scale
    pub reserved_left: f64,
}

/// Result of fitting label rotation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelRotation {
    pub rotation_degrees: u32,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Horizontal footprint of the widest label at this rotation
    pub label_width: f64,
    /// Unrotated width of the widest label
    pub longest_label: f64,
}

impl LabelRotation {
    /// Rotation in radians
    pub fn radians(&self) -> f64 {
        (self.rotation_degrees as f64).to_radians()
    }

    /// Vertical footprint of the widest label at this rotation
    pub fn rotated_height(&self) -> f64 {
        self.radians().sin() * self.longest_label
    }
}

/// Left and right padding needed so the first and last labels are not clipped
pub fn edge_paddings<M: TextMeasure + ?Sized>(
    labels: &[String],
    font: &FontSpec,
    reserved_left: f64,
    measure: &M,
) -> (f64, f64) {
    let (Some(first), Some(last)) = (labels.first(), labels.last()) else {
        return (0.0, 0.0);
    };
    let first_width = measure.measure_text(first, font);
    let last_width = measure.measure_text(last, font);
    (
        (first_width / 2.0).max(reserved_left),
        last_width / 2.0 + LAST_LABEL_PADDING,
    )
}

/// Find the smallest rotation at which labels fit their slots.
///
/// Stops at `max_rotation_degrees`. If the next degree would make labels
/// taller than `available_height`, the previous rotation is kept.
pub fn fit_rotation<M: TextMeasure + ?Sized>(request: &RotationRequest<'_>, measure: &M) -> LabelRotation {
    let labels = request.labels;
    let font = request.font;
    let (mut padding_left, mut padding_right) = edge_paddings(labels, font, request.reserved_left, measure);
    if labels.is_empty() {
        return LabelRotation::default();
    }

    let first_width = measure.measure_text(&labels[0], font);
    let longest = longest_text(measure, font, labels);
    let half_font = font.pixel_size / 2.0;
    let mut rotation = 0;
    let mut label_width = longest;

    while label_width > request.slot_width && rotation < request.max_rotation_degrees {
        let candidate = rotation + 1;
        let radians = (candidate as f64).to_radians();
        if radians.sin() * longest > request.available_height {
            trace!(candidate, "label height limit reached");
            break;
        }

        let cos = radians.cos();
        let first_rotated = cos * first_width;
        if first_rotated + half_font > request.reserved_left {
            padding_left = first_rotated + half_font;
        }
        padding_right = half_font;
        rotation = candidate;
        label_width = cos * longest;
    }

    LabelRotation {
        rotation_degrees: rotation,
        padding_left,
        padding_right,
        label_width,
        longest_label: longest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::ApproximateTextMeasure;
    use proptest::prelude::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn request<'a>(labels: &'a [String], font: &'a FontSpec, slot: f64, height: f64) -> RotationRequest<'a> {
        RotationRequest {
            labels,
            font,
            slot_width: slot,
            available_height: height,
            max_rotation_degrees: 50,
            reserved_left: 0.0,
        }
    }

    #[test]
    fn test_short_labels_stay_flat() {
        let font = FontSpec::sized(10.0);
        let labels = labels(&["a", "b", "c"]);
        let fit = fit_rotation(&request(&labels, &font, 100.0, 100.0), &ApproximateTextMeasure::default());

        assert_eq!(fit.rotation_degrees, 0);
        assert_eq!(fit.padding_left, 3.0);
        assert_eq!(fit.padding_right, 3.0 + LAST_LABEL_PADDING);
    }

    #[test]
    fn test_rotation_capped_at_max() {
        let font = FontSpec::sized(10.0);
        let labels = labels(&["January", "February"]);
        let fit = fit_rotation(&request(&labels, &font, 20.0, 1000.0), &ApproximateTextMeasure::default());

        assert_eq!(fit.rotation_degrees, 50);
        assert_eq!(fit.padding_right, 5.0);
        assert!(fit.label_width > 20.0);
    }

    #[test]
    fn test_rotation_backs_off_at_height_limit() {
        let font = FontSpec::sized(10.0);
        let labels = labels(&["January"]);
        let fit = fit_rotation(&request(&labels, &font, 20.0, 20.0), &ApproximateTextMeasure::default());

        assert_eq!(fit.rotation_degrees, 28);
        assert!(fit.rotated_height() <= 20.0);
    }

    #[test]
    fn test_reserved_left_wins_when_wider() {
        let font = FontSpec::sized(10.0);
        let labels = labels(&["ab"]);
        let (left, _) = edge_paddings(&labels, &font, 40.0, &ApproximateTextMeasure::default());
        assert_eq!(left, 40.0);
    }

    #[test]
    fn test_empty_labels() {
        let font = FontSpec::default();
        let fit = fit_rotation(&request(&[], &font, 10.0, 10.0), &ApproximateTextMeasure::default());
        assert_eq!(fit, LabelRotation::default());
    }

    proptest! {
        #[test]
        fn prop_rotation_never_exceeds_max(
            lengths in proptest::collection::vec(1usize..30, 1..12),
            slot in 0.0f64..200.0,
            height in 0.0f64..300.0,
            max_rotation in 0u32..=90,
        ) {
            let labels: Vec<String> = lengths.iter().map(|n| "x".repeat(*n)).collect();
            let font = FontSpec::sized(12.0);
            let req = RotationRequest {
                labels: &labels,
                font: &font,
                slot_width: slot,
                available_height: height,
                max_rotation_degrees: max_rotation,
                reserved_left: 0.0,
            };
            let fit = fit_rotation(&req, &ApproximateTextMeasure::default());
            prop_assert!(fit.rotation_degrees <= max_rotation);
            prop_assert!(fit.rotated_height() <= height + 1e-9 || fit.rotation_degrees == 0);
        }
    }
}
