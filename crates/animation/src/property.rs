//! A single property transition
//!
//! `Pending -> Active -> Complete`, or `Cancelled` from either of the first
//! two. Waiters observe the outcome through a [`CompletionSignal`].

use crate::color::ColorMixer;
use crate::config::{PropertyAnimation, PropertyKind};
use crate::easing::Easing;
use crate::value::AnimValue;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Lifecycle of an [`AnimationProperty`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Created or re-targeted, not yet advanced
    Pending,
    Active,
    Complete,
    Cancelled,
}

/// Outcome observed by waiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settlement {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// Shared, settle-once completion flag
#[derive(Debug, Clone, Default)]
pub struct CompletionSignal {
    state: Rc<Cell<Settlement>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Settlement {
        self.state.get()
    }

    pub fn is_settled(&self) -> bool {
        self.state() != Settlement::Pending
    }

    fn settle(&self, outcome: Settlement) {
        if self.state.get() == Settlement::Pending {
            self.state.set(outcome);
        }
    }
}

/// An in-flight transition of one property
#[derive(Debug, Clone)]
pub struct AnimationProperty {
    property: String,
    kind: PropertyKind,
    from: AnimValue,
    to: AnimValue,
    easing: Easing,
    duration_ms: f64,
    elapsed_ms: f64,
    state: AnimationState,
    current: AnimValue,
    signal: CompletionSignal,
}

impl AnimationProperty {
    /// Start a transition towards `target`. Configured `from`/`to` override
    /// the current and requested values.
    pub fn new(property: impl Into<String>, cfg: &PropertyAnimation, current: Option<AnimValue>, target: AnimValue) -> Self {
        let to = cfg.to.clone().unwrap_or(target);
        let from = cfg.from.clone().or(current).unwrap_or_else(|| to.clone());
        Self {
            property: property.into(),
            kind: cfg.kind.unwrap_or_else(|| PropertyKind::of(&to)),
            current: from.clone(),
            from,
            to,
            easing: cfg.easing,
            duration_ms: cfg.duration_ms,
            elapsed_ms: 0.0,
            state: AnimationState::Pending,
            signal: CompletionSignal::new(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn from(&self) -> &AnimValue {
        &self.from
    }

    /// Value the transition ends at
    pub fn target(&self) -> &AnimValue {
        &self.to
    }

    /// Most recently interpolated value
    pub fn current(&self) -> &AnimValue {
        &self.current
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AnimationState::Pending | AnimationState::Active)
    }

    pub fn remaining_ms(&self) -> f64 {
        if self.is_active() {
            (self.duration_ms - self.elapsed_ms).max(0.0)
        } else {
            0.0
        }
    }

    /// Re-target in place: start over from the current value and run for at
    /// least the time that was left
    pub fn retarget(&mut self, cfg: &PropertyAnimation, target: AnimValue) {
        let remaining = self.remaining_ms();
        self.to = cfg.to.clone().unwrap_or(target);
        self.from = cfg.from.clone().unwrap_or_else(|| self.current.clone());
        self.kind = cfg.kind.unwrap_or_else(|| PropertyKind::of(&self.to));
        self.easing = cfg.easing;
        self.duration_ms = remaining.max(cfg.duration_ms);
        self.elapsed_ms = 0.0;
        self.state = AnimationState::Pending;
    }

    /// Advance by `delta_ms` and return the new current value
    pub fn advance(&mut self, delta_ms: f64, mixer: &dyn ColorMixer) -> &AnimValue {
        if !self.is_active() {
            return &self.current;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        };

        if progress >= 1.0 {
            self.current = self.to.clone();
            self.state = AnimationState::Complete;
            self.signal.settle(Settlement::Completed);
        } else {
            self.state = AnimationState::Active;
            self.current = self.interpolate(self.easing.apply(progress), mixer);
        }
        &self.current
    }

    fn interpolate(&self, factor: f64, mixer: &dyn ColorMixer) -> AnimValue {
        match (self.kind, &self.from, &self.to) {
            (PropertyKind::Number, AnimValue::Number(from), AnimValue::Number(to)) => {
                AnimValue::Number(from + (to - from) * factor)
            }
            (PropertyKind::Color, AnimValue::Color(from), AnimValue::Color(to)) => match mixer.mix(from, to, factor) {
                Ok(color) => AnimValue::Color(color),
                Err(err) => {
                    debug!(property = %self.property, %err, "color interpolation failed, applying target");
                    self.to.clone()
                }
            },
            (PropertyKind::Boolean, _, _) => {
                if factor > 0.5 {
                    self.to.clone()
                } else {
                    self.from.clone()
                }
            }
            _ => self.to.clone(),
        }
    }

    /// Stop without completing; waiters see `Cancelled`
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = AnimationState::Cancelled;
            self.signal.settle(Settlement::Cancelled);
        }
    }

    /// Signal that settles when this transition completes or is cancelled
    pub fn wait(&self) -> CompletionSignal {
        self.signal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbaMixer;

    fn linear(duration: f64) -> PropertyAnimation {
        PropertyAnimation::new(duration, Easing::Linear)
    }

    #[test]
    fn test_number_progression() {
        let mut anim = AnimationProperty::new("x", &linear(100.0), Some(0.0.into()), 10.0.into());
        let signal = anim.wait();
        assert_eq!(anim.state(), AnimationState::Pending);

        assert_eq!(anim.advance(50.0, &RgbaMixer), &AnimValue::Number(5.0));
        assert_eq!(anim.state(), AnimationState::Active);
        assert_eq!(signal.state(), Settlement::Pending);

        assert_eq!(anim.advance(50.0, &RgbaMixer), &AnimValue::Number(10.0));
        assert_eq!(anim.state(), AnimationState::Complete);
        assert_eq!(signal.state(), Settlement::Completed);
    }

    #[test]
    fn test_retarget_rebases() {
        let mut anim = AnimationProperty::new("x", &linear(100.0), Some(0.0.into()), 10.0.into());
        anim.advance(50.0, &RgbaMixer);
        anim.retarget(&linear(20.0), 20.0.into());

        assert_eq!(anim.from(), &AnimValue::Number(5.0));
        assert_eq!(anim.target(), &AnimValue::Number(20.0));
        assert_eq!(anim.elapsed_ms(), 0.0);
        assert_eq!(anim.duration_ms(), 50.0);
        assert!(anim.is_active());
    }

    #[test]
    fn test_missing_current_starts_at_target() {
        let mut anim = AnimationProperty::new("x", &linear(100.0), None, 7.0.into());
        assert_eq!(anim.advance(10.0, &RgbaMixer), &AnimValue::Number(7.0));
    }

    #[test]
    fn test_color_failure_applies_target() {
        let cfg = linear(100.0).with_kind(PropertyKind::Color);
        let mut anim = AnimationProperty::new("borderColor", &cfg, Some("bogus".into()), "#ff0000".into());
        assert_eq!(anim.advance(10.0, &RgbaMixer), &AnimValue::Color("#ff0000".into()));
        assert!(anim.is_active());
    }

    #[test]
    fn test_color_mix() {
        let mut anim = AnimationProperty::new("backgroundColor", &linear(100.0), Some("#000000".into()), "#ffffff".into());
        assert_eq!(anim.advance(50.0, &RgbaMixer), &AnimValue::Color("rgb(128, 128, 128)".into()));
    }

    #[test]
    fn test_config_from_to_override() {
        let cfg = linear(100.0).with_from("transparent");
        let anim = AnimationProperty::new("borderColor", &cfg, Some("#123456".into()), "#ffffff".into());
        assert_eq!(anim.from(), &AnimValue::Color("transparent".into()));

        let cfg = linear(100.0).with_to("transparent");
        let anim = AnimationProperty::new("borderColor", &cfg, Some("#123456".into()), "#ffffff".into());
        assert_eq!(anim.target(), &AnimValue::Color("transparent".into()));
    }

    #[test]
    fn test_boolean_switches_past_half() {
        let mut anim = AnimationProperty::new("visible", &linear(100.0), Some(true.into()), false.into());
        assert_eq!(anim.advance(40.0, &RgbaMixer), &AnimValue::Bool(true));
        assert_eq!(anim.advance(20.0, &RgbaMixer), &AnimValue::Bool(false));
    }

    #[test]
    fn test_cancel() {
        let mut anim = AnimationProperty::new("x", &linear(100.0), Some(0.0.into()), 10.0.into());
        let signal = anim.wait();
        anim.advance(10.0, &RgbaMixer);
        anim.cancel();

        assert_eq!(anim.state(), AnimationState::Cancelled);
        assert_eq!(signal.state(), Settlement::Cancelled);
        assert_eq!(anim.advance(100.0, &RgbaMixer), &AnimValue::Number(1.0));
        assert_eq!(anim.remaining_ms(), 0.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut anim = AnimationProperty::new("x", &linear(0.0), Some(0.0.into()), 3.0.into());
        anim.advance(0.0, &RgbaMixer);
        assert_eq!(anim.state(), AnimationState::Complete);
        assert_eq!(anim.current(), &AnimValue::Number(3.0));
    }
}
