//! Per-element animated state

use crate::color::ColorMixer;
use crate::options::{OptionsSlot, OptionsSnapshot};
use crate::property::AnimationProperty;
use crate::value::{AnimValue, PropertyMap};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::trace;

/// The animated state of one element.
///
/// `current` holds the values drawn this frame. `start` exists only while a
/// transition is running and records the values it started from.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    current: PropertyMap,
    start: Option<PropertyMap>,
    saved: Option<PropertyMap>,
    running: BTreeMap<String, AnimationProperty>,
    options: Option<OptionsSlot>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: PropertyMap) -> Self {
        Self {
            current: values,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: Rc<OptionsSnapshot>) -> Self {
        self.options = Some(OptionsSlot::Snapshot(options));
        self
    }

    pub fn values(&self) -> &PropertyMap {
        &self.current
    }

    pub fn get(&self, key: &str) -> Option<&AnimValue> {
        self.current.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AnimValue::as_number)
    }

    pub fn color(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AnimValue::as_color)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AnimValue::as_bool)
    }

    /// Option value, falling back to the element's own values
    pub fn option(&self, key: &str) -> Option<&AnimValue> {
        self.options
            .as_ref()
            .and_then(|options| options.get(key))
            .or_else(|| self.get(key))
    }

    pub fn option_number(&self, key: &str) -> Option<f64> {
        self.option(key).and_then(AnimValue::as_number)
    }

    pub fn option_color(&self, key: &str) -> Option<&str> {
        self.option(key).and_then(AnimValue::as_color)
    }

    pub fn option_flag(&self, key: &str) -> Option<bool> {
        self.option(key).and_then(AnimValue::as_bool)
    }

    /// Apply a value without animating it. Any transition on the key stops.
    pub fn set_immediate(&mut self, key: impl Into<String>, value: impl Into<AnimValue>) {
        let key = key.into();
        if let Some(mut anim) = self.running.remove(&key) {
            anim.cancel();
        }
        self.current.insert(key, value.into());
    }

    /// Record the current values as the saved snapshot
    pub fn save(&mut self) {
        self.saved = Some(self.current.clone());
    }

    pub fn saved(&self) -> Option<&PropertyMap> {
        self.saved.as_ref()
    }

    /// Restart the start snapshot from the current values
    pub fn pivot(&mut self) {
        self.start = Some(self.current.clone());
    }

    pub fn start(&self) -> Option<&PropertyMap> {
        self.start.as_ref()
    }

    pub fn running(&self, key: &str) -> Option<&AnimationProperty> {
        self.running.get(key)
    }

    pub(crate) fn running_mut(&mut self, key: &str) -> Option<&mut AnimationProperty> {
        self.running.get_mut(key)
    }

    pub(crate) fn begin(&mut self, key: String, anim: AnimationProperty) {
        if self.start.is_none() {
            self.start = Some(self.current.clone());
        }
        self.current.insert(key.clone(), anim.current().clone());
        self.running.insert(key, anim);
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Keys with a transition in flight
    pub fn running_keys(&self) -> impl Iterator<Item = &str> {
        self.running.keys().map(String::as_str)
    }

    pub fn options_slot(&self) -> Option<&OptionsSlot> {
        self.options.as_ref()
    }

    pub(crate) fn take_options(&mut self) -> Option<OptionsSlot> {
        self.options.take()
    }

    pub(crate) fn set_options(&mut self, slot: OptionsSlot) {
        self.options = Some(slot);
    }

    /// The snapshot this element points at, if it is not on a private copy
    pub fn options_snapshot(&self) -> Option<&Rc<OptionsSnapshot>> {
        self.options.as_ref().and_then(OptionsSlot::snapshot)
    }

    /// Both elements point at the same snapshot
    pub fn shares_options_with(&self, other: &ViewState) -> bool {
        match (self.options_snapshot(), other.options_snapshot()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.running.is_empty()
            || matches!(&self.options, Some(OptionsSlot::Private(private)) if private.view.is_animating())
    }

    pub fn remaining_ms(&self) -> f64 {
        let own = self
            .running
            .values()
            .map(AnimationProperty::remaining_ms)
            .fold(0.0, f64::max);
        match &self.options {
            Some(OptionsSlot::Private(private)) => own.max(private.view.remaining_ms()),
            _ => own,
        }
    }

    /// Advance every transition and return the keys that completed
    pub fn advance(&mut self, delta_ms: f64, mixer: &dyn ColorMixer) -> Vec<String> {
        let mut finished = Vec::new();
        for (key, anim) in self.running.iter_mut() {
            self.current.insert(key.clone(), anim.advance(delta_ms, mixer).clone());
            if !anim.is_active() {
                finished.push(key.clone());
            }
        }
        for key in &finished {
            self.running.remove(key);
        }
        if self.running.is_empty() {
            self.start = None;
        }
        self.advance_options(delta_ms, mixer);
        finished
    }

    fn advance_options(&mut self, delta_ms: f64, mixer: &dyn ColorMixer) {
        let next = match &mut self.options {
            Some(OptionsSlot::Private(private)) => {
                let done = private.view.advance(delta_ms, mixer);
                let settled = match &mut private.reshare {
                    Some(reshare) => {
                        for key in &done {
                            reshare.awaiting.remove(key);
                        }
                        reshare.awaiting.is_empty()
                    }
                    None => false,
                };
                if settled {
                    private.reshare.take().map(|reshare| reshare.next)
                } else {
                    None
                }
            }
            _ => None,
        };
        if let Some(next) = next {
            trace!("options transition settled, pointing at shared snapshot");
            self.options = Some(OptionsSlot::Snapshot(next));
        }
    }

    /// Jump every transition to its end
    pub fn finish(&mut self, mixer: &dyn ColorMixer) {
        self.advance(f64::INFINITY, mixer);
    }

    /// Stop one transition, keeping the value reached so far
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.running.remove(key) {
            Some(mut anim) => {
                anim.cancel();
                if self.running.is_empty() {
                    self.start = None;
                }
                true
            }
            None => false,
        }
    }

    /// Stop every transition, including those of a private options copy.
    /// A private copy stays private.
    pub fn cancel_all(&mut self) {
        for anim in self.running.values_mut() {
            anim.cancel();
        }
        self.running.clear();
        self.start = None;
        if let Some(OptionsSlot::Private(private)) = &mut self.options {
            private.view.cancel_all();
            private.reshare = None;
        }
    }
}
