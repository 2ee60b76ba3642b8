//! Decides, per update, which values animate and which apply immediately

use crate::color::{ColorMixer, RgbaMixer};
use crate::config::{AnimationSettings, PropertyRegistry};
use crate::options::{OptionsSlot, OptionsSnapshot, PendingReshare, PrivateOptions};
use crate::property::AnimationProperty;
use crate::value::{AnimValue, PropertyMap};
use crate::view_state::ViewState;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::trace;

/// New values requested for one element
#[derive(Debug, Clone, Default)]
pub struct TargetUpdate {
    pub values: PropertyMap,
    pub options: Option<Rc<OptionsSnapshot>>,
}

impl TargetUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<AnimValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_values(mut self, values: PropertyMap) -> Self {
        self.values.extend(values);
        self
    }

    pub fn with_options(mut self, options: Rc<OptionsSnapshot>) -> Self {
        self.options = Some(options);
        self
    }
}

/// Applies updates to view states using one chart's resolved animation
/// configuration
#[derive(Clone)]
pub struct AnimationsCoordinator {
    registry: PropertyRegistry,
    mixer: Rc<dyn ColorMixer>,
}

impl std::fmt::Debug for AnimationsCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationsCoordinator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Default for AnimationsCoordinator {
    fn default() -> Self {
        Self::from_settings(&AnimationSettings::standard())
    }
}

impl AnimationsCoordinator {
    pub fn new(registry: PropertyRegistry) -> Self {
        Self {
            registry,
            mixer: Rc::new(RgbaMixer),
        }
    }

    pub fn from_settings(settings: &AnimationSettings) -> Self {
        Self::new(PropertyRegistry::from_settings(settings))
    }

    /// Coordinator that applies every update immediately
    pub fn disabled() -> Self {
        Self::new(PropertyRegistry::new())
    }

    pub fn with_mixer(mut self, mixer: Rc<dyn ColorMixer>) -> Self {
        self.mixer = mixer;
        self
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn mixer(&self) -> &dyn ColorMixer {
        self.mixer.as_ref()
    }

    /// Apply `update` to `view`. Returns true if any transition started or
    /// was re-targeted.
    pub fn update(&self, view: &mut ViewState, update: TargetUpdate) -> bool {
        let mut started = false;
        if let Some(options) = update.options {
            started |= self.update_options(view, options);
        }
        started |= !self.animate(view, update.values).is_empty();
        started
    }

    /// Advance `view` with this coordinator's color capability
    pub fn advance(&self, view: &mut ViewState, delta_ms: f64) -> Vec<String> {
        view.advance(delta_ms, self.mixer())
    }

    fn animate(&self, view: &mut ViewState, values: PropertyMap) -> Vec<String> {
        let mut animated = Vec::new();
        for (key, value) in values {
            if key.starts_with('$') {
                continue;
            }
            let cfg = match self.registry.get(&key) {
                Some(cfg) if cfg.is_animated() => cfg,
                _ => {
                    view.set_immediate(key, value);
                    continue;
                }
            };

            if let Some(running) = view.running_mut(&key) {
                running.retarget(cfg, value);
                animated.push(key);
                continue;
            }

            let current = view.get(&key).cloned();
            if cfg.from.is_none() && cfg.to.is_none() && current.as_ref() == Some(&value) {
                continue;
            }
            trace!(property = %key, duration_ms = cfg.duration_ms, "starting transition");
            let anim = AnimationProperty::new(key.clone(), cfg, current, value);
            view.begin(key.clone(), anim);
            animated.push(key);
        }
        animated
    }

    fn update_options(&self, view: &mut ViewState, next: Rc<OptionsSnapshot>) -> bool {
        let mut private = match view.take_options() {
            None => {
                view.set_options(OptionsSlot::Snapshot(next));
                return false;
            }
            Some(OptionsSlot::Snapshot(current)) if Rc::ptr_eq(&current, &next) => {
                view.set_options(OptionsSlot::Snapshot(current));
                return false;
            }
            Some(OptionsSlot::Snapshot(current)) => PrivateOptions::copy_of(&current),
            Some(OptionsSlot::Private(private))
                if private.reshare.as_ref().is_some_and(|reshare| Rc::ptr_eq(&reshare.next, &next)) =>
            {
                view.set_options(OptionsSlot::Private(private));
                return false;
            }
            Some(OptionsSlot::Private(private)) => private,
        };

        let started = !self.animate(&mut private.view, next.values().clone()).is_empty();
        if !private.view.is_animating() {
            view.set_options(OptionsSlot::Snapshot(next));
            return started;
        }

        private.reshare = if next.is_shared() {
            let awaiting: BTreeSet<String> = private.view.running_keys().map(str::to_string).collect();
            Some(PendingReshare { next, awaiting })
        } else {
            None
        };
        view.set_options(OptionsSlot::Private(private));
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertyAnimation;
    use crate::easing::Easing;

    fn coordinator() -> AnimationsCoordinator {
        let mut registry = PropertyRegistry::new();
        registry.insert("x", PropertyAnimation::new(100.0, Easing::Linear));
        registry.insert("backgroundColor", PropertyAnimation::new(100.0, Easing::Linear));
        registry.insert("still", PropertyAnimation::new(0.0, Easing::Linear));
        AnimationsCoordinator::new(registry)
    }

    fn fill(color: &str) -> Rc<OptionsSnapshot> {
        Rc::new(OptionsSnapshot::new_shared(PropertyMap::from([(
            "backgroundColor".to_string(),
            AnimValue::from(color),
        )])))
    }

    #[test]
    fn test_non_animated_values_apply_immediately() {
        let coordinator = coordinator();
        let mut view = ViewState::new();
        let started = coordinator.update(
            &mut view,
            TargetUpdate::new().with_value("label", "a").with_value("still", 2.0),
        );
        assert!(!started);
        assert_eq!(view.color("label"), Some("a"));
        assert_eq!(view.number("still"), Some(2.0));
        assert_eq!(view.running_count(), 0);
    }

    #[test]
    fn test_reserved_keys_are_skipped() {
        let coordinator = coordinator();
        let mut view = ViewState::new();
        coordinator.update(&mut view, TargetUpdate::new().with_value("$shared", true));
        assert!(view.get("$shared").is_none());
    }

    #[test]
    fn test_double_update_keeps_one_transition() {
        let coordinator = coordinator();
        let mut view = ViewState::with_values(PropertyMap::from([("x".to_string(), AnimValue::Number(0.0))]));

        assert!(coordinator.update(&mut view, TargetUpdate::new().with_value("x", 5.0)));
        coordinator.advance(&mut view, 50.0);
        assert!(coordinator.update(&mut view, TargetUpdate::new().with_value("x", 5.0)));

        assert_eq!(view.running_count(), 1);
        let running = view.running("x").map(|anim| anim.target().clone());
        assert_eq!(running, Some(AnimValue::Number(5.0)));

        assert!(coordinator.update(&mut view, TargetUpdate::new().with_value("x", 8.0)));
        assert_eq!(view.running_count(), 1);
        view.finish(coordinator.mixer());
        assert_eq!(view.number("x"), Some(8.0));
    }

    #[test]
    fn test_unchanged_value_does_not_animate() {
        let coordinator = coordinator();
        let mut view = ViewState::with_values(PropertyMap::from([("x".to_string(), AnimValue::Number(4.0))]));
        assert!(!coordinator.update(&mut view, TargetUpdate::new().with_value("x", 4.0)));
        assert_eq!(view.running_count(), 0);
    }

    #[test]
    fn test_disabled_applies_everything() {
        let coordinator = AnimationsCoordinator::disabled();
        let mut view = ViewState::new().with_options(fill("#000000"));
        let next = fill("#ffffff");
        let started = coordinator.update(
            &mut view,
            TargetUpdate::new().with_value("x", 3.0).with_options(next.clone()),
        );
        assert!(!started);
        assert_eq!(view.number("x"), Some(3.0));
        assert!(view.options_snapshot().is_some_and(|s| Rc::ptr_eq(s, &next)));
    }

    #[test]
    fn test_shared_options_copy_on_write() {
        let coordinator = coordinator();
        let original = fill("#000000");
        let mut a = ViewState::new().with_options(original.clone());
        let mut b = ViewState::new().with_options(original.clone());
        assert!(a.shares_options_with(&b));

        let next = fill("#ffffff");
        assert!(coordinator.update(&mut a, TargetUpdate::new().with_options(next.clone())));
        assert!(a.options_slot().is_some_and(OptionsSlot::is_private));
        assert!(!a.shares_options_with(&b));

        coordinator.advance(&mut a, 50.0);
        coordinator.advance(&mut b, 50.0);
        assert_eq!(a.option_color("backgroundColor"), Some("rgb(128, 128, 128)"));
        assert_eq!(b.option_color("backgroundColor"), Some("#000000"));
        assert_eq!(original.get("backgroundColor"), Some(&AnimValue::from("#000000")));

        coordinator.advance(&mut a, 50.0);
        assert!(a.options_snapshot().is_some_and(|s| Rc::ptr_eq(s, &next)));

        coordinator.update(&mut b, TargetUpdate::new().with_options(next.clone()));
        b.finish(coordinator.mixer());
        assert!(a.shares_options_with(&b));
    }

    #[test]
    fn test_same_pending_snapshot_is_noop() {
        let coordinator = coordinator();
        let mut view = ViewState::new().with_options(fill("#000000"));
        let next = fill("#ffffff");
        coordinator.update(&mut view, TargetUpdate::new().with_options(next.clone()));
        coordinator.advance(&mut view, 60.0);
        let remaining = view.remaining_ms();

        assert!(!coordinator.update(&mut view, TargetUpdate::new().with_options(next.clone())));
        assert_eq!(view.remaining_ms(), remaining);
        coordinator.advance(&mut view, 40.0);
        assert!(view.options_snapshot().is_some_and(|s| Rc::ptr_eq(s, &next)));
    }

    #[test]
    fn test_cancel_drops_reshare() {
        let coordinator = coordinator();
        let mut view = ViewState::new().with_options(fill("#000000"));
        coordinator.update(&mut view, TargetUpdate::new().with_options(fill("#ffffff")));
        view.cancel_all();
        view.finish(coordinator.mixer());
        assert!(view.options_slot().is_some_and(OptionsSlot::is_private));
        assert!(!view.is_animating());
    }

    #[test]
    fn test_private_target_stays_private() {
        let coordinator = coordinator();
        let mut view = ViewState::new().with_options(fill("#000000"));
        let values = PropertyMap::from([("backgroundColor".to_string(), AnimValue::from("#ffffff"))]);
        coordinator.update(
            &mut view,
            TargetUpdate::new().with_options(Rc::new(OptionsSnapshot::new_private(values))),
        );
        view.finish(coordinator.mixer());
        assert!(view.options_slot().is_some_and(OptionsSlot::is_private));
        assert_eq!(view.option_color("backgroundColor"), Some("#ffffff"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_at_most_one_transition_per_property(
                steps in prop::collection::vec((-1000.0f64..1000.0, 0.0f64..80.0), 1..20)
            ) {
                let coordinator = coordinator();
                let mut view = ViewState::new();
                for (target, delta) in &steps {
                    coordinator.update(&mut view, TargetUpdate::new().with_value("x", *target));
                    prop_assert!(view.running_count() <= 1);
                    coordinator.advance(&mut view, *delta);
                }
                view.finish(coordinator.mixer());
                let last = steps.last().map(|(target, _)| *target);
                prop_assert_eq!(view.number("x"), last);
            }
        }
    }
}
