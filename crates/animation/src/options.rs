//! Option snapshots shared between elements
//!
//! Elements of one dataset point at the same [`OptionsSnapshot`]. The first
//! animated change to an element's options moves that element onto a private
//! copy; once the copy's transitions finish the element points at the new
//! snapshot again.

use crate::value::{AnimValue, PropertyMap};
use crate::view_state::ViewState;
use std::collections::BTreeSet;
use std::rc::Rc;

/// An immutable set of resolved option values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionsSnapshot {
    values: PropertyMap,
    shared: bool,
}

impl OptionsSnapshot {
    /// Snapshot meant to be referenced by several elements
    pub fn new_shared(values: PropertyMap) -> Self {
        Self { values, shared: true }
    }

    /// Snapshot owned by a single element
    pub fn new_private(values: PropertyMap) -> Self {
        Self { values, shared: false }
    }

    pub fn values(&self) -> &PropertyMap {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&AnimValue> {
        self.values.get(key)
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

/// Snapshot to return to once the awaited properties settle
#[derive(Debug, Clone)]
pub struct PendingReshare {
    pub next: Rc<OptionsSnapshot>,
    pub awaiting: BTreeSet<String>,
}

/// An element's own, animatable copy of its options
#[derive(Debug, Clone)]
pub struct PrivateOptions {
    pub view: Box<ViewState>,
    pub reshare: Option<PendingReshare>,
}

impl PrivateOptions {
    /// Copy-on-write of a snapshot
    pub fn copy_of(snapshot: &OptionsSnapshot) -> Self {
        Self {
            view: Box::new(ViewState::with_values(snapshot.values().clone())),
            reshare: None,
        }
    }
}

/// Where an element's options currently live
#[derive(Debug, Clone)]
pub enum OptionsSlot {
    /// Read-only reference, possibly shared with other elements
    Snapshot(Rc<OptionsSnapshot>),
    /// Private copy, animating or diverged
    Private(PrivateOptions),
}

impl OptionsSlot {
    pub fn get(&self, key: &str) -> Option<&AnimValue> {
        match self {
            OptionsSlot::Snapshot(snapshot) => snapshot.get(key),
            OptionsSlot::Private(private) => private.view.get(key),
        }
    }

    pub fn snapshot(&self) -> Option<&Rc<OptionsSnapshot>> {
        match self {
            OptionsSlot::Snapshot(snapshot) => Some(snapshot),
            OptionsSlot::Private(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, OptionsSlot::Private(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(color: &str) -> PropertyMap {
        PropertyMap::from([("backgroundColor".to_string(), AnimValue::from(color))])
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = OptionsSnapshot::new_shared(colors("#ff0000"));
        assert!(snapshot.is_shared());
        assert_eq!(snapshot.get("backgroundColor"), Some(&AnimValue::from("#ff0000")));
        assert!(!OptionsSnapshot::new_private(PropertyMap::new()).is_shared());
    }

    #[test]
    fn test_copy_of_snapshot() {
        let snapshot = Rc::new(OptionsSnapshot::new_shared(colors("#00ff00")));
        let slot = OptionsSlot::Private(PrivateOptions::copy_of(&snapshot));
        assert!(slot.is_private());
        assert!(slot.snapshot().is_none());
        assert_eq!(slot.get("backgroundColor"), Some(&AnimValue::from("#00ff00")));
    }
}
