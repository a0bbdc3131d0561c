//! Caller-owned ambient context merged into events

use std::collections::{BTreeMap, VecDeque};

use crate::breadcrumb::Breadcrumb;
use crate::event::Event;
use crate::user::UserInfo;

/// Ambient context owned by the caller across one logical unit of work
///
/// A scope holds the active breadcrumb trail plus tags, extra data and user
/// information, and is merged into every event produced during its lifetime.
/// The assembler never mutates a scope except through [`add_breadcrumb`].
///
/// [`add_breadcrumb`]: Scope::add_breadcrumb
#[derive(Debug, Clone, Default)]
pub struct Scope {
    breadcrumbs: VecDeque<Breadcrumb>,
    tags: BTreeMap<String, String>,
    extra: BTreeMap<String, serde_json::Value>,
    user: Option<UserInfo>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    pub fn set_user(&mut self, user: UserInfo) {
        self.user = Some(user);
    }

    /// Drop all ambient context held by this scope
    pub fn clear(&mut self) {
        self.breadcrumbs.clear();
        self.tags.clear();
        self.extra.clear();
        self.user = None;
    }

    pub fn breadcrumbs(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.breadcrumbs.iter()
    }

    /// Append a breadcrumb, evicting the oldest entries once `max` is reached
    pub fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb, max: usize) {
        if max == 0 {
            return;
        }
        while self.breadcrumbs.len() >= max {
            self.breadcrumbs.pop_front();
        }
        self.breadcrumbs.push_back(breadcrumb);
    }

    /// Apply this scope's context onto an assembled event
    ///
    /// Data already on the event wins on key collisions; the breadcrumb
    /// trail is attached wholesale.
    pub fn apply_to_event(&self, mut event: Event) -> Event {
        for (key, value) in &self.tags {
            event.tags.entry(key.clone()).or_insert_with(|| value.clone());
        }
        for (key, value) in &self.extra {
            event.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }
        if event.user.is_none() {
            event.user = self.user.clone();
        }
        event.breadcrumbs.extend(self.breadcrumbs.iter().cloned());
        event
    }
}
