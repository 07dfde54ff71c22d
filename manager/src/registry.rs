//! Bookkeeping for open windows and the active-window pointer.

use crate::config::CloseFocus;
use crate::presentation::{Modality, ViewHandle, ViewModel, WindowId};
use crate::scope::WindowScope;
use parking_lot::Mutex;
use std::collections::HashMap;

pub(crate) type SharedRegistry = Mutex<WindowRegistry>;

/// Everything the manager keeps for one open window. The entry owns the
/// window's scope; nothing else disposes it.
pub(crate) struct WindowEntry {
  pub(crate) view_model: ViewModel,
  pub(crate) view: ViewHandle,
  pub(crate) scope: Box<dyn WindowScope>,
  pub(crate) modality: Modality,
  pub(crate) active: bool,
}

pub(crate) struct WindowRegistry {
  entries: HashMap<WindowId, WindowEntry>,
  // Least recently activated first.
  activation_order: Vec<WindowId>,
  active: Option<WindowId>,
  next_id: u64,
  close_focus: CloseFocus,
}

impl WindowRegistry {
  pub(crate) fn new(close_focus: CloseFocus) -> Self {
    Self {
      entries: HashMap::new(),
      activation_order: Vec::new(),
      active: None,
      next_id: 1,
      close_focus,
    }
  }

  pub(crate) fn allocate_id(&mut self) -> WindowId {
    let id = WindowId::new(self.next_id);
    self.next_id += 1;
    id
  }

  pub(crate) fn active(&self) -> Option<WindowId> {
    self.active
  }

  pub(crate) fn get(&self, id: WindowId) -> Option<&WindowEntry> {
    self.entries.get(&id)
  }

  pub(crate) fn contains(&self, id: WindowId) -> bool {
    self.entries.contains_key(&id)
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  pub(crate) fn ids(&self) -> Vec<WindowId> {
    let mut ids: Vec<WindowId> = self.entries.keys().copied().collect();
    ids.sort();
    ids
  }

  /// Registers a freshly shown window and makes it the active one.
  pub(crate) fn insert(&mut self, id: WindowId, entry: WindowEntry) {
    self.entries.insert(id, entry);
    self.activate(id);
  }

  pub(crate) fn activate(&mut self, id: WindowId) -> bool {
    if !self.entries.contains_key(&id) {
      return false;
    }
    self.activation_order.retain(|&w| w != id);
    self.activation_order.push(id);
    self.set_active(Some(id));
    true
  }

  pub(crate) fn deactivate(&mut self, id: WindowId) -> bool {
    if self.active != Some(id) {
      return false;
    }
    self.set_active(None);
    true
  }

  /// Removes a closed window and repairs the active pointer.
  pub(crate) fn remove(&mut self, id: WindowId) -> Option<WindowEntry> {
    let entry = self.entries.remove(&id)?;
    self.activation_order.retain(|&w| w != id);
    if self.active == Some(id) {
      let next = match self.close_focus {
        CloseFocus::MostRecentlyActivated => self.activation_order.last().copied(),
        CloseFocus::Clear => None,
      };
      self.set_active(next);
    }
    Some(entry)
  }

  /// Undoes [`insert`](Self::insert) for a window the host failed to show,
  /// putting the previously active window back.
  pub(crate) fn rollback(&mut self, id: WindowId, previous: Option<WindowId>) -> Option<WindowEntry> {
    let entry = self.entries.remove(&id)?;
    self.activation_order.retain(|&w| w != id);
    let restored = previous.filter(|p| self.entries.contains_key(p));
    self.set_active(restored);
    Some(entry)
  }

  /// Empties the registry, handing back every entry still open.
  pub(crate) fn drain(&mut self) -> Vec<(WindowId, WindowEntry)> {
    self.activation_order.clear();
    self.active = None;
    self.entries.drain().collect()
  }

  // Keeps the per-entry flags in step with the pointer.
  fn set_active(&mut self, next: Option<WindowId>) {
    if self.active == next {
      return;
    }
    if let Some(entry) = self.active.and_then(|prev| self.entries.get_mut(&prev)) {
      entry.active = false;
    }
    if let Some(entry) = next.and_then(|id| self.entries.get_mut(&id)) {
      entry.active = true;
    }
    tracing::trace!(from = ?self.active, to = ?next, "active window changed");
    self.active = next;
  }
}

pub(crate) fn activate(registry: &SharedRegistry, id: WindowId) -> bool {
  let changed = registry.lock().activate(id);
  if changed {
    tracing::debug!(window = %id, "window activated");
  }
  changed
}

pub(crate) fn deactivate(registry: &SharedRegistry, id: WindowId) -> bool {
  let changed = registry.lock().deactivate(id);
  if changed {
    tracing::debug!(window = %id, "window deactivated");
  }
  changed
}

/// Forgets a closed window and disposes its scope.
///
/// Returns `false` if the window was not open, which makes a repeated close a
/// no-op. The scope is disposed after the lock is released so its teardown
/// can call back into the manager.
pub(crate) fn close(registry: &SharedRegistry, id: WindowId) -> bool {
  let (entry, active) = {
    let mut guard = registry.lock();
    let entry = guard.remove(id);
    (entry, guard.active())
  };

  match entry {
    Some(entry) => {
      entry.scope.dispose();
      tracing::debug!(window = %id, view_model = entry.view_model.type_name(), active = ?active, "window closed");
      true
    }
    None => {
      tracing::trace!(window = %id, "close ignored for a window that is not open");
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Result;
  use casement_ioc::{Instance, ServiceKey};
  use pretty_assertions::assert_eq;
  use std::sync::Arc;

  struct NullScope;

  impl WindowScope for NullScope {
    fn create_instance(&self, key: &ServiceKey) -> Result<Instance> {
      Err(crate::WindowError::UnresolvedType {
        type_name: key.type_name(),
        name: None,
      })
    }

    fn dispose(&self) {}

    fn is_disposed(&self) -> bool {
      false
    }
  }

  fn entry() -> WindowEntry {
    WindowEntry {
      view_model: ViewModel::new(Arc::new(())),
      view: ViewHandle::new(Arc::new(())),
      scope: Box::new(NullScope),
      modality: Modality::Modeless,
      active: false,
    }
  }

  fn open(registry: &mut WindowRegistry) -> WindowId {
    let id = registry.allocate_id();
    registry.insert(id, entry());
    id
  }

  fn active_flags(registry: &WindowRegistry) -> Vec<WindowId> {
    registry
      .ids()
      .into_iter()
      .filter(|id| registry.get(*id).is_some_and(|e| e.active))
      .collect()
  }

  #[test]
  fn ids_are_never_reused() {
    let mut registry = WindowRegistry::new(CloseFocus::default());
    let a = open(&mut registry);
    registry.remove(a);
    let b = open(&mut registry);
    assert!(b > a);
  }

  #[test]
  fn last_shown_wins_and_close_falls_back_to_most_recent() {
    let mut registry = WindowRegistry::new(CloseFocus::MostRecentlyActivated);
    let a = open(&mut registry);
    let b = open(&mut registry);
    let c = open(&mut registry);
    assert_eq!(registry.active(), Some(c));

    // Bring `a` forward, then close the active one.
    registry.activate(a);
    registry.remove(a);
    assert_eq!(registry.active(), Some(c));

    registry.remove(c);
    assert_eq!(registry.active(), Some(b));
    assert_eq!(active_flags(&registry), vec![b]);

    registry.remove(b);
    assert_eq!(registry.active(), None);
  }

  #[test]
  fn clear_focus_policy_leaves_nothing_active() {
    let mut registry = WindowRegistry::new(CloseFocus::Clear);
    let a = open(&mut registry);
    let b = open(&mut registry);

    registry.remove(b);

    assert_eq!(registry.active(), None);
    assert!(registry.contains(a));
    assert_eq!(active_flags(&registry), Vec::<WindowId>::new());
  }

  #[test]
  fn at_most_one_entry_is_flagged_active() {
    let mut registry = WindowRegistry::new(CloseFocus::default());
    let a = open(&mut registry);
    let b = open(&mut registry);
    registry.activate(a);
    assert_eq!(active_flags(&registry), vec![a]);

    registry.deactivate(a);
    assert_eq!(active_flags(&registry), Vec::<WindowId>::new());

    // Deactivating a window that is not active changes nothing.
    registry.activate(b);
    assert!(!registry.deactivate(a));
    assert_eq!(registry.active(), Some(b));
  }

  #[test]
  fn closing_an_inactive_window_keeps_the_active_one() {
    let mut registry = WindowRegistry::new(CloseFocus::default());
    let a = open(&mut registry);
    let b = open(&mut registry);

    registry.remove(a);

    assert_eq!(registry.active(), Some(b));
  }

  #[test]
  fn rollback_restores_the_previous_active_window() {
    let mut registry = WindowRegistry::new(CloseFocus::default());
    let a = open(&mut registry);
    registry.deactivate(a);

    let b = registry.allocate_id();
    registry.insert(b, entry());
    assert_eq!(registry.active(), Some(b));

    assert!(registry.rollback(b, None).is_some());
    assert_eq!(registry.active(), None);
    assert_eq!(registry.ids(), vec![a]);
  }

  #[test]
  fn unknown_windows_are_ignored() {
    let mut registry = WindowRegistry::new(CloseFocus::default());
    let ghost = registry.allocate_id();

    assert!(!registry.activate(ghost));
    assert!(registry.remove(ghost).is_none());
    assert_eq!(registry.active(), None);
  }
}
