//! Input router
//!
//! Turns key events from either keyboard into edit actions for the active
//! window. Owns the modifier state, the physical-listener guard and the
//! queue of work deferred to the next tick.

use std::collections::VecDeque;

use super::keys::{resolve_key, KeySource, LogicalKey, ModifierState};
use crate::config::EditorConfig;
use crate::models::WindowId;

/// What a keypress asks the editor to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Insert(String),
    LineBreak,
    Tab,
    DeleteBackward,
    Undo,
    /// The platform handles the key; the selection is re-captured next tick
    Native,
    /// Nothing to do (modifier latch, CapsLock, Escape, ...)
    Ignored,
}

impl KeyAction {
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            KeyAction::Insert(_) | KeyAction::LineBreak | KeyAction::Tab | KeyAction::DeleteBackward
        )
    }
}

/// Work scheduled for the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Re-read the live selection after native handling and persist it
    RecaptureSelection(WindowId),
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    active_window: Option<WindowId>,
    modifiers: ModifierState,
    listener_registered: bool,
    deferred: VecDeque<DeferredTask>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_window(&self) -> Option<&WindowId> {
        self.active_window.as_ref()
    }

    /// Last writer wins
    pub fn set_active_window(&mut self, window: Option<WindowId>) {
        self.active_window = window;
    }

    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut ModifierState {
        &mut self.modifiers
    }

    /// Mark the physical keyboard listener as installed.
    /// Returns `true` only for the first call.
    pub fn register_physical_listener(&mut self) -> bool {
        if self.listener_registered {
            return false;
        }
        self.listener_registered = true;
        true
    }

    pub fn is_listener_registered(&self) -> bool {
        self.listener_registered
    }

    pub fn defer(&mut self, task: DeferredTask) {
        self.deferred.push_back(task);
    }

    /// Drain deferred work in scheduling order
    pub fn take_deferred(&mut self) -> Vec<DeferredTask> {
        self.deferred.drain(..).collect()
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Route a key press. Without an active window nothing is routed, but
    /// modifier and CapsLock state still update.
    pub fn key_down(&mut self, key: &LogicalKey, source: KeySource, config: &EditorConfig) -> KeyAction {
        if key.is_modifier() {
            self.modifiers.set(key, true);
            return KeyAction::Ignored;
        }
        if *key == LogicalKey::CapsLock {
            self.modifiers.toggle_caps_lock();
            return KeyAction::Ignored;
        }

        let Some(window) = self.active_window.clone() else {
            return KeyAction::Ignored;
        };

        match key {
            LogicalKey::Character(ch) if self.modifiers.chord_held() => {
                if source == KeySource::Physical && ch.eq_ignore_ascii_case("z") {
                    KeyAction::Undo
                } else {
                    KeyAction::Native
                }
            }
            LogicalKey::Character(ch) => {
                let mapping = config.layout().find(ch);
                KeyAction::Insert(resolve_key(ch, mapping, &self.modifiers))
            }
            LogicalKey::Space => KeyAction::Insert(" ".to_string()),
            LogicalKey::Backspace => KeyAction::DeleteBackward,
            LogicalKey::Enter | LogicalKey::Tab
                if source == KeySource::Physical && config.native_navigation_keys =>
            {
                self.defer(DeferredTask::RecaptureSelection(window));
                KeyAction::Native
            }
            LogicalKey::Enter => KeyAction::LineBreak,
            LogicalKey::Tab => KeyAction::Tab,
            LogicalKey::Navigation(_) if source == KeySource::Physical => {
                self.defer(DeferredTask::RecaptureSelection(window));
                KeyAction::Native
            }
            _ => KeyAction::Ignored,
        }
    }

    /// Key release: modifiers unlatch
    pub fn key_up(&mut self, key: &LogicalKey) {
        if key.is_modifier() {
            self.modifiers.set(key, false);
        }
    }

    /// Forget modifier state and pending work between sessions
    pub fn reset(&mut self) {
        self.modifiers.reset();
        self.deferred.clear();
    }
}
