//! Logical keys, modifier state and key resolution

use serde::{Deserialize, Serialize};

use super::layout::KeyMapping;

/// Where a keypress came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    Virtual,
    Physical,
}

/// Keys the platform moves the caret for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// A keypress normalized from a key name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalKey {
    /// A key that produces text
    Character(String),
    Space,
    Enter,
    Backspace,
    Tab,
    CapsLock,
    Shift,
    Alt,
    Control,
    Meta,
    Escape,
    Navigation(NavigationKey),
    /// Any other named key (function keys, media keys, ...)
    Other(String),
}

impl LogicalKey {
    /// Normalize a key name (`KeyboardEvent.key` or a virtual key label).
    /// Names are case-insensitive; a single character is text.
    pub fn from_name(name: &str) -> Self {
        if name == " " {
            return LogicalKey::Space;
        }
        if name.chars().count() == 1 {
            return LogicalKey::Character(name.to_string());
        }

        match name.to_uppercase().as_str() {
            "SPACE" => LogicalKey::Space,
            "ENTER" => LogicalKey::Enter,
            "BACKSPACE" => LogicalKey::Backspace,
            "TAB" => LogicalKey::Tab,
            "CAPSLOCK" | "CAPS" => LogicalKey::CapsLock,
            "SHIFT" => LogicalKey::Shift,
            "ALT" | "ALTGRAPH" => LogicalKey::Alt,
            "CONTROL" | "CTRL" => LogicalKey::Control,
            "META" | "OS" => LogicalKey::Meta,
            "ESCAPE" | "ESC" => LogicalKey::Escape,
            "ARROWLEFT" => LogicalKey::Navigation(NavigationKey::Left),
            "ARROWRIGHT" => LogicalKey::Navigation(NavigationKey::Right),
            "ARROWUP" => LogicalKey::Navigation(NavigationKey::Up),
            "ARROWDOWN" => LogicalKey::Navigation(NavigationKey::Down),
            "HOME" => LogicalKey::Navigation(NavigationKey::Home),
            "END" => LogicalKey::Navigation(NavigationKey::End),
            "PAGEUP" => LogicalKey::Navigation(NavigationKey::PageUp),
            "PAGEDOWN" => LogicalKey::Navigation(NavigationKey::PageDown),
            _ => LogicalKey::Other(name.to_string()),
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            LogicalKey::Shift | LogicalKey::Alt | LogicalKey::Control | LogicalKey::Meta
        )
    }
}

/// Which mapping set the keyboard is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyboardLanguage {
    /// Latin layout (the key labels themselves)
    #[default]
    Primary,
    /// Non-Latin mapping (`secondary` entries of the layout)
    Secondary,
}

/// Transient modifier state, owned by the input router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
    pub meta: bool,
    pub caps_lock: bool,
    pub language: KeyboardLanguage,
}

impl ModifierState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_caps_lock(&mut self) {
        self.caps_lock = !self.caps_lock;
    }

    pub fn toggle_language(&mut self) {
        self.language = match self.language {
            KeyboardLanguage::Primary => KeyboardLanguage::Secondary,
            KeyboardLanguage::Secondary => KeyboardLanguage::Primary,
        };
    }

    /// Control or Meta held (shortcut chord)
    pub fn chord_held(&self) -> bool {
        self.control || self.meta
    }

    /// Latch or release a modifier key
    pub fn set(&mut self, key: &LogicalKey, pressed: bool) {
        match key {
            LogicalKey::Shift => self.shift = pressed,
            LogicalKey::Alt => self.alt = pressed,
            LogicalKey::Control => self.control = pressed,
            LogicalKey::Meta => self.meta = pressed,
            _ => {}
        }
    }
}

/// Resolve the text a character key inserts.
///
/// Order: secondary-language mapping, shift mapping, alt mapping, CapsLock
/// uppercase (single characters only), lowercase.
pub fn resolve_key(key: &str, mapping: Option<&KeyMapping>, modifiers: &ModifierState) -> String {
    if let Some(mapping) = mapping {
        if modifiers.language == KeyboardLanguage::Secondary {
            if let Some(secondary) = &mapping.secondary {
                return secondary.clone();
            }
        }
        if modifiers.shift {
            if let Some(shifted) = &mapping.shift {
                return shifted.clone();
            }
        }
        if modifiers.alt {
            if let Some(alt) = &mapping.alt {
                return alt.clone();
            }
        }
    }

    if modifiers.caps_lock && key.chars().count() == 1 {
        key.to_uppercase()
    } else {
        key.to_lowercase()
    }
}
