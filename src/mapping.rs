//! Button-to-action mapping table
//!
//! The table is shared between the dispatch loop (read path, consulted on
//! every button event) and the settings surface (write path). Reads take
//! one consistent snapshot per lookup; writes replace an entry or the whole
//! map under the write lock, so a concurrent dispatch iteration never sees
//! a torn table.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::action::Action;
use crate::RiffmapError;

/// Stable index of a physical controller button (SDL button index width).
pub type ButtonId = u8;

/// Built-in PS5-style default layout, same shape as the persisted config.
/// Button indices vary by OS/driver; these are common for Windows.
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("0", "z"),            // Green Button
    ("1", "x"),            // Red Button
    ("3", "c"),            // Yellow Button
    ("2", "v"),            // Blue Button
    ("9", "b"),            // Orange Button
    ("4", "Key.enter"),    // Share
    ("6", "Key.esc"),      // Options
    ("7", "Key.space"),    // Joystick Button
    ("11", "Button.right"), // D-Pad Up -> RMB
    ("12", "Button.left"), // D-Pad Down -> LMB
    ("13", "Key.left"),    // D-Pad Left
    ("14", "Key.right"),   // D-Pad Right
];

/// Friendly label for a button id, for logs and the settings surface.
/// Ids outside the documented set are still mappable, just unlabeled.
pub fn button_label(id: ButtonId) -> String {
    let name = match id {
        0 => "Green Button",
        1 => "Red Button",
        2 => "Blue Button",
        3 => "Yellow Button",
        4 => "Share",
        6 => "Options",
        7 => "Joystick Btn",
        9 => "Orange Button",
        11 => "D-Pad Up",
        12 => "D-Pad Down",
        13 => "D-Pad Left",
        14 => "D-Pad Right",
        _ => return format!("Button {}", id),
    };
    format!("{} ({})", name, id)
}

/// Shared, hot-swappable mapping from button id to action.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    inner: Arc<RwLock<HashMap<ButtonId, Action>>>,
}

impl MappingTable {
    /// Merges `defaults` with `overrides` (override wins per key) and
    /// parses every value. Entries with a non-numeric key or an
    /// unparseable value are skipped with a warning, never fatal.
    pub fn build(
        defaults: &HashMap<String, String>,
        overrides: &HashMap<String, String>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(parse_entries(defaults, overrides))),
        }
    }

    /// Looks up the action for a button. Returns a clone of the entry as it
    /// stands right now; absent is not an error.
    pub fn lookup(&self, button: ButtonId) -> Option<Action> {
        self.inner
            .read()
            .expect("mapping table lock poisoned")
            .get(&button)
            .cloned()
    }

    /// Reparses `raw` and replaces the entry for `button` atomically.
    /// On a parse failure the previous entry is kept and the error returned.
    pub fn update(&self, button: ButtonId, raw: &str) -> Result<(), RiffmapError> {
        let action: Action = raw.parse()?;
        self.inner
            .write()
            .expect("mapping table lock poisoned")
            .insert(button, action);
        Ok(())
    }

    /// Rebuilds the whole table from fresh maps and swaps it in wholesale.
    /// Used when the settings surface commits a full new configuration.
    pub fn reload(
        &self,
        defaults: &HashMap<String, String>,
        overrides: &HashMap<String, String>,
    ) {
        let entries = parse_entries(defaults, overrides);
        *self
            .inner
            .write()
            .expect("mapping table lock poisoned") = entries;
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("mapping table lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_entries(
    defaults: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<ButtonId, Action> {
    let mut merged: HashMap<&str, &str> = defaults
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    for (k, v) in overrides {
        merged.insert(k, v);
    }

    let mut entries = HashMap::new();
    for (key, value) in merged {
        let button: ButtonId = match key.parse() {
            Ok(id) => id,
            Err(_) => {
                warn!("Ignoring mapping entry with non-numeric button id '{}'", key);
                continue;
            }
        };
        match value.parse::<Action>() {
            Ok(action) => {
                entries.insert(button, action);
            }
            Err(e) => warn!("Skipping mapping for button {}: {}", key, e),
        }
    }
    entries
}

/// The built-in defaults as an owned map, ready to merge with overrides.
pub fn default_mapping() -> HashMap<String, String> {
    DEFAULT_MAPPING
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MouseButton, NamedKey};

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn override_wins_per_key() {
        let defaults = map(&[("0", "z"), ("1", "x")]);
        let overrides = map(&[("0", "Key.space")]);
        let table = MappingTable::build(&defaults, &overrides);

        assert_eq!(table.lookup(0), Some(Action::NamedKey(NamedKey::Space)));
        assert_eq!(table.lookup(1), Some(Action::Character("x".into())));
    }

    #[test]
    fn bad_values_are_skipped_not_fatal() {
        let defaults = map(&[("0", "z"), ("1", "Key.warp"), ("2", "")]);
        let table = MappingTable::build(&defaults, &HashMap::new());

        assert_eq!(table.lookup(0), Some(Action::Character("z".into())));
        assert_eq!(table.lookup(1), None);
        assert_eq!(table.lookup(2), None);
    }

    #[test]
    fn non_numeric_keys_are_skipped() {
        let defaults = map(&[("zero", "z"), ("3", "c")]);
        let table = MappingTable::build(&defaults, &HashMap::new());

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(3), Some(Action::Character("c".into())));
    }

    #[test]
    fn update_replaces_a_single_entry() {
        let table = MappingTable::build(&map(&[("0", "z"), ("1", "x")]), &HashMap::new());
        table.update(0, "Button.left").unwrap();

        assert_eq!(table.lookup(0), Some(Action::MouseButton(MouseButton::Left)));
        assert_eq!(table.lookup(1), Some(Action::Character("x".into())));
    }

    #[test]
    fn failed_update_keeps_previous_entry() {
        let table = MappingTable::build(&map(&[("0", "z")]), &HashMap::new());
        assert!(table.update(0, "Key.warp").is_err());
        assert_eq!(table.lookup(0), Some(Action::Character("z".into())));
    }

    #[test]
    fn reload_swaps_the_whole_table() {
        let table = MappingTable::build(&map(&[("0", "z"), ("1", "x")]), &HashMap::new());
        table.reload(&map(&[("5", "Key.tab")]), &HashMap::new());

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(0), None);
        assert_eq!(table.lookup(5), Some(Action::NamedKey(NamedKey::Tab)));
    }

    #[test]
    fn clones_share_the_same_table() {
        let table = MappingTable::build(&map(&[("0", "z")]), &HashMap::new());
        let handle = table.clone();
        handle.update(0, "Key.enter").unwrap();

        assert_eq!(table.lookup(0), Some(Action::NamedKey(NamedKey::Enter)));
    }

    #[test]
    fn builtin_defaults_all_parse() {
        let table = MappingTable::build(&default_mapping(), &HashMap::new());
        assert_eq!(table.len(), DEFAULT_MAPPING.len());
        assert_eq!(table.lookup(12), Some(Action::MouseButton(MouseButton::Left)));
    }

    #[test]
    fn unlabeled_ids_get_a_generic_label() {
        assert_eq!(button_label(0), "Green Button (0)");
        assert_eq!(button_label(42), "Button 42");
    }
}
