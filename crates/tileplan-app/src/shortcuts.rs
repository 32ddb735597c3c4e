//! Keyboard and mouse shortcut documentation.

use tileplan_core::KeyBindings;

/// A shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: String,
    pub description: &'static str,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, description: &'static str) -> Self {
        Self {
            key: key.into(),
            description,
        }
    }

    /// Format the shortcut for display (e.g., "S", "Esc").
    pub fn format(&self) -> String {
        match self.key.as_str() {
            "Escape" => "Esc".to_string(),
            key if key.chars().count() == 1 => key.to_uppercase(),
            key => key.to_string(),
        }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// All shortcuts for the given key bindings.
    pub fn all(keys: &KeyBindings) -> Vec<Shortcut> {
        vec![
            Shortcut::new(keys.store.as_str(), "Toggle store placement"),
            Shortcut::new(keys.track.as_str(), "Toggle track placement"),
            Shortcut::new(keys.cancel.as_str(), "Cancel pending placement"),
            Shortcut::new(keys.reset_view.as_str(), "Reset pan and zoom"),
            Shortcut::new("Drag", "Pan the view (no tool active)"),
            Shortcut::new("Wheel", "Zoom in and out"),
        ]
    }

    /// Print all shortcuts to the console.
    pub fn print_all(keys: &KeyBindings) {
        println!("\n=== Shortcuts ===");
        for shortcut in Self::all(keys) {
            println!("  {:8} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }

    /// Log all shortcuts at info level.
    pub fn log_all(keys: &KeyBindings) {
        let summary: Vec<String> = Self::all(keys)
            .iter()
            .map(|shortcut| format!("{}={}", shortcut.format(), shortcut.description))
            .collect();
        log::info!("Shortcuts: {}", summary.join(", "));
    }
}
