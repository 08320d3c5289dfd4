//! Key binding reference shown in the help overlay.

/// Every binding as (keys, description), global ones first.
pub fn key_bindings_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("q / Ctrl+C", "Quit"),
        ("?", "Toggle this help"),
        ("Esc", "Back: close the top-most drawer"),
        ("Tab / Shift+Tab", "Move focus inside the top drawer"),
        ("Enter / Space", "Activate the focused element"),
        ("C", "Close every drawer"),
        ("P", "Simulate memory pressure (drop kept drawers)"),
        ("j / k", "Move through the itinerary"),
        ("Enter", "Choose a place for the selected stop"),
        ("s", "Trip settings (keeps its state when closed)"),
        ("m", "Edit a meal for the selected stop"),
        ("h", "Pick a hotel (fullscreen)"),
        ("z", "Cycle drawer size: default, sm, md, lg, xl, full"),
        ("Mouse drag", "Pull a bottom sheet down to dismiss it"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings_help() {
        let bindings = key_bindings_help();
        assert!(!bindings.is_empty());
        assert_eq!(bindings[0].0, "q / Ctrl+C");
    }

    #[test]
    fn test_bindings_have_descriptions() {
        assert!(key_bindings_help().iter().all(|(k, d)| !k.is_empty() && !d.is_empty()));
    }
}
