use ratatui::prelude::*;

/// Backend reachability indicator for the tab bar
pub fn health_span(backend_ok: Option<bool>) -> Span<'static> {
    match backend_ok {
        Some(true) => Span::styled(" [*]", Style::default().fg(Color::Green)),
        Some(false) => Span::styled(" [!]", Style::default().fg(Color::Red)),
        None => Span::raw(""),
    }
}

/// Truncate text to `max` characters, appending an ellipsis when it is cut.
/// Operates on char boundaries, so multi-byte titles are safe.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Naruto", 20), "Naruto");
    }

    #[test]
    fn test_truncate_cuts_on_char_boundary() {
        assert_eq!(truncate("呪術廻戦", 3), "呪術…");
    }
}
