use crossterm::event::{Event, KeyCode, KeyEventKind};

/// The key of a key press event, `None` for releases, repeats and every other event
pub(super) fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}

/// Whether `key` closes the viewer
pub(super) fn is_quit(key: KeyCode) -> bool {
    matches!(key, KeyCode::Char('q') | KeyCode::Esc)
}
