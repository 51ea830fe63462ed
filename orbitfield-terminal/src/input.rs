/// Translation of crossterm events into scene and panel actions
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

/// Wheel delta reported for one scroll notch, matching a browser `deltaY`.
pub const WHEEL_NOTCH: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Wheel(f32),
    Pointer { column: u16, row: u16 },
    Resize(u16, u16),
    TogglePanel,
    SelectNext,
    SelectPrevious,
    Adjust(i32),
    Quit,
}

pub fn map_event(event: &Event) -> Option<Input> {
    match event {
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => match kind {
            MouseEventKind::ScrollDown => Some(Input::Wheel(WHEEL_NOTCH)),
            MouseEventKind::ScrollUp => Some(Input::Wheel(-WHEEL_NOTCH)),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Input::Pointer {
                column: *column,
                row: *row,
            }),
            _ => None,
        },
        Event::Resize(width, height) => Some(Input::Resize(*width, *height)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(Input::TogglePanel),
        KeyCode::Tab | KeyCode::Down => Some(Input::SelectNext),
        KeyCode::BackTab | KeyCode::Up => Some(Input::SelectPrevious),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => Some(Input::Adjust(steps)),
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('_') => Some(Input::Adjust(-steps)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_scroll_maps_to_wheel_delta() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollDown, 0, 0)),
            Some(Input::Wheel(100.0))
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            Some(Input::Wheel(-100.0))
        );
    }

    #[test]
    fn test_motion_maps_to_pointer() {
        let expected = Some(Input::Pointer { column: 12, row: 7 });
        assert_eq!(map_event(&mouse(MouseEventKind::Moved, 12, 7)), expected);
        assert_eq!(
            map_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 12, 7)),
            expected
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 7)),
            None
        );
    }

    #[test]
    fn test_resize_passes_through() {
        assert_eq!(map_event(&Event::Resize(100, 30)), Some(Input::Resize(100, 30)));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_event(&key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(Input::Quit));
        assert_eq!(map_event(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(Input::Quit));
        assert_eq!(
            map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(map_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_panel_keys() {
        assert_eq!(
            map_event(&key(KeyCode::Char('g'), KeyModifiers::NONE)),
            Some(Input::TogglePanel)
        );
        assert_eq!(map_event(&key(KeyCode::Tab, KeyModifiers::NONE)), Some(Input::SelectNext));
        assert_eq!(map_event(&key(KeyCode::Up, KeyModifiers::NONE)), Some(Input::SelectPrevious));
        assert_eq!(map_event(&key(KeyCode::Right, KeyModifiers::NONE)), Some(Input::Adjust(1)));
        assert_eq!(map_event(&key(KeyCode::Left, KeyModifiers::SHIFT)), Some(Input::Adjust(-10)));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&release), None);
    }
}
