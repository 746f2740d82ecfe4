use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;

use crate::events::AppEvent;
use crate::events::EditEvent;
use crate::events::Event;
use crate::events::SimEvent;

/// Converts a crossterm event into a simulation event. Events without a binding give `None`.
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(key_event) => convert_key(key_event),
        CrossTermEvent::Mouse(mouse_event) => convert_mouse(mouse_event),
        CrossTermEvent::Resize(cols, rows) => {
            Some(Event::AppEvent(AppEvent::Resize { cols, rows }))
        }
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    // Some platforms report releases too. Only act once per key press.
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    let event = match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        } => Event::AppEvent(AppEvent::Exit),

        KeyEvent {
            code: KeyCode::Char(' '),
            ..
        } => Event::SimEvent(SimEvent::TogglePlay),
        KeyEvent {
            code: KeyCode::Char('n'),
            ..
        } => Event::SimEvent(SimEvent::Step),
        KeyEvent {
            code: KeyCode::Char('c'),
            ..
        } => Event::SimEvent(SimEvent::Clear),
        KeyEvent {
            code: KeyCode::Char('r'),
            ..
        } => Event::SimEvent(SimEvent::Randomize),
        KeyEvent {
            code: KeyCode::Char('+' | '='),
            ..
        } => Event::SimEvent(SimEvent::Speed(1)),
        KeyEvent {
            code: KeyCode::Char('-'),
            ..
        } => Event::SimEvent(SimEvent::Speed(-1)),

        // cursor
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => Event::EditEvent(EditEvent::ToggleCursor),
        KeyEvent {
            code: KeyCode::Left | KeyCode::Char('h'),
            ..
        } => Event::EditEvent(EditEvent::MoveCursor(0, -1)),
        KeyEvent {
            code: KeyCode::Down | KeyCode::Char('j'),
            ..
        } => Event::EditEvent(EditEvent::MoveCursor(1, 0)),
        KeyEvent {
            code: KeyCode::Up | KeyCode::Char('k'),
            ..
        } => Event::EditEvent(EditEvent::MoveCursor(-1, 0)),
        KeyEvent {
            code: KeyCode::Right | KeyCode::Char('l'),
            ..
        } => Event::EditEvent(EditEvent::MoveCursor(0, 1)),

        _ => return None,
    };

    Some(event)
}

fn convert_mouse(mouse_event: MouseEvent) -> Option<Event> {
    let MouseEvent {
        kind, column, row, ..
    } = mouse_event;

    let (x, y) = (column, row);

    let event = match kind {
        MouseEventKind::Down(MouseButton::Left) => EditEvent::Press { x, y },
        MouseEventKind::Drag(MouseButton::Left) => EditEvent::Drag { x, y },
        MouseEventKind::Up(MouseButton::Left) => EditEvent::Release,
        _ => return None,
    };

    Some(Event::EditEvent(event))
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode) -> CrossTermEvent {
        CrossTermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrossTermEvent {
        CrossTermEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn playback_keys() {
        assert_eq!(
            convert_event(key(KeyCode::Char(' '))),
            Some(Event::SimEvent(SimEvent::TogglePlay))
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('n'))),
            Some(Event::SimEvent(SimEvent::Step))
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('-'))),
            Some(Event::SimEvent(SimEvent::Speed(-1)))
        );
    }

    #[test]
    fn ctrl_c_exits_but_c_clears() {
        let ctrl_c = CrossTermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(convert_event(ctrl_c), Some(Event::AppEvent(AppEvent::Exit)));
        assert_eq!(
            convert_event(key(KeyCode::Char('c'))),
            Some(Event::SimEvent(SimEvent::Clear))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = CrossTermEvent::Key(KeyEvent {
            code: KeyCode::Char('n'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });

        assert_eq!(convert_event(release), None);
    }

    #[test]
    fn cursor_keys() {
        assert_eq!(
            convert_event(key(KeyCode::Up)),
            Some(Event::EditEvent(EditEvent::MoveCursor(-1, 0)))
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('l'))),
            Some(Event::EditEvent(EditEvent::MoveCursor(0, 1)))
        );
        assert_eq!(convert_event(key(KeyCode::Tab)), None);
    }

    #[test]
    fn left_button_paints() {
        assert_eq!(
            convert_event(mouse(MouseEventKind::Down(MouseButton::Left), 4, 7)),
            Some(Event::EditEvent(EditEvent::Press { x: 4, y: 7 }))
        );
        assert_eq!(
            convert_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 7)),
            Some(Event::EditEvent(EditEvent::Drag { x: 5, y: 7 }))
        );
        assert_eq!(
            convert_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 7)),
            Some(Event::EditEvent(EditEvent::Release))
        );
        assert_eq!(
            convert_event(mouse(MouseEventKind::Down(MouseButton::Right), 5, 7)),
            None
        );
    }

    #[test]
    fn resize() {
        assert_eq!(
            convert_event(CrossTermEvent::Resize(80, 24)),
            Some(Event::AppEvent(AppEvent::Resize { cols: 80, rows: 24 }))
        );
    }
}
