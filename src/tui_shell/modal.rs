use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, ModalKind, TextInputAction};

mod draw;

pub(super) use self::draw::draw_modal;

pub(super) fn handle_modal_key(app: &mut App, key: KeyEvent) {
    enum ModalAction {
        None,
        Close,
        Confirm,
        Decline,
        Submit {
            action: TextInputAction,
            value: String,
        },
    }

    let action = {
        let Some(m) = app.modal.as_mut() else {
            return;
        };

        match &mut m.kind {
            ModalKind::Viewer => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    m.scroll = m.scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if m.scroll < m.lines.len().saturating_sub(1) {
                        m.scroll += 1;
                    }
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    m.scroll = m.scroll.saturating_sub(10);
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    m.scroll = (m.scroll + 10).min(m.lines.len().saturating_sub(1));
                    ModalAction::None
                }
                _ => ModalAction::None,
            },

            ModalKind::ConfirmAction => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => ModalAction::Confirm,
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => ModalAction::Decline,
                _ => ModalAction::None,
            },

            ModalKind::TextInput { action, .. } => match key.code {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::Submit {
                    action: action.clone(),
                    value: m.input.buf.clone(),
                },
                KeyCode::Backspace => {
                    m.input.backspace();
                    ModalAction::None
                }
                KeyCode::Delete => {
                    m.input.delete();
                    ModalAction::None
                }
                KeyCode::Left => {
                    m.input.move_left();
                    ModalAction::None
                }
                KeyCode::Right => {
                    m.input.move_right();
                    ModalAction::None
                }
                KeyCode::Home => {
                    m.input.home();
                    ModalAction::None
                }
                KeyCode::End => {
                    m.input.end();
                    ModalAction::None
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    m.input.clear();
                    ModalAction::None
                }
                KeyCode::Char(c) => {
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT)
                    {
                        m.input.insert_char(c);
                    }
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
        }
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => app.close_modal(),
        ModalAction::Confirm => {
            app.close_modal();
            app.console.confirm();
        }
        ModalAction::Decline => {
            app.close_modal();
            app.console.decline();
        }
        ModalAction::Submit { action, value } => {
            app.close_modal();
            app.submit_text_input(action, value);
        }
    }
}
