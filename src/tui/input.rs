use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use super::mode::TuiState;
use crate::curve::{ALL_SHAPES, CurvePoint};
use crate::shared::InputEvent;

// poll for input from the terminal; keys resolve to semantic input events,
// mouse activity on the curve pane becomes draw start/move/end in surface
// coordinates
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Ok(vec![]);
            }
            Ok(handle_key(key.code, ts))
        }
        Event::Mouse(mouse) => Ok(handle_mouse(mouse, ts)),
        _ => Ok(vec![]),
    }
}

fn handle_key(code: KeyCode, ts: &TuiState) -> Vec<InputEvent> {
    // rename mode swallows everything printable
    if ts.renaming {
        return match code {
            KeyCode::Enter | KeyCode::Esc => vec![InputEvent::ToggleRename],
            KeyCode::Backspace => vec![InputEvent::NameBackspace],
            KeyCode::Char(c) => vec![InputEvent::NameChar(c)],
            _ => vec![],
        };
    }

    match code {
        KeyCode::Esc => vec![InputEvent::Quit],

        // template pad: 1-8 stamps an analytic shape
        KeyCode::Char(c @ '1'..='8') => {
            let idx = (c as u8 - b'1') as usize;
            vec![InputEvent::ApplyTemplate(ALL_SHAPES[idx])]
        }

        // sampler knobs
        KeyCode::Char('p') => vec![InputEvent::NextParamPage],
        KeyCode::Char('[') => vec![InputEvent::KnobA(-1)],
        KeyCode::Char(']') => vec![InputEvent::KnobA(1)],
        KeyCode::Char('-') => vec![InputEvent::KnobB(-1)],
        KeyCode::Char('=') => vec![InputEvent::KnobB(1)],
        KeyCode::Char(',') => vec![InputEvent::AdjustResolution(-1)],
        KeyCode::Char('.') => vec![InputEvent::AdjustResolution(1)],
        KeyCode::Char('a') => vec![InputEvent::CycleAction],

        // timeline cursor + manual step edits
        KeyCode::Left => vec![InputEvent::SelectPrevStep],
        KeyCode::Right => vec![InputEvent::SelectNextStep],
        KeyCode::Char('D') => vec![InputEvent::RemoveSelectedStep],
        KeyCode::Char('i') => vec![InputEvent::DuplicateSelectedStep],
        KeyCode::Char('<') => vec![InputEvent::AdjustSelectedIntensity(-5)],
        KeyCode::Char('>') => vec![InputEvent::AdjustSelectedIntensity(5)],

        // session
        KeyCode::Char('n') => vec![InputEvent::NewSession],
        KeyCode::Char('u') => vec![InputEvent::UndoRecent],
        KeyCode::Char('r') => vec![InputEvent::ToggleRename],

        // remote
        KeyCode::Char('s') => vec![InputEvent::Save],
        KeyCode::Char('x') => vec![InputEvent::Execute],
        KeyCode::Char('X') => vec![InputEvent::Delete],

        _ => vec![],
    }
}

fn handle_mouse(mouse: MouseEvent, ts: &mut TuiState) -> Vec<InputEvent> {
    let Some(area) = ts.curve_area else {
        return vec![];
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(area, mouse.column, mouse.row) {
                ts.mouse_down = true;
                vec![InputEvent::DrawStart(to_surface(area, mouse.column, mouse.row))]
            } else {
                vec![]
            }
        }
        // drags may wander outside the pane; the capture clamps them back in
        MouseEventKind::Drag(MouseButton::Left) if ts.mouse_down => {
            vec![InputEvent::DrawMove(to_surface(area, mouse.column, mouse.row))]
        }
        MouseEventKind::Up(MouseButton::Left) if ts.mouse_down => {
            ts.mouse_down = false;
            vec![InputEvent::DrawEnd]
        }
        _ => vec![],
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

// cell coordinates relative to the pane are the surface coordinates
fn to_surface(area: Rect, column: u16, row: u16) -> CurvePoint {
    CurvePoint::new(
        column as f64 - area.x as f64,
        row as f64 - area.y as f64,
    )
}
