use agelife::RuleSet;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::cmp::Ordering;
use std::time::Duration;

/// Steps per frame for the fast time scale.
pub(crate) const FAST_STEPS: usize = 11;
/// Cells moved per arrow key press.
const PAN_STEP: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    Quit,
    TogglePause,
    /// Single step, honoured only while paused.
    StepOnce,
    ToggleDisplay,
    ZoomPreset(f32),
    ZoomIn,
    ZoomOut,
    StepsPerFrame(usize),
    Rules(RuleSet),
    Pan(f32, f32),
    Reseed,
}

/// Last cursor position seen while the left button was held.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DragState {
    last: Option<(u16, u16)>,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        let ev = event::read()?;
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(ev)
            }
            Event::Mouse(_) => out.push(ev),
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

fn sign(o: Ordering) -> f32 {
    match o {
        Ordering::Less => -1.0,
        Ordering::Equal => 0.0,
        Ordering::Greater => 1.0,
    }
}

fn map_mouse(m: &MouseEvent, drag: &mut DragState) -> Option<Command> {
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            drag.last = Some((m.column, m.row));
            None
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let prev = drag.last.replace((m.column, m.row))?;
            // one cell per event in the direction of travel
            let dx = sign(m.column.cmp(&prev.0));
            let dy = sign(m.row.cmp(&prev.1));
            if dx == 0.0 && dy == 0.0 {
                None
            } else {
                Some(Command::Pan(dx, dy))
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            drag.last = None;
            None
        }
        _ => None,
    }
}

pub(crate) fn map_event(ev: &Event, drag: &mut DragState) -> Option<Command> {
    let key = match ev {
        Event::Key(k) => k.code,
        Event::Mouse(m) => return map_mouse(m, drag),
        _ => return None,
    };

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::StepOnce),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::ToggleDisplay),
        KeyCode::Char('1') => Some(Command::ZoomPreset(1.0)),
        KeyCode::Char('2') => Some(Command::ZoomPreset(2.0)),
        KeyCode::Char('3') => Some(Command::ZoomIn),
        KeyCode::Char('4') => Some(Command::ZoomOut),
        KeyCode::Char('5') => Some(Command::ZoomPreset(4.0)),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::StepsPerFrame(FAST_STEPS)),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::StepsPerFrame(1)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Rules(RuleSet::Aging)),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Rules(RuleSet::Classic)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Reseed),
        KeyCode::Up => Some(Command::Pan(0.0, -PAN_STEP)),
        KeyCode::Down => Some(Command::Pan(0.0, PAN_STEP)),
        KeyCode::Left => Some(Command::Pan(-PAN_STEP, 0.0)),
        KeyCode::Right => Some(Command::Pan(PAN_STEP, 0.0)),
        _ => None,
    }
}
