use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Interrupt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Terminal events reduced to what the simulation cares about. Positions
/// and deltas are in screen character cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    PointerDown {
        button: PointerButton,
        column: u16,
        row: u16,
    },
    PointerUp {
        button: PointerButton,
    },
    PointerDrag {
        button: PointerButton,
        d_column: i32,
        d_row: i32,
    },
    Resize {
        columns: u16,
        rows: u16,
    },
}

/// Turns raw crossterm events into [`InputEvent`]s, tracking the last
/// pointer position so drags can be reported as deltas.
#[derive(Debug, Default)]
pub struct InputClassifier {
    last_pointer: Option<(u16, u16)>,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => Self::classify_key(key).map(InputEvent::Key),
            Event::Mouse(mouse) => self.classify_mouse(mouse),
            Event::Resize(columns, rows) => Some(InputEvent::Resize { columns, rows }),
            _ => None,
        }
    }

    fn classify_key(key: KeyEvent) -> Option<Key> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let key = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            _ => return None,
        };
        Some(key)
    }

    fn classify_mouse(&mut self, mouse: MouseEvent) -> Option<InputEvent> {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.last_pointer = Some(position);
                Some(InputEvent::PointerDown {
                    button: Self::button(button),
                    column: mouse.column,
                    row: mouse.row,
                })
            }
            MouseEventKind::Up(button) => {
                self.last_pointer = None;
                Some(InputEvent::PointerUp {
                    button: Self::button(button),
                })
            }
            MouseEventKind::Drag(button) => {
                let (last_column, last_row) = self.last_pointer.replace(position)?;
                Some(InputEvent::PointerDrag {
                    button: Self::button(button),
                    d_column: mouse.column as i32 - last_column as i32,
                    d_row: mouse.row as i32 - last_row as i32,
                })
            }
            _ => None,
        }
    }

    fn button(button: MouseButton) -> PointerButton {
        match button {
            MouseButton::Left => PointerButton::Left,
            MouseButton::Right => PointerButton::Right,
            MouseButton::Middle => PointerButton::Middle,
        }
    }
}

/// What the run loop should do in response to an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    SpeedUp,
    SlowDown,
    Reset,
    Clear,
    SingleStep,
    ToggleNeighborCounts,
    ToggleAge,
    ToggleStatus,
    Pan { d_col: i32, d_row: i32 },
    /// Pan by screen columns/rows, as produced by a pointer drag.
    DragPan { d_column: i32, d_row: i32 },
    ToggleCellAt { column: u16, row: u16 },
    Resize { columns: u16, rows: u16 },
}

impl Command {
    pub fn from_input(input: InputEvent) -> Option<Self> {
        let command = match input {
            InputEvent::Key(key) => return Self::from_key(key),
            InputEvent::PointerDown {
                button: PointerButton::Left,
                column,
                row,
            } => Command::ToggleCellAt { column, row },
            InputEvent::PointerDrag {
                button: PointerButton::Right,
                d_column,
                d_row,
            } => Command::DragPan {
                d_column: -d_column,
                d_row: -d_row,
            },
            InputEvent::Resize { columns, rows } => Command::Resize { columns, rows },
            _ => return None,
        };
        Some(command)
    }

    fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Escape | Key::Interrupt | Key::Char('q') => Command::Quit,
            Key::Char(' ') => Command::TogglePause,
            Key::Char('+') | Key::Char('=') => Command::SpeedUp,
            Key::Char('-') => Command::SlowDown,
            Key::Char('r') => Command::Reset,
            Key::Char('c') => Command::Clear,
            Key::Char('n') | Key::Enter => Command::SingleStep,
            Key::Char('a') => Command::ToggleNeighborCounts,
            Key::Char('g') => Command::ToggleAge,
            Key::Char('s') => Command::ToggleStatus,
            Key::Up => Command::Pan { d_col: 0, d_row: -1 },
            Key::Down => Command::Pan { d_col: 0, d_row: 1 },
            Key::Left => Command::Pan { d_col: -1, d_row: 0 },
            Key::Right => Command::Pan { d_col: 1, d_row: 0 },
            Key::Char(_) => return None,
        };
        Some(command)
    }
}
