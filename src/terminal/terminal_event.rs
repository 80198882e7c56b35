use crate::terminal::KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize { width: u16, height: u16 },
}
