use crate::field::MaskedInput;
use crate::runtime::event::{FieldEvent, KeyOutcome};
use crate::runtime::scheduler::Scheduler;
use crate::terminal::{KeyCode, KeyEvent, Terminal, TerminalEvent};
use crate::ui::field_view::render_field;
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::style::{Color, Style};
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Submitted(String),
    Cancelled,
}

/// Single masked-field prompt driven by terminal events.
pub struct App {
    label: String,
    input: MaskedInput,
    scheduler: Scheduler,
    outcome: Option<Outcome>,
}

impl App {
    pub fn new(label: impl Into<String>, input: MaskedInput) -> Self {
        Self {
            label: label.into(),
            input,
            scheduler: Scheduler::new(),
            outcome: None,
        }
    }

    pub fn input(&self) -> &MaskedInput {
        &self.input
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn start(&mut self) -> Vec<FieldEvent> {
        self.input.focus(&mut self.scheduler);
        self.settle()
    }

    /// Handles one event and then lets deferred work run, returning the
    /// change notifications that turn produced.
    pub fn dispatch(&mut self, event: TerminalEvent) -> Vec<FieldEvent> {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Paste(text) => {
                self.input.paste(text.as_str());
            }
            TerminalEvent::FocusGained => {
                if !self.input.is_focused() {
                    self.input.focus(&mut self.scheduler);
                }
            }
            TerminalEvent::FocusLost => self.input.blur(&mut self.scheduler),
            TerminalEvent::Resize { .. } => {}
        }
        self.settle()
    }

    pub fn view(&self) -> (SpanLine, usize) {
        let mut line = vec![
            Span::styled(self.label.clone(), Style::new().color(Color::Cyan).bold()),
            Span::new(" "),
        ];
        let offset = line_width(&line);
        let field = render_field(&self.input);
        line.extend(field.line);
        (line, offset + field.cursor_col)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.is_command() && key.code == KeyCode::Char('c') {
            self.outcome = Some(Outcome::Cancelled);
            return;
        }

        if self.input.handle_key(key) != KeyOutcome::Ignored {
            return;
        }
        match key.code {
            KeyCode::Enter => {
                self.input.blur(&mut self.scheduler);
                self.outcome = Some(Outcome::Submitted(self.input.value()));
            }
            KeyCode::Esc => self.outcome = Some(Outcome::Cancelled),
            _ => {}
        }
    }

    fn settle(&mut self) -> Vec<FieldEvent> {
        for task in self.scheduler.drain_ready() {
            if &task.target == self.input.id() {
                self.input.run_deferred(task.action);
            }
        }
        let events = self.input.drain_events();
        for event in &events {
            match event {
                FieldEvent::ValueChanged { id, value } => {
                    log::info!("{id} changed: {value:?}");
                }
            }
        }
        events
    }
}

pub fn run(terminal: &mut Terminal, app: &mut App) -> io::Result<Outcome> {
    app.start();
    draw(terminal, app)?;

    loop {
        if let Some(outcome) = app.outcome() {
            let outcome = outcome.clone();
            draw(terminal, app)?;
            terminal.finish_line()?;
            return Ok(outcome);
        }

        if terminal.poll(Duration::from_millis(100))? {
            let event = terminal.read_event()?;
            app.dispatch(event);
            draw(terminal, app)?;
        }
    }
}

fn draw(terminal: &mut Terminal, app: &App) -> io::Result<()> {
    let (line, cursor_col) = app.view();
    terminal.render_line(&line, cursor_col)
}
