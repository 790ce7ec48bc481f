use std::io::{self, Write};

use optibot_core::{Author, ChatMessage, ChatViewModel, LoadPhase};

pub const PROMPT: &str = "> ";
const USER_LABEL: &str = "You";
const BOT_LABEL: &str = "OptiBot";
const INDENT: &str = "    ";

/// Prints the transcript incrementally: only entries not yet shown are written,
/// so the newest message is always at the bottom of the terminal.
pub struct TranscriptRenderer {
    rendered: usize,
    announced_loading: bool,
    clock: Box<dyn Fn() -> String>,
}

impl TranscriptRenderer {
    pub fn new(clock: Box<dyn Fn() -> String>) -> Self {
        Self {
            rendered: 0,
            announced_loading: false,
            clock,
        }
    }

    pub fn render(&mut self, view: &ChatViewModel<'_>, out: &mut dyn Write) -> io::Result<()> {
        if view.phase == LoadPhase::Loading && !self.announced_loading {
            writeln!(out, "Loading articles...")?;
            self.announced_loading = true;
        }

        let fresh = view.messages.get(self.rendered..).unwrap_or_default();
        for message in fresh {
            self.write_message(message, out)?;
        }
        self.rendered = view.messages.len();

        if view.phase == LoadPhase::Ready && !fresh.is_empty() {
            write!(out, "{PROMPT}")?;
        }
        out.flush()
    }

    fn write_message(&self, message: &ChatMessage, out: &mut dyn Write) -> io::Result<()> {
        let label = match message.author {
            Author::User => USER_LABEL,
            Author::Bot => BOT_LABEL,
        };
        writeln!(out, "[{}] {label}:", (self.clock)())?;
        for line in plain_text(&message.text).lines() {
            if line.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "{INDENT}{line}")?;
            }
        }
        writeln!(out)
    }
}

/// Message text is shown as-is, never interpreted: control characters other
/// than newline and tab are dropped so no escape sequence reaches the terminal.
pub fn plain_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect()
}
