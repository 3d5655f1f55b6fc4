//! Status lines for zel commands.
//!
//! Each line is a right-aligned label followed by a message. Results go to
//! stdout so they can be piped; warnings and failures go to stderr. Labels
//! are colored only on a terminal with `NO_COLOR` unset.

use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io;
use std::time::{Duration, Instant};

const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Busy,
    Done,
    Note,
    Warn,
    Fail,
}

impl Tone {
    fn color(self) -> AnsiColor {
        match self {
            Tone::Busy => AnsiColor::Cyan,
            Tone::Done => AnsiColor::Green,
            Tone::Note => AnsiColor::Blue,
            Tone::Warn => AnsiColor::Yellow,
            Tone::Fail => AnsiColor::Red,
        }
    }

    fn on_stderr(self) -> bool {
        matches!(self, Tone::Warn | Tone::Fail)
    }

    fn style(self) -> Option<Style> {
        let is_tty = if self.on_stderr() {
            io::stderr().is_terminal()
        } else {
            io::stdout().is_terminal()
        };
        (is_tty && std::env::var_os("NO_COLOR").is_none())
            .then(|| Style::new().bold().fg_color(Some(self.color().into())))
    }
}

/// Format one status block; continuation lines are indented under the message.
fn render(label: &str, message: &str, style: Option<Style>) -> String {
    let label = format!("{label:>width$}", width = LABEL_WIDTH);
    let label = match style {
        Some(style) => format!("{}{label}{}", style.render(), style.render_reset()),
        None => label,
    };

    let mut lines = message.lines();
    let mut out = format!("{label} {}\n", lines.next().unwrap_or_default());
    for line in lines {
        out.push_str(&format!("{:width$} {line}\n", "", width = LABEL_WIDTH));
    }
    out
}

fn emit(tone: Tone, label: &str, message: impl Display) {
    let text = render(label, &message.to_string(), tone.style());
    if tone.on_stderr() {
        eprint!("{text}");
    } else {
        print!("{text}");
    }
}

pub fn status(label: &str, message: impl Display) {
    emit(Tone::Busy, label, message);
}

pub fn info(message: impl Display) {
    emit(Tone::Note, "Info", message);
}

pub fn warn(message: impl Display) {
    emit(Tone::Warn, "Warning", message);
}

pub fn error(message: impl Display) {
    emit(Tone::Fail, "Error", message);
}

pub fn success(label: &str, message: impl Display) {
    emit(Tone::Done, label, message);
}

fn elapsed(duration: Duration) -> String {
    match duration.as_millis() {
        0 => "<1ms".to_string(),
        ms @ 1..=999 => format!("{ms}ms"),
        _ => format!("{:.1}s", duration.as_secs_f64()),
    }
}

/// A blocking step (clone, install) announced up front and closed with its
/// elapsed time.
#[must_use = "close the step with `finish` or `fail`"]
pub struct Step {
    message: String,
    started: Instant,
}

impl Step {
    pub fn start(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        emit(Tone::Busy, label, &message);
        Self {
            message,
            started: Instant::now(),
        }
    }

    pub fn finish(self, label: &str) {
        let took = elapsed(self.started.elapsed());
        emit(Tone::Done, label, format!("{} ({took})", self.message));
    }

    pub fn fail(self, label: &str, error: impl Display) {
        let took = elapsed(self.started.elapsed());
        emit(Tone::Fail, label, format!("{} ({took}): {error}", self.message));
    }
}
