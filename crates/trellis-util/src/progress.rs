//! Cargo-style status lines on stderr: a right-aligned, coloured label
//! followed by the message, e.g. `Configuring cc.example v0.1.0 (3 modules)`.

use std::io::Write;

use console::Style;

#[derive(Clone, Copy)]
enum Tone {
    Action,
    Info,
    Warn,
}

fn emit(tone: Tone, label: &str, message: &str) {
    let style = match tone {
        Tone::Action => Style::new().green().bold(),
        Tone::Info => Style::new().cyan().bold(),
        Tone::Warn => Style::new().yellow().bold(),
    };
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}

/// An action in progress or completed (bold green label).
pub fn status(label: &str, message: &str) {
    emit(Tone::Action, label, message);
}

/// Informational detail, shown mostly with `--verbose` (bold cyan label).
pub fn status_info(label: &str, message: &str) {
    emit(Tone::Info, label, message);
}

/// A non-fatal problem (bold yellow label).
pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Warn, label, message);
}
