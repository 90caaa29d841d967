//! Terminal side of `ProgressReporter`, used by the domain router.
//!
//! `blip domain add` reports hosts-file rewrites, remaps and certificate
//! issuance through this type. Events are also logged, so
//! `BLIP_LOG=debug` shows them when `--quiet` or `--json` silences the terminal.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Prints routing progress as indented `→`, `✓` and `!` lines.
///
/// Warnings (such as a domain being remapped away from another address) go
/// to stderr so JSON on stdout stays parseable.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        tracing::debug!("{message}");
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        tracing::debug!("{message}");
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }
}
