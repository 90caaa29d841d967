//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{
    ContainerField, ContainerRecord, GlobalConfig, HostsDocument, MachineEnvironment,
    MachineField, MachineRecord,
};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        println!("blip {version}");
    }

    /// Render machines as a table with one column per field.
    pub fn render_machines(&self, machines: &[MachineRecord], fields: &[MachineField]) {
        if machines.is_empty() {
            self.ctx.info("No machines found. Create one: blip machine create <name>");
            return;
        }
        let headers: Vec<&str> = fields.iter().map(|f| f.name()).collect();
        let rows = machines
            .iter()
            .map(|m| fields.iter().map(|f| cell(m.get(*f))).collect())
            .collect::<Vec<_>>();
        self.print_table(&headers, &rows);
    }

    /// Render containers as a table with one column per field.
    pub fn render_containers(&self, containers: &[ContainerRecord], fields: &[ContainerField]) {
        if containers.is_empty() {
            self.ctx.info("No containers found.");
            return;
        }
        let headers: Vec<&str> = fields.iter().map(|f| f.name()).collect();
        let rows = containers
            .iter()
            .map(|c| fields.iter().map(|f| cell(c.get(*f))).collect())
            .collect::<Vec<_>>();
        self.print_table(&headers, &rows);
    }

    /// Render hosts mappings; comments only with `all`.
    pub fn render_hosts(&self, doc: &HostsDocument, all: bool) {
        if all {
            for line in doc.comments() {
                println!("{}", line.style(self.ctx.styles.dim));
            }
        }
        let rows = doc
            .mappings()
            .map(|(domain, address)| vec![address.to_string(), domain.to_string()])
            .collect::<Vec<_>>();
        if rows.is_empty() {
            self.ctx.info("No mappings.");
            return;
        }
        self.print_table(&["address", "domain"], &rows);
    }

    /// Render a machine environment as `KEY=value` lines.
    pub fn render_environment(&self, env: &MachineEnvironment) {
        for (key, value) in env.iter() {
            println!("{}={value}", key.style(self.ctx.styles.bold));
        }
    }

    /// Render the global configuration.
    pub fn render_config(&self, config: &GlobalConfig, path: &std::path::Path) {
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!(
            "  {:<16} {}",
            "defaultDriver:",
            config.default_driver.as_deref().unwrap_or("(not set)")
        );
    }

    fn print_table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let widths = column_widths(headers, rows);
        let header = pad_row(headers.iter().copied(), &widths);
        println!("{}", header.style(self.ctx.styles.header));
        for row in rows {
            println!("{}", pad_row(row.iter().map(String::as_str), &widths));
        }
    }
}

// ── Table helpers ────────────────────────────────────────────────────────────

fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Display width of each column: the widest of its header and cells.
#[must_use]
pub fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }
    widths
}

/// Cells left-aligned to `widths`, separated by three spaces, trailing
/// whitespace trimmed.
#[must_use]
pub fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("   ");
    line.trim_end().to_string()
}
