//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: either the command's result or the error object below.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{
    CommandError, HostsDocument, PrivilegedError, ToolError, ValidationError, WorkspaceError,
};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable error code for the JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ToolError>().is_some() {
        "TOOL_UNAVAILABLE"
    } else if err.downcast_ref::<ValidationError>().is_some() {
        "VALIDATION_ERROR"
    } else if let Some(e) = err.downcast_ref::<WorkspaceError>() {
        match e {
            WorkspaceError::NotAWorkspace => "NOT_A_WORKSPACE",
            _ => "WORKSPACE_ERROR",
        }
    } else if err.downcast_ref::<CommandError>().is_some() {
        "SUBPROCESS_FAILURE"
    } else if err.downcast_ref::<PrivilegedError>().is_some() {
        "PRIVILEGED_HELPER_FAILURE"
    } else {
        "ERROR"
    }
}

/// Renders command results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }

    /// Print the hosts file as `{"comments": [...], "mappings": {domain: address}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_hosts(&self, doc: &HostsDocument) -> Result<()> {
        self.render(&hosts_value(doc))
    }
}

/// JSON shape of a hosts document.
#[must_use]
pub fn hosts_value(doc: &HostsDocument) -> serde_json::Value {
    let mappings: serde_json::Map<String, serde_json::Value> = doc
        .mappings()
        .map(|(domain, address)| (domain.to_string(), address.into()))
        .collect();
    serde_json::json!({
        "comments": doc.comments(),
        "mappings": mappings,
    })
}
