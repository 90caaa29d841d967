//! In-memory model of the system hostname-mapping file.
//!
//! Pure parsing, mutation and serialization. Loading and flushing (with the
//! privileged fallback) live in `application::services::hosts`.
//!
//! Every domain argument must match [`DOMAIN_PATTERN`] and every address must
//! be dotted-decimal IPv4. The checks run on every query and mutation, not
//! only at parse time.

#![allow(clippy::expect_used)] // Patterns are compile-time constants

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ValidationError;

const OCTET: &str = "(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

/// Hostname grammar accepted for mapping keys.
pub const DOMAIN_PATTERN: &str = r"[a-zA-Z0-9][a-zA-Z0-9-]{1,61}[a-zA-Z0-9](?:\.[a-zA-Z0-9-]{2,})*";

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{OCTET}\.{OCTET}\.{OCTET}\.{OCTET}$")).expect("valid address pattern")
});

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{DOMAIN_PATTERN}$")).expect("valid domain pattern"));

/// Check `domain` against the hostname grammar.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDomain`] when the grammar does not match.
pub fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if DOMAIN_RE.is_match(domain) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDomain(domain.to_string()))
    }
}

/// Check `address` is dotted-decimal IPv4.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAddress`] when the syntax does not match.
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if ADDRESS_RE.is_match(address) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAddress(address.to_string()))
    }
}

/// Parsed hosts file: verbatim passthrough lines plus a domain → address map.
///
/// Passthrough lines are comments (leading `#`) and any non-blank line that
/// is not exactly `<ipv4> <domain>`, such as IPv6 entries or alias lists.
/// They are written back unchanged, ahead of the mappings.
///
/// Domains on an IPv4 alias list (`127.0.0.1 localhost app.test`) are also
/// indexed as mappings. When a mutation changes one of them, the alias line
/// is rewritten without that name so it cannot shadow the new mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsDocument {
    passthrough: Vec<Passthrough>,
    mappings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Passthrough {
    text: String,
    /// Leading IPv4 address when the line lists indexed domains.
    address: Option<String>,
}

impl HostsDocument {
    /// Parse hosts file text. Never fails; blank lines are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();
        for raw in text.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                doc.passthrough.push(Passthrough {
                    text: line.to_string(),
                    address: None,
                });
                continue;
            }
            if let Some((address, domain)) = parse_mapping_line(line) {
                doc.mappings.insert(domain.to_string(), address.to_string());
                continue;
            }
            let address = match parse_alias_line(line) {
                Some((address, names)) => {
                    for name in names {
                        doc.mappings.insert(name.to_string(), address.to_string());
                    }
                    Some(address.to_string())
                }
                None => {
                    tracing::debug!(line, "keeping unrecognised hosts line verbatim");
                    None
                }
            };
            doc.passthrough.push(Passthrough {
                text: line.to_string(),
                address,
            });
        }
        doc
    }

    /// Serialize passthrough lines followed by tab-delimited mappings.
    ///
    /// Mappings still carried by an alias line are not repeated.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        let mut held = BTreeSet::new();
        for line in &self.passthrough {
            if let Some(text) = self.render_passthrough(line, &mut held) {
                out.push_str(&text);
                out.push('\n');
            }
        }
        for (domain, address) in &self.mappings {
            if held.contains(domain.as_str()) {
                continue;
            }
            out.push('\t');
            out.push_str(address);
            out.push('\t');
            out.push_str(domain);
            out.push('\n');
        }
        out
    }

    /// Alias lines keep only the names still mapped to their address.
    ///
    /// A line left with a single plain mapping is dropped so the mapping is
    /// written once, tab-delimited.
    fn render_passthrough<'a>(
        &'a self,
        line: &'a Passthrough,
        held: &mut BTreeSet<&'a str>,
    ) -> Option<Cow<'a, str>> {
        let Some(address) = &line.address else {
            return Some(Cow::Borrowed(&line.text));
        };
        let (body, comment) = split_inline_comment(&line.text);
        let names: Vec<&str> = body.split_whitespace().skip(1).collect();
        let kept: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| {
                !DOMAIN_RE.is_match(name) || self.mappings.get(*name) == Some(address)
            })
            .collect();
        let domains = kept.iter().copied().filter(|name| DOMAIN_RE.is_match(name));

        if kept.len() == names.len() {
            held.extend(domains);
            return Some(Cow::Borrowed(&line.text));
        }
        let single_mapping = kept.len() == 1 && comment.is_none() && DOMAIN_RE.is_match(kept[0]);
        if kept.is_empty() || single_mapping {
            return None;
        }
        held.extend(domains);
        let mut text = format!("{address} {}", kept.join(" "));
        if let Some(comment) = comment {
            text.push(' ');
            text.push_str(comment);
        }
        Some(Cow::Owned(text))
    }

    /// Verbatim lines preserved from the source, in order.
    #[must_use]
    pub fn comments(&self) -> Vec<&str> {
        self.passthrough.iter().map(|line| line.text.as_str()).collect()
    }

    /// All mappings as `(domain, address)` pairs, ordered by domain.
    pub fn mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(d, a)| (d.as_str(), a.as_str()))
    }

    /// Address mapped to `domain`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `domain` is not a valid hostname.
    pub fn address(&self, domain: &str) -> Result<Option<&str>, ValidationError> {
        validate_domain(domain)?;
        Ok(self.mappings.get(domain).map(String::as_str))
    }

    /// Every domain currently mapped to `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not valid IPv4.
    pub fn domains(&self, address: &str) -> Result<Vec<&str>, ValidationError> {
        validate_address(address)?;
        Ok(self
            .mappings
            .iter()
            .filter(|(_, a)| a.as_str() == address)
            .map(|(d, _)| d.as_str())
            .collect())
    }

    /// Map `domain` to `address` unless the domain is already mapped.
    ///
    /// # Errors
    ///
    /// Returns an error if either argument fails validation.
    pub fn add_mapping(&mut self, domain: &str, address: &str) -> Result<(), ValidationError> {
        validate_domain(domain)?;
        validate_address(address)?;
        self.mappings
            .entry(domain.to_string())
            .or_insert_with(|| address.to_string());
        Ok(())
    }

    /// Remove `domain` only when it is mapped to exactly `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if either argument fails validation.
    pub fn remove_mapping(&mut self, domain: &str, address: &str) -> Result<(), ValidationError> {
        validate_domain(domain)?;
        validate_address(address)?;
        if self.mappings.get(domain).is_some_and(|a| a == address) {
            self.mappings.remove(domain);
        }
        Ok(())
    }

    /// Remove whatever mapping `domain` has.
    ///
    /// # Errors
    ///
    /// Returns an error if `domain` is not a valid hostname.
    pub fn remove_domain(&mut self, domain: &str) -> Result<(), ValidationError> {
        validate_domain(domain)?;
        self.mappings.remove(domain);
        Ok(())
    }

    /// Remove every domain mapped to `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not valid IPv4.
    pub fn remove_address(&mut self, address: &str) -> Result<(), ValidationError> {
        validate_address(address)?;
        self.mappings.retain(|_, a| a != address);
        Ok(())
    }
}

/// Accept exactly two tokens: a valid address followed by a valid domain.
fn parse_mapping_line(line: &str) -> Option<(&str, &str)> {
    let mut tokens = line.split_whitespace();
    let address = tokens.next()?;
    let domain = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    if ADDRESS_RE.is_match(address) && DOMAIN_RE.is_match(domain) {
        Some((address, domain))
    } else {
        None
    }
}

/// An IPv4 line listing host names, with the names that pass the grammar.
fn parse_alias_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let (body, _) = split_inline_comment(line);
    let mut tokens = body.split_whitespace();
    let address = tokens.next().filter(|a| ADDRESS_RE.is_match(a))?;
    let names: Vec<&str> = tokens.filter(|name| DOMAIN_RE.is_match(name)).collect();
    if names.is_empty() {
        None
    } else {
        Some((address, names))
    }
}

/// Split a line at its first `#` into body and trailing comment.
fn split_inline_comment(line: &str) -> (&str, Option<&str>) {
    match line.find('#') {
        Some(at) => (&line[..at], Some(&line[at..])),
        None => (line, None),
    }
}
