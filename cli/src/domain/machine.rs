//! Machine records and connection environments reported by `docker-machine`.

#![allow(clippy::expect_used)] // Patterns are compile-time constants

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::container::FIELD_DELIMITER;
use crate::domain::error::ValidationError;

// ── Environment variable names ────────────────────────────────────────────────

pub const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";
pub const DOCKER_HOST: &str = "DOCKER_HOST";
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";
pub const DOCKER_MACHINE_NAME: &str = "DOCKER_MACHINE_NAME";
pub const COMPOSE_CONVERT_WINDOWS_PATHS: &str = "COMPOSE_CONVERT_WINDOWS_PATHS";

// ── Machine state ─────────────────────────────────────────────────────────────

/// Lifecycle state reported by the machine tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineState {
    Running,
    Paused,
    Saved,
    Stopped,
    Stopping,
    Starting,
    Error,
    Timeout,
}

impl MachineState {
    /// `Running` or on its way there.
    #[must_use]
    pub fn is_starting_or_running(self) -> bool {
        matches!(self, Self::Running | Self::Starting)
    }

    /// `Stopped`, `Stopping` or `Paused`.
    #[must_use]
    pub fn is_stopping_or_stopped(self) -> bool {
        matches!(self, Self::Stopped | Self::Stopping | Self::Paused)
    }

    /// Needs operator attention before it can be used.
    #[must_use]
    pub fn is_stuck(self) -> bool {
        matches!(self, Self::Error | Self::Timeout)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Saved => "Saved",
            Self::Stopped => "Stopped",
            Self::Stopping => "Stopping",
            Self::Starting => "Starting",
            Self::Error => "Error",
            Self::Timeout => "Timeout",
        }
    }
}

impl FromStr for MachineState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Running" => Ok(Self::Running),
            "Paused" => Ok(Self::Paused),
            "Saved" => Ok(Self::Saved),
            "Stopped" => Ok(Self::Stopped),
            "Stopping" => Ok(Self::Stopping),
            "Starting" => Ok(Self::Starting),
            "Error" => Ok(Self::Error),
            "Timeout" => Ok(Self::Timeout),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Listing fields ────────────────────────────────────────────────────────────

/// Fields that `docker-machine ls --format` can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineField {
    Name,
    Active,
    ActiveHost,
    ActiveSwarm,
    DriverName,
    State,
    Url,
    Swarm,
    Error,
    DockerVersion,
    ResponseTime,
}

impl MachineField {
    /// Every field, in default request order.
    pub const ALL: [MachineField; 11] = [
        Self::Name,
        Self::Active,
        Self::ActiveHost,
        Self::ActiveSwarm,
        Self::DriverName,
        Self::State,
        Self::Url,
        Self::Swarm,
        Self::Error,
        Self::DockerVersion,
        Self::ResponseTime,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Name => "{{.Name}}",
            Self::Active => "{{.Active}}",
            Self::ActiveHost => "{{.ActiveHost}}",
            Self::ActiveSwarm => "{{.ActiveSwarm}}",
            Self::DriverName => "{{.DriverName}}",
            Self::State => "{{.State}}",
            Self::Url => "{{.URL}}",
            Self::Swarm => "{{.Swarm}}",
            Self::Error => "{{.Error}}",
            Self::DockerVersion => "{{.DockerVersion}}",
            Self::ResponseTime => "{{.ResponseTime}}",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Active => "active",
            Self::ActiveHost => "activeHost",
            Self::ActiveSwarm => "activeSwarm",
            Self::DriverName => "driverName",
            Self::State => "state",
            Self::Url => "url",
            Self::Swarm => "swarm",
            Self::Error => "error",
            Self::DockerVersion => "dockerVersion",
            Self::ResponseTime => "responseTime",
        }
    }
}

impl FromStr for MachineField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownField {
                field: s.to_string(),
                valid: Self::ALL.map(MachineField::name).join(", "),
            })
    }
}

/// One machine as listed by the machine tool. Only requested fields are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_swarm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MachineState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swarm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
}

impl MachineRecord {
    fn set(&mut self, field: MachineField, value: &str) {
        let text = Some(value.to_string());
        match field {
            MachineField::Name => self.name = value.to_string(),
            MachineField::Active => self.active = text,
            MachineField::ActiveHost => self.active_host = text,
            MachineField::ActiveSwarm => self.active_swarm = text,
            MachineField::DriverName => self.driver_name = text,
            MachineField::State => {
                self.state = value.parse().ok();
                if self.state.is_none() && !value.is_empty() {
                    tracing::debug!(state = value, "unrecognised machine state");
                }
            }
            MachineField::Url => self.url = text,
            MachineField::Swarm => self.swarm = text,
            MachineField::Error => self.error = text,
            MachineField::DockerVersion => self.docker_version = text,
            MachineField::ResponseTime => self.response_time = text,
        }
    }

    /// Value of `field` as display text.
    #[must_use]
    pub fn get(&self, field: MachineField) -> Option<&str> {
        match field {
            MachineField::Name => Some(&self.name),
            MachineField::Active => self.active.as_deref(),
            MachineField::ActiveHost => self.active_host.as_deref(),
            MachineField::ActiveSwarm => self.active_swarm.as_deref(),
            MachineField::DriverName => self.driver_name.as_deref(),
            MachineField::State => self.state.map(MachineState::as_str),
            MachineField::Url => self.url.as_deref(),
            MachineField::Swarm => self.swarm.as_deref(),
            MachineField::Error => self.error.as_deref(),
            MachineField::DockerVersion => self.docker_version.as_deref(),
            MachineField::ResponseTime => self.response_time.as_deref(),
        }
    }
}

/// Resolve the field list to request: all fields when `requested` is empty,
/// with `Name` appended when missing.
#[must_use]
pub fn request_fields(requested: &[MachineField]) -> Vec<MachineField> {
    let mut fields = if requested.is_empty() {
        MachineField::ALL.to_vec()
    } else {
        requested.to_vec()
    };
    if !fields.contains(&MachineField::Name) {
        fields.push(MachineField::Name);
    }
    fields
}

/// Build the `--format` template for `fields`.
#[must_use]
pub fn format_template(fields: &[MachineField]) -> String {
    fields
        .iter()
        .map(|f| f.token())
        .collect::<Vec<_>>()
        .join(&FIELD_DELIMITER.to_string())
}

/// Parse `docker-machine ls --format` output, assigning columns positionally.
#[must_use]
pub fn parse_ls(stdout: &str, fields: &[MachineField]) -> Vec<MachineRecord> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut record = MachineRecord::default();
            for (field, value) in fields.iter().zip(line.split(FIELD_DELIMITER)) {
                record.set(*field, value);
            }
            record
        })
        .collect()
}

// ── Connection environment ────────────────────────────────────────────────────

static EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^export\s+([^=]+)="([^"]+)"$"#).expect("valid export pattern"));

static HOST_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:]+://([0-9.]+):\d+$").expect("valid host pattern"));

/// Connection variables for one machine, passed verbatim to `docker` and
/// `docker-compose` invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MachineEnvironment {
    vars: BTreeMap<String, String>,
}

impl MachineEnvironment {
    /// Parse a `docker-machine env --shell bash` dump.
    ///
    /// Comment lines are discarded; lines that are not `export KEY="VALUE"`
    /// are skipped.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        let vars = stdout
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| EXPORT_RE.captures(line.trim_end()))
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect();
        Self { vars }
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// `DOCKER_HOST`, e.g. `tcp://192.168.99.100:2376`.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get(DOCKER_HOST)
    }

    #[must_use]
    pub fn machine_name(&self) -> Option<&str> {
        self.get(DOCKER_MACHINE_NAME)
    }

    #[must_use]
    pub fn cert_path(&self) -> Option<&str> {
        self.get(DOCKER_CERT_PATH)
    }

    #[must_use]
    pub fn tls_verify(&self) -> bool {
        self.get(DOCKER_TLS_VERIFY) == Some("1")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All variables as `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// IPv4 address of the machine, taken from `DOCKER_HOST`.
    #[must_use]
    pub fn machine_address(&self) -> Option<&str> {
        let host = self.host()?;
        HOST_ADDRESS_RE
            .captures(host)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

// ── Creation options ──────────────────────────────────────────────────────────

/// Default virtualization driver.
pub const DEFAULT_DRIVER: &str = "virtualbox";

/// Options for `docker-machine create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub driver: String,
    pub engine_registry_mirror: Vec<String>,
    pub engine_insecure_registry: Vec<String>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            engine_registry_mirror: Vec::new(),
            engine_insecure_registry: Vec::new(),
        }
    }
}

/// Machine sizing, expressed in the units the workspace file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineSize {
    pub cpu_count: u32,
    pub ram_mb: u32,
    pub disk_mb: u32,
}

impl Default for MachineSize {
    fn default() -> Self {
        Self {
            cpu_count: 1,
            ram_mb: 2 * 1024,
            disk_mb: 20 * 1024,
        }
    }
}

impl MachineSize {
    /// Driver-specific flags, e.g. `--virtualbox-cpu-count 2`.
    #[must_use]
    pub fn driver_options(&self, driver: &str) -> Vec<(String, Option<String>)> {
        vec![
            (format!("--{driver}-cpu-count"), Some(self.cpu_count.to_string())),
            (format!("--{driver}-memory"), Some(self.ram_mb.to_string())),
            (format!("--{driver}-disk-size"), Some(self.disk_mb.to_string())),
        ]
    }
}

/// Arguments following `create <name>`.
///
/// Driver options with a `None` value are passed as bare flags.
#[must_use]
pub fn create_args(options: &CreateOptions, driver_options: &[(String, Option<String>)]) -> Vec<String> {
    let mut args = Vec::new();
    if !options.driver.is_empty() {
        args.push("--driver".to_string());
        args.push(options.driver.clone());
    }
    for mirror in &options.engine_registry_mirror {
        args.push("--engine-registry-mirror".to_string());
        args.push(mirror.clone());
    }
    for registry in &options.engine_insecure_registry {
        args.push("--engine-insecure-registry".to_string());
        args.push(registry.clone());
    }
    for (flag, value) in driver_options {
        args.push(flag.clone());
        if let Some(value) = value {
            args.push(value.clone());
        }
    }
    args
}

/// Pair raw driver flags with their values: `--flag value` becomes
/// `("--flag", Some("value"))`, a flag followed by another flag is bare.
/// Tokens that are neither a flag nor a flag's value are dropped.
#[must_use]
pub fn pair_driver_options(tokens: &[String]) -> Vec<(String, Option<String>)> {
    let mut pairs: Vec<(String, Option<String>)> = Vec::new();
    for token in tokens {
        if token.starts_with("--") {
            pairs.push((token.clone(), None));
        } else if let Some((_, value @ None)) = pairs.last_mut() {
            *value = Some(token.clone());
        } else {
            tracing::debug!(token, "ignoring stray driver option value");
        }
    }
    pairs
}

/// Reject blank machine names.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyMachineName`] when `name` is blank.
pub fn validate_machine_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyMachineName)
    } else {
        Ok(())
    }
}
