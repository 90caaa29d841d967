//! Container records parsed from templated `docker ps` output.
//!
//! Each [`ContainerField`] maps to one Go-template token through a static
//! table, so the requested field set is checked exhaustively at compile time.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::ValidationError;

/// Column delimiter used in every format template.
pub const FIELD_DELIMITER: char = '|';

/// Fields that `docker ps --format` can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerField {
    Id,
    Image,
    Command,
    CreatedAt,
    RunningFor,
    Ports,
    Status,
    Size,
    Names,
    Labels,
    Mounts,
    Networks,
}

impl ContainerField {
    /// Every field, in default request order.
    pub const ALL: [ContainerField; 12] = [
        Self::Id,
        Self::Image,
        Self::Command,
        Self::CreatedAt,
        Self::RunningFor,
        Self::Ports,
        Self::Status,
        Self::Size,
        Self::Names,
        Self::Labels,
        Self::Mounts,
        Self::Networks,
    ];

    /// Go-template token requesting this field.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Id => "{{.ID}}",
            Self::Image => "{{.Image}}",
            Self::Command => "{{.Command}}",
            Self::CreatedAt => "{{.CreatedAt}}",
            Self::RunningFor => "{{.RunningFor}}",
            Self::Ports => "{{.Ports}}",
            Self::Status => "{{.Status}}",
            Self::Size => "{{.Size}}",
            Self::Names => "{{.Names}}",
            Self::Labels => "{{.Labels}}",
            Self::Mounts => "{{.Mounts}}",
            Self::Networks => "{{.Networks}}",
        }
    }

    /// Name accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Image => "image",
            Self::Command => "command",
            Self::CreatedAt => "createdAt",
            Self::RunningFor => "runningFor",
            Self::Ports => "ports",
            Self::Status => "status",
            Self::Size => "size",
            Self::Names => "names",
            Self::Labels => "labels",
            Self::Mounts => "mounts",
            Self::Networks => "networks",
        }
    }
}

impl FromStr for ContainerField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownField {
                field: s.to_string(),
                valid: Self::ALL.map(ContainerField::name).join(", "),
            })
    }
}

/// Container lifecycle status.
///
/// `Reported` keeps whatever coarse text the listing returned (e.g.
/// `Up 2 hours`) until the inspect pass replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    Restarting,
    Running,
    Removing,
    Paused,
    Exited,
    Dead,
    Reported(String),
}

impl ContainerStatus {
    /// Parse status text; unknown values are kept as `Reported`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "created" => Self::Created,
            "restarting" => Self::Restarting,
            "running" => Self::Running,
            "removing" => Self::Removing,
            "paused" => Self::Paused,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            other => Self::Reported(other.to_string()),
        }
    }

    /// Status text as the engine spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Restarting => "restarting",
            Self::Running => "running",
            Self::Removing => "removing",
            Self::Paused => "paused",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Reported(s) => s,
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContainerStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One engine-reported container. Only fields that were requested are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContainerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mounts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<String>,
}

impl ContainerRecord {
    fn set(&mut self, field: ContainerField, value: &str) {
        let value = value.to_string();
        match field {
            ContainerField::Id => self.id = value,
            ContainerField::Image => self.image = Some(value),
            ContainerField::Command => self.command = Some(value),
            ContainerField::CreatedAt => self.created_at = Some(value),
            ContainerField::RunningFor => self.running_for = Some(value),
            ContainerField::Ports => self.ports = Some(value),
            ContainerField::Status => self.status = Some(ContainerStatus::parse(&value)),
            ContainerField::Size => self.size = Some(value),
            ContainerField::Names => self.names = Some(value),
            ContainerField::Labels => self.labels = Some(value),
            ContainerField::Mounts => self.mounts = Some(value),
            ContainerField::Networks => self.networks = Some(value),
        }
    }

    /// Value of `field` as display text.
    #[must_use]
    pub fn get(&self, field: ContainerField) -> Option<&str> {
        match field {
            ContainerField::Id => Some(&self.id),
            ContainerField::Image => self.image.as_deref(),
            ContainerField::Command => self.command.as_deref(),
            ContainerField::CreatedAt => self.created_at.as_deref(),
            ContainerField::RunningFor => self.running_for.as_deref(),
            ContainerField::Ports => self.ports.as_deref(),
            ContainerField::Status => self.status.as_ref().map(ContainerStatus::as_str),
            ContainerField::Size => self.size.as_deref(),
            ContainerField::Names => self.names.as_deref(),
            ContainerField::Labels => self.labels.as_deref(),
            ContainerField::Mounts => self.mounts.as_deref(),
            ContainerField::Networks => self.networks.as_deref(),
        }
    }

    /// Whether this record's id names the same container as `other_id`.
    ///
    /// `docker ps` prints 12-character ids while `inspect` and `compose ps -q`
    /// print full ids, so either side may be a prefix of the other.
    #[must_use]
    pub fn matches_id(&self, other_id: &str) -> bool {
        !self.id.is_empty()
            && !other_id.is_empty()
            && (other_id.starts_with(&self.id) || self.id.starts_with(other_id))
    }
}

/// Resolve the field list to request: all fields when `requested` is empty,
/// with `Id` appended when missing.
#[must_use]
pub fn request_fields(requested: &[ContainerField]) -> Vec<ContainerField> {
    let mut fields = if requested.is_empty() {
        ContainerField::ALL.to_vec()
    } else {
        requested.to_vec()
    };
    if !fields.contains(&ContainerField::Id) {
        fields.push(ContainerField::Id);
    }
    fields
}

/// Column order for the `--format` template: `Id` first and `Command` last.
///
/// Only the final column may contain the delimiter, since [`parse_ps`] lets
/// it absorb any surplus. Commands routinely carry shell pipes.
#[must_use]
pub fn listing_columns(fields: &[ContainerField]) -> Vec<ContainerField> {
    let mut columns = vec![ContainerField::Id];
    columns.extend(
        fields
            .iter()
            .copied()
            .filter(|f| !matches!(f, ContainerField::Id | ContainerField::Command)),
    );
    if fields.contains(&ContainerField::Command) {
        columns.push(ContainerField::Command);
    }
    columns
}

/// Build the `--format` template for `fields`.
#[must_use]
pub fn format_template(fields: &[ContainerField]) -> String {
    fields
        .iter()
        .map(|f| f.token())
        .collect::<Vec<_>>()
        .join(&FIELD_DELIMITER.to_string())
}

/// Template for the inspect reconciliation pass.
pub const INSPECT_TEMPLATE: &str = "{{.ID}}|{{.State.Status}}";

/// Parse `docker ps --format` output, assigning columns positionally.
///
/// The last column keeps any extra delimiters found in the row. Rows without an id are dropped since reconciliation keys on it.
#[must_use]
pub fn parse_ps(stdout: &str, fields: &[ContainerField]) -> Vec<ContainerRecord> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut record = ContainerRecord::default();
            let columns = line.splitn(fields.len(), FIELD_DELIMITER);
            for (field, value) in fields.iter().zip(columns) {
                record.set(*field, value);
            }
            if record.id.is_empty() {
                tracing::warn!(line, "dropping container row without id");
                None
            } else {
                Some(record)
            }
        })
        .collect()
}

/// Parse inspect output into `(id, status)` pairs.
#[must_use]
pub fn parse_inspect(stdout: &str) -> Vec<(String, ContainerStatus)> {
    stdout
        .lines()
        .map(|line| line.trim().trim_matches('"'))
        .filter_map(|line| line.split_once(FIELD_DELIMITER))
        .map(|(id, status)| (id.to_string(), ContainerStatus::parse(status.trim())))
        .collect()
}

/// Overwrite each record's status with the inspected one.
///
/// Records absent from `inspected` end with no status: the listing's value
/// is never kept.
pub fn reconcile_statuses(records: &mut [ContainerRecord], inspected: &[(String, ContainerStatus)]) {
    for record in records {
        record.status = inspected
            .iter()
            .find(|(id, _)| record.matches_id(id))
            .map(|(_, status)| status.clone());
    }
}
