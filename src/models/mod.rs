//! Shared data models for cicat operations
//!
//! This module provides the data structures that flow between the remote
//! fetch layer, the spec parser, and the component cache: discovered
//! [`Component`]s, their typed [`Parameter`]s, and the [`SourceConfig`]
//! descriptors that tell the cache where to look.
//!
//! # Component Identity
//!
//! A component snapshot is identified by the tuple
//! `(name, source_path, gitlab_instance, version)`. Within that tuple at most
//! one entry exists in the cache at a time; a later write replaces the earlier
//! one in place. See [`Component::same_identity`].

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GITLAB_INSTANCE;

/// The declared type of a component parameter.
///
/// GitLab component specs declare inputs as `string`, `boolean`, or `number`;
/// anything else is carried through verbatim as [`ParameterType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    /// Free-text value (the default when no type is declared).
    String,
    /// `true` / `false`.
    Boolean,
    /// Integer or float.
    Number,
    /// Any other declared type string, preserved as-is.
    Other(String),
}

impl Default for ParameterType {
    fn default() -> Self {
        Self::String
    }
}

impl From<String> for ParameterType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            _ => Self::Other(value),
        }
    }
}

impl From<ParameterType> for String {
    fn from(value: ParameterType) -> Self {
        match value {
            ParameterType::String => "string".to_string(),
            ParameterType::Boolean => "boolean".to_string(),
            ParameterType::Number => "number".to_string(),
            ParameterType::Other(s) => s,
        }
    }
}

impl ParameterType {
    /// Parses a declared type string, treating the three well-known names
    /// specially and preserving everything else.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

/// A parameter's default value, discriminated by the declared type.
///
/// Absence of a default is modeled as `Option<ParameterDefault>::None` on
/// [`Parameter::default_value`], not as a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterDefault {
    /// Boolean default (`default: true`).
    Bool(bool),
    /// Numeric default (`default: 3` or `default: 0.5`).
    Num(f64),
    /// String default; quote characters from the source are stripped.
    Str(String),
}

impl ParameterDefault {
    /// Coerces a raw scalar from the spec block into a typed default.
    ///
    /// Declared `boolean`/`number` types parse the scalar, falling back to a
    /// string default rather than dropping an unparseable value. `string`
    /// (also the implicit type when none is declared) keeps the scalar
    /// verbatim. Unknown declared types infer: literal `true`/`false` and
    /// numeric literals, then string.
    #[must_use]
    pub fn coerce(raw: &str, declared: &ParameterType) -> Self {
        match declared {
            ParameterType::Boolean => {
                raw.parse::<bool>().map_or_else(|_| Self::Str(raw.to_string()), Self::Bool)
            }
            ParameterType::Number => {
                raw.parse::<f64>().map_or_else(|_| Self::Str(raw.to_string()), Self::Num)
            }
            ParameterType::String => Self::Str(raw.to_string()),
            ParameterType::Other(_) => {
                if let Ok(b) = raw.parse::<bool>() {
                    Self::Bool(b)
                } else if let Ok(n) = raw.parse::<f64>() {
                    Self::Num(n)
                } else {
                    Self::Str(raw.to_string())
                }
            }
        }
    }

    /// Renders the default for display (CLI tables, hover text).
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Self::Str(s) => s.clone(),
        }
    }
}

/// One declared input of a component.
///
/// Parameters are derived immutably from a single spec-parse pass; they are
/// replaced wholesale when the owning [`Component`] is refreshed, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Input name, the key under `spec.inputs`.
    pub name: String,

    /// Human-readable description, defaulted to `"Parameter: <name>"` when
    /// the source declares none.
    pub description: String,

    /// Whether the input must be supplied by the consumer.
    #[serde(default)]
    pub required: bool,

    /// Declared value type.
    #[serde(default, rename = "type")]
    pub param_type: ParameterType,

    /// Default value, absent when the source declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterDefault>,
}

impl Parameter {
    /// Creates a parameter with the defaulted description and type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("Parameter: {name}");
        Self {
            name,
            description,
            required: false,
            param_type: ParameterType::String,
            default_value: None,
        }
    }
}

/// A named, versioned pipeline template discovered at a remote location.
///
/// Each `Component` is a snapshot of one template file at one version (a tag
/// or branch). The same template at a different version is a distinct cache
/// entry; see the identity rules in the module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name, unique within a `source_path` + `version`.
    pub name: String,

    /// Free-text description, possibly multi-line.
    pub description: String,

    /// Ordered list of declared inputs.
    pub parameters: Vec<Parameter>,

    /// Human display label; hierarchical for group members
    /// (e.g. `"Platform Team/deploy-tools"`).
    pub source: String,

    /// Remote project path, the stable identity key
    /// (e.g. `"components/deploy"`).
    pub source_path: String,

    /// Remote host the component was discovered on.
    pub gitlab_instance: String,

    /// The version string this snapshot was parsed at (tag or branch name).
    pub version: String,

    /// Reference string consumers paste into their pipeline
    /// (`<instance>/<path>/<name>@<version>`).
    pub url: String,

    /// Cached list of all known versions for this `source_path` + instance,
    /// independent of which version this snapshot represents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_versions: Option<Vec<String>>,

    /// Raw README text kept as fallback documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

impl Component {
    /// Builds the pipeline reference string for a component location.
    #[must_use]
    pub fn reference_url(instance: &str, source_path: &str, name: &str, version: &str) -> String {
        format!("{instance}/{source_path}/{name}@{version}")
    }

    /// Whether `other` addresses the same cache slot as `self`.
    ///
    /// Identity is the tuple `(name, source_path, gitlab_instance, version)`;
    /// upserts replace the matching entry rather than appending.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.name == other.name
            && self.source_path == other.source_path
            && self.gitlab_instance == other.gitlab_instance
            && self.version == other.version
    }

    /// Key into the per-project version cache shared by all components of
    /// one project.
    #[must_use]
    pub fn version_cache_key(&self) -> String {
        version_cache_key(&self.gitlab_instance, &self.source_path)
    }
}

/// Builds the version-cache key for an instance + project path pair.
#[must_use]
pub fn version_cache_key(instance: &str, path: &str) -> String {
    format!("{instance}|{path}")
}

/// Whether a configured source points at a single project or a whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A single project containing a `templates/` directory.
    #[default]
    Project,
    /// A group; all member projects (transitively) are scanned.
    Group,
}

/// One configured remote source of components.
///
/// Supplied externally (config file); consumed read-only by the catalog
/// fetcher and cache manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name for the source, also the key in the per-source error map.
    pub name: String,

    /// Project or group path on the instance (e.g. `"components/deploy"`).
    pub path: String,

    /// Remote host; defaults to the public GitLab instance.
    #[serde(default = "default_instance")]
    pub gitlab_instance: String,

    /// Project vs group; defaults to project.
    #[serde(default, rename = "type")]
    pub kind: SourceKind,
}

fn default_instance() -> String {
    DEFAULT_GITLAB_INSTANCE.to_string()
}

impl SourceConfig {
    /// Creates a project source on the default instance.
    #[must_use]
    pub fn project(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            gitlab_instance: default_instance(),
            kind: SourceKind::Project,
        }
    }

    /// Creates a group source on the default instance.
    #[must_use]
    pub fn group(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            gitlab_instance: default_instance(),
            kind: SourceKind::Group,
        }
    }
}
