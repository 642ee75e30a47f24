//! Middle layer: the optional YAML config file.
//!
//! The file is a sparse overlay. Only leaves that appear in it are assigned;
//! everything else keeps the value set by the defaults layer.

use super::coerce::split_list;
use super::schema::{FIELDS, FieldDescriptor, Slot};
use super::types::Config;
use crate::error::{ConfigError, ConfigResult, ParseCause};
use serde_yaml::{Mapping, Value as Yaml};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/portal-api/config.yaml";

/// Ordered list of locations probed when no explicit file is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths(Vec<PathBuf>);

impl Default for SearchPaths {
    fn default() -> Self {
        Self(vec![
            PathBuf::from("./config.yaml"),
            PathBuf::from("./config/config.yaml"),
            PathBuf::from(SYSTEM_CONFIG_PATH),
        ])
    }
}

impl SearchPaths {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self(paths.into_iter().collect())
    }

    /// A search list that never finds anything.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// First candidate that exists on disk.
    pub fn find(&self) -> Option<&Path> {
        self.0.iter().map(PathBuf::as_path).find(|p| p.exists())
    }
}

/// Overlay the config file onto `config`.
///
/// With an explicit (non-empty) path the file must exist and parse. Without
/// one, `search` is probed and a miss is not an error. Returns the path that
/// was loaded.
pub fn load_file(
    config: &mut Config,
    explicit: Option<&Path>,
    search: &SearchPaths,
) -> ConfigResult<Option<PathBuf>> {
    let path = match explicit.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => path.to_path_buf(),
        None => match search.find() {
            Some(found) => found.to_path_buf(),
            None => {
                debug!("No config file found, using defaults and environment only");
                return Ok(None);
            }
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
        path: path.clone(),
        source,
    })?;
    overlay_yaml(config, &content).map_err(|source| ConfigError::FileParse {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "Loaded config file");
    Ok(Some(path))
}

/// Overlay a YAML document onto `config`.
pub fn overlay_yaml(config: &mut Config, content: &str) -> Result<(), ParseCause> {
    // An empty file overlays nothing.
    if content.trim().is_empty() {
        return Ok(());
    }
    let document: Yaml = serde_yaml::from_str(content)?;
    let root = match document {
        Yaml::Mapping(map) => map,
        Yaml::Null => return Ok(()),
        _ => return Err(ParseCause::NotAMapping),
    };

    warn_unknown_keys(&root, "");

    for field in FIELDS {
        let Some(node) = lookup(&root, field) else {
            continue;
        };
        if node.is_null() {
            continue;
        }
        if !field.serializable {
            warn!(
                path = field.path,
                env_key = field.env_key.unwrap_or("-"),
                "Ignoring secret value in config file; set it through the environment"
            );
            continue;
        }
        apply_node(config, field, node)?;
    }
    Ok(())
}

fn lookup<'a>(root: &'a Mapping, field: &FieldDescriptor) -> Option<&'a Yaml> {
    let mut segments = field.segments();
    let mut node = root.get(segments.next()?)?;
    for segment in segments {
        node = node.as_mapping()?.get(segment)?;
    }
    Some(node)
}

fn apply_node(config: &mut Config, field: &FieldDescriptor, node: &Yaml) -> Result<(), ParseCause> {
    let invalid = |source| ParseCause::Field {
        path: field.path,
        source,
    };

    if let (Slot::StringList(accessor), Yaml::Sequence(items)) = (&field.slot, node) {
        let mut list = Vec::with_capacity(items.len());
        for item in items {
            let literal = scalar_text(item).ok_or(ParseCause::NotAScalar { path: field.path })?;
            list.push(literal.trim().to_string());
        }
        *(accessor.get_mut)(config) = list;
        return Ok(());
    }

    let literal = scalar_text(node).ok_or(ParseCause::NotAScalar { path: field.path })?;
    if let Slot::StringList(accessor) = &field.slot {
        *(accessor.get_mut)(config) = split_list(&literal, field.separator);
        return Ok(());
    }
    field.assign(config, &literal).map_err(invalid)
}

/// The literal text of a YAML scalar.
fn scalar_text(node: &Yaml) -> Option<String> {
    match node {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Tagged(tagged) => scalar_text(&tagged.value),
        Yaml::Null | Yaml::Sequence(_) | Yaml::Mapping(_) => None,
    }
}

fn warn_unknown_keys(map: &Mapping, prefix: &str) {
    for (key, value) in map {
        let Some(key) = key.as_str() else {
            warn!(prefix, "Ignoring non-string key in config file");
            continue;
        };
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };
        if FIELDS.iter().any(|f| f.path == path) {
            continue;
        }
        let branch = format!("{path}.");
        match value {
            Yaml::Mapping(inner) if FIELDS.iter().any(|f| f.path.starts_with(&branch)) => {
                warn_unknown_keys(inner, &path);
            }
            _ => warn!(key = %path, "Ignoring unknown key in config file"),
        }
    }
}
