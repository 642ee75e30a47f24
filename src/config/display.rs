//! Rendering the configuration tree as text.
//!
//! [`render`] is the display path: every leaf is shown and secrets can be
//! masked. [`render_sample`] is the file path: only serializable leaves are
//! written, so secrets never end up in a config file.

use super::coerce::{Value, format_duration};
use super::defaults::apply_defaults;
use super::schema::{FIELDS, FieldDescriptor, secret_env_keys};
use super::types::Config;
use super::validate::AUTH_REQUIRED_ENV_KEYS;
use crate::error::{ConfigError, ConfigResult};
use crate::format::OutputFormat;
use serde_yaml::{Mapping, Value as Yaml};
use std::path::Path;

const MASK: &str = "****";

/// Redact the middle of a secret for display.
///
/// Works on code points: up to four become `****`, longer values keep two
/// code points on each side.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => String::new(),
        1..=4 => MASK.to_string(),
        n => {
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[n - 2..].iter().collect();
            format!("{head}{MASK}{tail}")
        }
    }
}

/// Render the full tree, masking secret leaves when `mask_secrets` is set.
pub fn render(config: &Config, mask_secrets: bool, format: OutputFormat) -> ConfigResult<String> {
    let tree = build_tree(config, FIELDS.iter(), mask_secrets);
    encode(&tree, format)
}

/// Header written above the sample config file.
fn sample_header() -> String {
    let mut header = String::from(
        "# Portal API configuration\n\
         # Secrets are never read from this file. Set them as environment variables.\n\
         #\n\
         # Required when authentication is enabled:\n",
    );
    for key in AUTH_REQUIRED_ENV_KEYS {
        header.push_str(&format!("# - {key}\n"));
    }
    header.push_str("#\n# Optional:\n");
    for key in secret_env_keys().filter(|k| !AUTH_REQUIRED_ENV_KEYS.contains(k)) {
        header.push_str(&format!("# - {key}\n"));
    }
    header.push_str("#\n");
    header
}

/// Sample config file contents: a header plus the defaults of every
/// serializable leaf.
pub fn render_sample() -> ConfigResult<String> {
    let mut config = Config::default();
    apply_defaults(&mut config)?;
    let tree = build_tree(&config, FIELDS.iter().filter(|f| f.serializable), false);
    let body = encode(&tree, OutputFormat::Yaml)?;
    Ok(format!("{}{body}", sample_header()))
}

/// Write the sample config file to `path`.
pub fn generate_default_config(path: &Path) -> ConfigResult<()> {
    let content = render_sample()?;
    std::fs::write(path, content).map_err(|source| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn build_tree<'a>(
    config: &Config,
    fields: impl Iterator<Item = &'a FieldDescriptor>,
    mask_secrets: bool,
) -> Yaml {
    let mut root = Mapping::new();
    for field in fields {
        let value = match field.read(config) {
            Value::String(s) if mask_secrets && field.secret => Value::String(mask(&s)),
            other => other,
        };
        insert(&mut root, field, to_yaml(value));
    }
    Yaml::Mapping(root)
}

fn insert(root: &mut Mapping, field: &FieldDescriptor, value: Yaml) {
    let segments: Vec<&str> = field.segments().collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut node = root;
    for segment in parents {
        let child = node
            .entry(Yaml::from(*segment))
            .or_insert_with(|| Yaml::Mapping(Mapping::new()));
        node = match child {
            Yaml::Mapping(map) => map,
            // verify_schema rules out a leaf that is also a parent
            _ => return,
        };
    }
    node.insert(Yaml::from(*leaf), value);
}

fn to_yaml(value: Value) -> Yaml {
    match value {
        Value::String(s) => Yaml::String(s),
        Value::Integer(n) => Yaml::Number(n.into()),
        Value::Duration(d) => Yaml::String(format_duration(d)),
        Value::Boolean(b) => Yaml::Bool(b),
        Value::StringList(items) => Yaml::Sequence(items.into_iter().map(Yaml::String).collect()),
    }
}

fn encode(tree: &Yaml, format: OutputFormat) -> ConfigResult<String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(tree).map_err(|e| ConfigError::Render(Box::new(e)))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(tree).map_err(|e| ConfigError::Render(Box::new(e)))
        }
    }
}
