use std::collections::BTreeMap;
use std::path::Path;

use trellis_util::errors::TrellisError;

/// Loads a `trellis.properties` file (`key=value` lines, `#` comments).
///
/// Values are available through `${prop:NAME}` interpolation in every
/// `Trellis.toml` of the workspace. A missing file yields an empty map.
pub fn load_properties(path: &Path) -> Result<BTreeMap<String, String>, TrellisError> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(map)
}

/// Interpolate `${prop:NAME}` and `${env:NAME}` references in a string.
///
/// Both forms look up `properties` first and fall back to the process
/// environment. A reference that resolves nowhere is an error, so a
/// misspelled property never turns into an empty version string.
pub fn interpolate(
    input: &str,
    properties: &BTreeMap<String, String>,
) -> Result<String, TrellisError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let prefix = if after.starts_with("prop:") {
            "prop:"
        } else if after.starts_with("env:") {
            "env:"
        } else {
            out.push_str(&rest[..start + 2]);
            rest = after;
            continue;
        };
        let Some(end) = after.find('}') else {
            return Err(TrellisError::manifest(format!(
                "Unterminated '${{{prefix}' reference"
            )));
        };
        let key = &after[prefix.len()..end];
        let value = properties
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
            .ok_or_else(|| {
                TrellisError::manifest(format!(
                    "Undefined property '{key}' (set it in trellis.properties or the environment)"
                ))
            })?;
        out.push_str(&rest[..start]);
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
