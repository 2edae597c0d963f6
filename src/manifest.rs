//! Pure transforms over the package manifest (`package.json`).
//!
//! The cleanup orchestrator reads the manifest once, applies these functions
//! in memory, and persists the result in a single write. Unknown fields and
//! key order round-trip untouched (`serde_json` with `preserve_order`).

use serde_json::Value;

/// Manifest file name at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Reserved name marking an unmodified starter checkout. While the manifest
/// still carries this name, cleanup must not run.
pub const TEMPLATE_MARKER: &str = "stencil-starter";

/// Version written for the freshly derived project.
pub const INITIAL_VERSION: &str = "0.1.0";

/// Scripts that only make sense inside the starter itself.
pub const TEMPLATE_ONLY_SCRIPTS: &[&str] = &["setup", "setup:env", "template:cleanup"];

/// Infrastructure scripts renamed from the template prefix to their stable
/// public names. Values (the shell invocations) are preserved verbatim.
pub const INFRA_SCRIPT_RENAMES: &[(&str, &str)] = &[
    ("template:db:start", "db:start"),
    ("template:db:stop", "db:stop"),
    ("template:db:reset", "db:reset"),
];

/// A single applied manifest mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestChange {
    ScriptRemoved(String),
    ScriptRenamed { from: String, to: String },
    NameSet(String),
    VersionReset,
    DescriptionDropped,
}

/// Read the manifest's `name` field, if present and a string.
pub fn manifest_name(manifest: &Value) -> Option<&str> {
    manifest.get("name").and_then(Value::as_str)
}

/// True while the manifest still carries the reserved template name.
pub fn is_template_manifest(manifest: &Value) -> bool {
    manifest_name(manifest) == Some(TEMPLATE_MARKER)
}

/// Drop every template-only script. Absent scripts are not an error.
pub fn remove_template_scripts(manifest: &mut Value) -> Vec<ManifestChange> {
    let mut changes = Vec::new();
    if let Some(scripts) = manifest.get_mut("scripts").and_then(Value::as_object_mut) {
        for name in TEMPLATE_ONLY_SCRIPTS {
            if scripts.shift_remove(*name).is_some() {
                changes.push(ManifestChange::ScriptRemoved((*name).to_string()));
            }
        }
    }
    changes
}

/// Rename infrastructure scripts to their public names, keeping the original
/// command strings. A rename whose target already exists is skipped so an
/// operator-defined script is never clobbered.
pub fn rename_infra_scripts(manifest: &mut Value) -> Vec<ManifestChange> {
    let mut changes = Vec::new();
    if let Some(scripts) = manifest.get_mut("scripts").and_then(Value::as_object_mut) {
        for (from, to) in INFRA_SCRIPT_RENAMES {
            if scripts.contains_key(*to) {
                continue;
            }
            if let Some(command) = scripts.shift_remove(*from) {
                scripts.insert((*to).to_string(), command);
                changes.push(ManifestChange::ScriptRenamed {
                    from: (*from).to_string(),
                    to: (*to).to_string(),
                });
            }
        }
    }
    changes
}

/// Rewrite the manifest identity for the derived project: set `name`, reset
/// `version` to the initial value, drop the template `description`.
pub fn apply_project_identity(manifest: &mut Value, package_name: &str) -> Vec<ManifestChange> {
    let mut changes = Vec::new();
    if let Some(obj) = manifest.as_object_mut() {
        obj.insert("name".to_string(), Value::String(package_name.to_string()));
        changes.push(ManifestChange::NameSet(package_name.to_string()));

        obj.insert(
            "version".to_string(),
            Value::String(INITIAL_VERSION.to_string()),
        );
        changes.push(ManifestChange::VersionReset);

        if obj.shift_remove("description").is_some() {
            changes.push(ManifestChange::DescriptionDropped);
        }
    }
    changes
}

/// Serialize the manifest the way package managers write it: two-space
/// indent, trailing newline.
pub fn to_manifest_string(manifest: &Value) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(manifest)?;
    out.push('\n');
    Ok(out)
}
