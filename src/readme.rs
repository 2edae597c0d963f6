//! Pure transforms over the starter README.
//!
//! All rewrites are pattern substitutions on the document text; patterns that
//! do not match simply produce no change. The orchestrator reports a missed
//! pattern as a skip, never a failure, so a hand-edited README degrades
//! gracefully instead of aborting cleanup.

use std::sync::LazyLock;

use regex::Regex;

use crate::manifest::TEMPLATE_MARKER;
use crate::project::ProjectSettings;

/// README file name at the project root.
pub const README_FILE: &str = "README.md";

/// Second-level sections that only describe the starter itself.
pub const TEMPLATE_ONLY_SECTIONS: &[&str] = &["Quick start", "Contributing", "License"];

// Title heading plus the tagline paragraph directly below it.
static TITLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A# [^\n]+\n\n[^\n#][^\n]*").unwrap());

// Attribution line left by the starter.
static ATTRIBUTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Maintained as part of [^\n]+$").unwrap());

/// A single applied README mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeChange {
    TitleRewritten,
    SectionRemoved(String),
    DirectoryNameSubstituted { count: usize },
    AttributionRewritten,
}

/// Rewrite the README for the derived project. Returns the new content and
/// the list of substitutions that actually matched.
pub fn rewrite_readme(content: &str, settings: &ProjectSettings) -> (String, Vec<ReadmeChange>) {
    let mut changes = Vec::new();
    let package_name = settings.package_name();

    // 1. Title + tagline.
    let mut out = match TITLE_BLOCK.find(content) {
        Some(m) => {
            changes.push(ReadmeChange::TitleRewritten);
            let replacement = format!(
                "# {}\n\n{} web application.",
                settings.project_name, settings.project_name
            );
            format!("{replacement}{}", &content[m.end()..])
        }
        None => content.to_string(),
    };

    // 2. Starter-only sections, each spanning to the next heading or EOF.
    for section in TEMPLATE_ONLY_SECTIONS {
        if let Some(trimmed) = remove_section(&out, section) {
            out = trimmed;
            changes.push(ReadmeChange::SectionRemoved((*section).to_string()));
        }
    }

    // 3. Directory-name substitution (clone URLs, cd commands, badges).
    let count = out.matches(TEMPLATE_MARKER).count();
    if count > 0 {
        out = out.replace(TEMPLATE_MARKER, &package_name);
        changes.push(ReadmeChange::DirectoryNameSubstituted { count });
    }

    // 4. Attribution.
    if ATTRIBUTION_LINE.is_match(&out) {
        let line = format!(
            "{} was scaffolded from the Stencil starter template.",
            settings.project_name
        );
        out = ATTRIBUTION_LINE.replace(&out, line.as_str()).into_owned();
        changes.push(ReadmeChange::AttributionRewritten);
    }

    // Section removal can leave stacked blank lines behind.
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }

    (out, changes)
}

/// Remove a `## <heading>` section, spanning from its heading line to the
/// next `#`/`##` heading or end of file. Returns `None` when the heading is
/// absent.
fn remove_section(content: &str, heading: &str) -> Option<String> {
    let needle = format!("## {heading}");
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let start = lines
        .iter()
        .position(|line| line.trim_end() == needle)?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.starts_with("# ") || line.starts_with("## "))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    let mut out = String::with_capacity(content.len());
    for (i, line) in lines.iter().enumerate() {
        if i < start || i >= end {
            out.push_str(line);
        }
    }
    Some(out)
}
