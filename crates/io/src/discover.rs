// Input discovery: every .xlsx under the configured roots

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use ventas_pipeline::schema::EXCLUDED_PATH_FRAGMENT;

/// Recursively list `*.xlsx` files under each root, in root order.
///
/// Files under each root are sorted; any path whose lowercase form contains
/// the excluded fragment ("servigral") is left out. Hidden files and
/// directories are not matched. A root that does not exist contributes
/// nothing.
pub fn discover_inputs(roots: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut found = Vec::new();
    for root in roots {
        let files = discover_root(root)?;
        tracing::debug!(root = %root.display(), files = files.len(), "input root scanned");
        found.extend(files);
    }
    Ok(found)
}

fn discover_root(root: &Path) -> Result<Vec<PathBuf>, String> {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "input root is not a directory; skipping");
        return Ok(Vec::new());
    }

    let pattern = root.join("**").join("*.xlsx");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| format!("input root '{}' is not valid UTF-8", root.display()))?;
    let escaped = escape_root(root, pattern);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let entries = glob::glob_with(&escaped, options)
        .map_err(|e| format!("invalid input pattern '{}': {}", escaped, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable path during discovery");
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| !is_excluded(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Escape glob metacharacters in the root part of the pattern so folder
/// names like "Ventas [2024]" are matched literally.
fn escape_root(root: &Path, pattern: &str) -> String {
    let root_str = root.to_string_lossy();
    match pattern.strip_prefix(root_str.as_ref()) {
        Some(rest) => format!("{}{}", glob::Pattern::escape(&root_str), rest),
        None => pattern.to_string(),
    }
}

pub fn is_excluded(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .contains(EXCLUDED_PATH_FRAGMENT)
}
