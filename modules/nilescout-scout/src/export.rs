//! CSV and JSON export of the final creator list.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use nilescout_common::CreatorRecord;

const CSV_HEADER: &str = "name,username,profile_url,followers_count";

/// Write the compact CSV export. Columns are fixed; an unknown follower
/// count becomes an empty cell.
pub fn write_csv(path: &Path, creators: &[CreatorRecord]) -> Result<()> {
    let mut out = String::with_capacity(creators.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for creator in creators {
        let followers = creator
            .follower_count
            .map(|n| n.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&creator.display_name),
            csv_field(&creator.username),
            csv_field(&creator.profile_url),
            followers,
        ));
    }

    write_output(path, out.as_bytes()).with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    info!(path = %path.display(), creators = creators.len(), "Wrote CSV export");
    Ok(())
}

/// Write the full records as pretty-printed JSON. `-` or `stdout` prints to
/// standard output instead of a file.
pub fn write_json(path: &Path, creators: &[CreatorRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(creators).context("Failed to serialize creators")?;

    if path == Path::new("-") || path == Path::new("stdout") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    write_output(path, json.as_bytes())
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    info!(path = %path.display(), creators = creators.len(), "Wrote JSON export");
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
