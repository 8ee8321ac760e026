use anyhow::Result;
use std::path::PathBuf;

pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Delimiter implied by the file extension.
pub fn delimiter_for(path: &str) -> u8 {
    if path.to_lowercase().ends_with(".tsv") {
        b'\t'
    } else {
        b','
    }
}

/// Parse one numeric answer typed at a prompt.
pub fn parse_feature_value(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| anyhow::anyhow!("Not a number: '{}'", trimmed))?;
    if !value.is_finite() {
        anyhow::bail!("Not a finite number: '{}'", trimmed);
    }
    Ok(value)
}
