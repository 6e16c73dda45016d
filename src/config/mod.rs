mod settings;

pub use settings::{
    ClientDefaults, Config, Contractor, EmailSettings, InvoiceSettings, Payment, PdfSettings,
};

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.facture/ or XDG equivalent)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "facture") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.facture/
    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".facture"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output directory, keeping relative paths inside the
/// config directory.
pub fn resolve_output_dir(configured: &str, config_dir: &Path) -> PathBuf {
    if configured.is_empty() {
        return config_dir.join("output");
    }
    let expanded = expand_path(configured);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Directory backing the key-value store (counter + draft snapshot).
pub fn state_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("state")
}

/// Load config.toml (defaults if the file is missing; the directory
/// itself must exist)
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Default service description pre-filled into new drafts.
services = "Web development services"

[contractor]
name = "Your Name"
address = """123 Business Street
San Francisco, CA 94102"""
email = "you@example.com"
phone = "+1-555-123-4567"

# Defaults pre-filled into the client section of new drafts.
[client]
name = ""
company = ""
email = ""

[payment]
bank_details = """Bank: Example Bank
IBAN: DE00 0000 0000 0000
BIC: EXAMPLEX"""
currency = "USD"   # USD, EUR or GBP

[email]
# Comma-separated override list. When set, invoice emails are addressed
# here regardless of the client email on the invoice.
recipients = ""

[invoice]
prefix = "INV"     # invoice numbers look like INV-001
due_days = 30      # default due date = invoice date + due_days

[pdf]
output_dir = "~/.facture/output"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_parses_into_config() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.invoice.prefix, "INV");
        assert_eq!(config.services, "Web development services");
        assert!(config.payment.bank_details.contains("IBAN"));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.invoice.due_days, 30);
    }

    #[test]
    fn missing_config_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_config(&missing),
            Err(InvoiceError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn output_dir_resolution() {
        let base = PathBuf::from("/cfg");
        assert_eq!(resolve_output_dir("", &base), PathBuf::from("/cfg/output"));
        assert_eq!(
            resolve_output_dir("out", &base),
            PathBuf::from("/cfg/out")
        );
        assert_eq!(
            resolve_output_dir("/abs/out", &base),
            PathBuf::from("/abs/out")
        );
    }
}
