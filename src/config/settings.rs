use serde::{Deserialize, Serialize};

/// `config.toml`. Every key is optional; absent keys fall back to an
/// empty string or the documented default so a bare `init` already
/// produces a working setup.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Default service description pre-filled into new drafts.
    pub services: String,
    pub contractor: Contractor,
    pub client: ClientDefaults,
    pub payment: Payment,
    pub email: EmailSettings,
    pub invoice: InvoiceSettings,
    pub pdf: PdfSettings,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Contractor {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ClientDefaults {
    pub name: String,
    pub company: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Payment {
    /// Multi-line, rendered verbatim (newlines preserved).
    pub bank_details: String,
    pub currency: String,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            bank_details: String::new(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmailSettings {
    /// Comma-separated recipient override list. When non-empty it wins
    /// over every other recipient source.
    pub recipients: String,
}

impl EmailSettings {
    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct InvoiceSettings {
    pub prefix: String,
    pub due_days: u32,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            prefix: "INV".to_string(),
            due_days: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfSettings {
    pub output_dir: String,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/.facture/output".to_string(),
        }
    }
}
