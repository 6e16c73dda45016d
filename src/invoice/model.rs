use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{InvoiceError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    #[value(name = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    #[value(name = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    #[value(name = "GBP")]
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The complete invoice record, threaded unchanged through preview,
/// PDF export and the email builder. The JSON wire format (camelCase)
/// is what the export endpoint accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,

    pub contractor_name: String,
    pub contractor_address: String,
    pub contractor_email: String,
    pub contractor_phone: String,

    pub client_name: String,
    pub client_company: String,
    #[serde(default)]
    pub client_email: String,

    pub service_description: String,
    /// Derived from the service dates; never edited independently.
    #[serde(default)]
    pub service_period: String,
    #[serde(default)]
    pub service_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_end_date: Option<NaiveDate>,

    pub amount: f64,
    pub currency: Currency,

    pub bank_details: String,
    #[serde(default)]
    pub notes: String,
}

/// Long-form date used in rendered documents and email text,
/// e.g. "January 5, 2025".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Display string for a service date range. Empty unless both ends are
/// set.
pub fn service_period_for(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{} - {}", long_date(start), long_date(end)),
        _ => String::new(),
    }
}

impl InvoiceData {
    /// Recompute `service_period` from the service dates. Invoked
    /// whenever the record crosses a trust boundary (CLI composition,
    /// the export endpoint) so a stale or hand-edited period string
    /// never survives.
    pub fn refresh_service_period(&mut self) {
        self.service_period = service_period_for(self.service_start_date, self.service_end_date);
    }

    /// Amount formatted for subject lines and totals:
    /// currency symbol + fixed 2 decimals + currency code.
    pub fn formatted_amount(&self) -> String {
        format!(
            "{}{:.2} {}",
            self.currency.symbol(),
            self.amount,
            self.currency.code()
        )
    }

    /// Submission gate. Blocks on a non-positive amount first, then on
    /// any required field left empty.
    pub fn validate(&self) -> Result<()> {
        if !(self.amount > 0.0) {
            return Err(InvoiceError::InvalidAmount);
        }
        let required: [(&'static str, &str); 8] = [
            ("invoice number", &self.invoice_number),
            ("contractor name", &self.contractor_name),
            ("contractor address", &self.contractor_address),
            ("contractor email", &self.contractor_email),
            ("contractor phone", &self.contractor_phone),
            ("client name", &self.client_name),
            ("client company", &self.client_company),
            ("bank details", &self.bank_details),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(InvoiceError::MissingField(name));
            }
        }
        if self.service_description.trim().is_empty() {
            return Err(InvoiceError::MissingField("service description"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_invoice() -> InvoiceData {
        InvoiceData {
            invoice_number: "INV-007".into(),
            invoice_date: date(2025, 1, 5),
            due_date: date(2025, 2, 4),
            contractor_name: "Jane Doe".into(),
            contractor_address: "1 Main St\nSpringfield".into(),
            contractor_email: "jane@doe.dev".into(),
            contractor_phone: "+1 555 0100".into(),
            client_name: "John Smith".into(),
            client_company: "Acme Corp".into(),
            client_email: "john@acme.test".into(),
            service_description: "Web development services".into(),
            service_period: String::new(),
            service_start_date: Some(date(2025, 1, 1)),
            service_end_date: Some(date(2025, 1, 31)),
            amount: 1500.0,
            currency: Currency::Usd,
            bank_details: "IBAN DE00 1234\nBIC TESTDE00".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn service_period_derivation() {
        assert_eq!(
            service_period_for(Some(date(2025, 1, 1)), Some(date(2025, 1, 31))),
            "January 1, 2025 - January 31, 2025"
        );
        assert_eq!(service_period_for(None, Some(date(2025, 1, 31))), "");
        assert_eq!(service_period_for(Some(date(2025, 1, 1)), None), "");
        assert_eq!(service_period_for(None, None), "");
    }

    #[test]
    fn refresh_overwrites_stale_period() {
        let mut invoice = sample_invoice();
        invoice.service_period = "hand-edited".into();
        invoice.refresh_service_period();
        assert_eq!(invoice.service_period, "January 1, 2025 - January 31, 2025");

        invoice.service_end_date = None;
        invoice.refresh_service_period();
        assert_eq!(invoice.service_period, "");
    }

    #[test]
    fn amount_validation_boundaries() {
        let mut invoice = sample_invoice();
        invoice.amount = 0.0;
        assert!(matches!(
            invoice.validate(),
            Err(InvoiceError::InvalidAmount)
        ));

        invoice.amount = -10.0;
        assert!(matches!(
            invoice.validate(),
            Err(InvoiceError::InvalidAmount)
        ));

        invoice.amount = 0.01;
        assert!(invoice.validate().is_ok());
    }

    #[test]
    fn missing_required_field_blocks() {
        let mut invoice = sample_invoice();
        invoice.client_company = "  ".into();
        assert!(matches!(
            invoice.validate(),
            Err(InvoiceError::MissingField("client company"))
        ));
    }

    #[test]
    fn client_email_and_notes_are_optional() {
        let mut invoice = sample_invoice();
        invoice.client_email = String::new();
        invoice.notes = String::new();
        assert!(invoice.validate().is_ok());
    }

    #[test]
    fn formatted_amount_uses_symbol_and_code() {
        let mut invoice = sample_invoice();
        assert_eq!(invoice.formatted_amount(), "$1500.00 USD");
        invoice.currency = Currency::Eur;
        invoice.amount = 0.5;
        assert_eq!(invoice.formatted_amount(), "€0.50 EUR");
    }

    #[test]
    fn wire_format_round_trip() {
        let json = serde_json::to_string(&sample_invoice()).unwrap();
        assert!(json.contains("\"invoiceNumber\":\"INV-007\""));
        assert!(json.contains("\"currency\":\"USD\""));
        assert!(json.contains("\"invoiceDate\":\"2025-01-05\""));

        let parsed: InvoiceData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.invoice_number, "INV-007");
        assert_eq!(parsed.service_start_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn minimal_payload_fills_defaults() {
        let json = r#"{
            "invoiceNumber": "INV-001",
            "invoiceDate": "2025-01-05",
            "dueDate": "2025-02-04",
            "contractorName": "Jane",
            "contractorAddress": "Addr",
            "contractorEmail": "j@d.dev",
            "contractorPhone": "555",
            "clientName": "John",
            "clientCompany": "Acme",
            "serviceDescription": "Work",
            "amount": 10.0,
            "currency": "GBP",
            "bankDetails": "IBAN"
        }"#;
        let parsed: InvoiceData = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.client_email, "");
        assert_eq!(parsed.notes, "");
        assert_eq!(parsed.service_start_date, None);
        assert_eq!(parsed.currency, Currency::Gbp);
    }
}
