use chrono::{Duration, Local, NaiveDate};

use crate::config::Config;
use crate::invoice::model::{Currency, InvoiceData};
use crate::store::DraftFields;

/// A fresh draft, pre-filled from configuration defaults.
pub fn draft_defaults(config: &Config) -> DraftFields {
    DraftFields {
        contractor_name: config.contractor.name.clone(),
        contractor_address: config.contractor.address.clone(),
        contractor_email: config.contractor.email.clone(),
        contractor_phone: config.contractor.phone.clone(),
        client_name: config.client.name.clone(),
        client_company: config.client.company.clone(),
        client_email: config.client.email.clone(),
        service_description: config.services.clone(),
        currency: Currency::parse(&config.payment.currency).unwrap_or_default(),
        bank_details: config.payment.bank_details.clone(),
        notes: String::new(),
    }
}

/// Per-invoice terms that never live in the draft: amount, identity and
/// the four dates.
#[derive(Debug, Default, Clone)]
pub struct InvoiceTerms {
    pub amount: f64,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub service_start: Option<NaiveDate>,
    pub service_end: Option<NaiveDate>,
}

/// Assemble the full record from draft fields and per-invoice terms.
/// The invoice date defaults to today, the due date to invoice date +
/// `due_days`; the service period is derived here so the record leaves
/// composition already consistent.
pub fn compose_invoice(
    config: &Config,
    fields: &DraftFields,
    number: String,
    terms: &InvoiceTerms,
) -> InvoiceData {
    let invoice_date = terms
        .invoice_date
        .unwrap_or_else(|| Local::now().date_naive());
    let due_date = terms.due_date.unwrap_or_else(|| {
        invoice_date + Duration::days(i64::from(config.invoice.due_days))
    });

    let mut invoice = InvoiceData {
        invoice_number: number,
        invoice_date,
        due_date,
        contractor_name: fields.contractor_name.clone(),
        contractor_address: fields.contractor_address.clone(),
        contractor_email: fields.contractor_email.clone(),
        contractor_phone: fields.contractor_phone.clone(),
        client_name: fields.client_name.clone(),
        client_company: fields.client_company.clone(),
        client_email: fields.client_email.clone(),
        service_description: fields.service_description.clone(),
        service_period: String::new(),
        service_start_date: terms.service_start,
        service_end_date: terms.service_end,
        amount: terms.amount,
        currency: fields.currency,
        bank_details: fields.bank_details.clone(),
        notes: fields.notes.clone(),
    };
    invoice.refresh_service_period();
    invoice
}
