use chrono::Local;
use tera::{Context, Tera};

use crate::error::{InvoiceError, Result};
use crate::invoice::{long_date, InvoiceData};

/// Embedded invoice template. Fixed-width single-column document sized
/// to a standard page; conditional sections (notes, client email) are
/// template logic, not code.
const INVOICE_TEMPLATE: &str = include_str!("../../templates/invoice.tera");

/// Render the invoice to a complete HTML document.
///
/// Deterministic apart from the "generated on" footer date. Fields are
/// interpolated verbatim: autoescaping is off, so markup characters in
/// the record pass through unchanged. The record is trusted input.
pub fn render_html(invoice: &InvoiceData) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("invoice", INVOICE_TEMPLATE)
        .map_err(|e| InvoiceError::Render(e.to_string()))?;
    tera.autoescape_on(vec![]);

    let mut ctx = Context::new();
    ctx.insert("invoice_number", &invoice.invoice_number);
    ctx.insert("invoice_date", &long_date(invoice.invoice_date));
    ctx.insert("due_date", &long_date(invoice.due_date));
    ctx.insert("amount", &format!("{:.2}", invoice.amount));
    ctx.insert("currency_symbol", invoice.currency.symbol());
    ctx.insert("currency_code", invoice.currency.code());
    ctx.insert("contractor_name", &invoice.contractor_name);
    ctx.insert("contractor_address", &invoice.contractor_address);
    ctx.insert("contractor_email", &invoice.contractor_email);
    ctx.insert("contractor_phone", &invoice.contractor_phone);
    ctx.insert("client_name", &invoice.client_name);
    ctx.insert("client_company", &invoice.client_company);
    ctx.insert("client_email", &invoice.client_email);
    ctx.insert("service_description", &invoice.service_description);
    ctx.insert("service_period", &invoice.service_period);
    ctx.insert("bank_details", &invoice.bank_details);
    ctx.insert("notes", &invoice.notes);
    ctx.insert("generated_on", &long_date(Local::now().date_naive()));

    tera.render("invoice", &ctx)
        .map_err(|e| InvoiceError::Render(e.to_string()))
}
