use crate::config::Config;
use crate::invoice::model::{long_date, InvoiceData};

/// Everything the user needs to paste into a mail client. Nothing is
/// sent from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Resolve the recipient list. First non-empty source wins:
/// configured override list, configured default client email, the
/// invoice's client email, then a placeholder.
pub fn email_recipients(config: &Config, client_email: &str) -> Vec<String> {
    let configured = config.email.recipient_list();
    if !configured.is_empty() {
        return configured;
    }
    if !config.client.email.trim().is_empty() {
        return vec![config.client.email.trim().to_string()];
    }
    if !client_email.trim().is_empty() {
        return vec![client_email.trim().to_string()];
    }
    vec!["client@example.com".to_string()]
}

/// Build the email template for an invoice. Pure: same invoice and
/// config, same output.
pub fn build_email(invoice: &InvoiceData, config: &Config) -> EmailTemplate {
    let amount = invoice.formatted_amount();
    let due = long_date(invoice.due_date);

    let subject = format!(
        "Invoice {} - {} - Due {}",
        invoice.invoice_number, amount, due
    );

    let notes_block = if invoice.notes.trim().is_empty() {
        String::new()
    } else {
        format!("NOTES:\n{}\n\n", invoice.notes)
    };

    let body = format!(
        "Dear {client_name},\n\n\
         I hope this email finds you well. Please find attached invoice {number} for \
         services provided to {client_company} during {period}.\n\n\
         INVOICE DETAILS:\n\
         Invoice Number: {number}\n\
         Amount: {amount}\n\
         Service Period: {period}\n\
         Due Date: {due}\n\n\
         SERVICE DESCRIPTION:\n\
         {description}\n\n\
         PAYMENT INFORMATION:\n\
         {bank_details}\n\n\
         {notes_block}\
         Please process the payment by {due}. If you have any questions regarding this \
         invoice, please don't hesitate to contact me.\n\n\
         Thank you for your business.\n\n\
         Best regards,\n\
         {contractor_name}\n\
         {contractor_email}\n\
         {contractor_phone}\n\n\
         ---\n\
         Please retain this email for your records.",
        client_name = invoice.client_name,
        number = invoice.invoice_number,
        client_company = invoice.client_company,
        period = invoice.service_period,
        amount = amount,
        due = due,
        description = invoice.service_description,
        bank_details = invoice.bank_details,
        notes_block = notes_block,
        contractor_name = invoice.contractor_name,
        contractor_email = invoice.contractor_email,
        contractor_phone = invoice.contractor_phone,
    );

    EmailTemplate {
        recipients: email_recipients(config, &invoice.client_email),
        subject,
        body,
    }
}
