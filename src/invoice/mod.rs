mod compose;
mod email;
mod model;

pub use compose::{compose_invoice, draft_defaults, InvoiceTerms};
pub use email::{build_email, email_recipients, EmailTemplate};
pub use model::{long_date, service_period_for, Currency, InvoiceData};
