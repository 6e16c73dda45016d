mod chromium;

pub use chromium::ChromiumEngine;

use crate::error::Result;
use crate::invoice::InvoiceData;
use crate::render::render_html;

/// CSS pixels to millimeters at the 96 dpi the engine renders at.
const MM_PER_PX: f64 = 0.264583;

/// Physical page parameters for the print pass. A4 width, A4 minimum
/// height, uniform margins.
#[derive(Debug, Clone)]
pub struct PageSetup {
    pub width_mm: f64,
    pub min_height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            min_height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

/// Page height for a measured content height: at least one standard
/// page, and exactly one page no matter how tall the content gets.
/// The document grows downward instead of paginating.
pub fn page_height_mm(setup: &PageSetup, content_height_px: f64) -> f64 {
    setup.min_height_mm.max((content_height_px * MM_PER_PX).ceil())
}

/// The external rendering engine, behind a narrow seam so the PDF
/// pipeline is testable without a browser binary.
pub trait RenderEngine {
    fn render_to_pdf(&self, markup: &str, setup: &PageSetup) -> Result<Vec<u8>>;
}

/// A finished export: the bytes plus the download filename derived from
/// the invoice number.
#[derive(Debug)]
pub struct PdfDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Render the invoice and rasterize it through `engine`. Single
/// attempt; any engine failure surfaces as one error with no partial
/// output.
pub fn export(invoice: &InvoiceData, engine: &dyn RenderEngine) -> Result<PdfDocument> {
    let markup = render_html(invoice)?;
    let bytes = engine.render_to_pdf(&markup, &PageSetup::default())?;
    Ok(PdfDocument {
        filename: format!("{}.pdf", invoice.invoice_number),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvoiceError;
    use crate::invoice::Currency;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    #[test]
    fn short_content_gets_a_standard_page() {
        let setup = PageSetup::default();
        assert_eq!(page_height_mm(&setup, 0.0), 297.0);
        assert_eq!(page_height_mm(&setup, 500.0), 297.0);
        // 1122 px is almost exactly one A4 page.
        assert_eq!(page_height_mm(&setup, 1122.0), 297.0);
    }

    #[test]
    fn tall_content_gets_one_tall_page() {
        let setup = PageSetup::default();
        // 2000 px * 0.264583 = 529.166 -> 530 mm, a single page.
        assert_eq!(page_height_mm(&setup, 2000.0), 530.0);
        assert_eq!(page_height_mm(&setup, 10_000.0), 2646.0);
    }

    struct StubEngine {
        markup_seen: RefCell<Option<String>>,
    }

    impl RenderEngine for StubEngine {
        fn render_to_pdf(&self, markup: &str, _setup: &PageSetup) -> crate::error::Result<Vec<u8>> {
            *self.markup_seen.borrow_mut() = Some(markup.to_string());
            Ok(b"%PDF-stub".to_vec())
        }
    }

    struct FailingEngine;

    impl RenderEngine for FailingEngine {
        fn render_to_pdf(
            &self,
            _markup: &str,
            _setup: &PageSetup,
        ) -> crate::error::Result<Vec<u8>> {
            Err(InvoiceError::PdfGeneration("engine crashed".to_string()))
        }
    }

    fn sample_invoice() -> InvoiceData {
        let mut invoice = InvoiceData {
            invoice_number: "INV-042".into(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(),
            contractor_name: "Jane Doe".into(),
            contractor_address: "1 Main St".into(),
            contractor_email: "jane@doe.dev".into(),
            contractor_phone: "+1 555 0100".into(),
            client_name: "John Smith".into(),
            client_company: "Acme Corp".into(),
            client_email: String::new(),
            service_description: "Web development".into(),
            service_period: String::new(),
            service_start_date: None,
            service_end_date: None,
            amount: 100.0,
            currency: Currency::Usd,
            bank_details: "IBAN".into(),
            notes: String::new(),
        };
        invoice.refresh_service_period();
        invoice
    }

    #[test]
    fn export_renders_markup_and_names_the_file() {
        let engine = StubEngine {
            markup_seen: RefCell::new(None),
        };
        let pdf = export(&sample_invoice(), &engine).unwrap();
        assert_eq!(pdf.filename, "INV-042.pdf");
        assert_eq!(pdf.bytes, b"%PDF-stub");
        let markup = engine.markup_seen.borrow().clone().unwrap();
        assert!(markup.contains("INV-042"));
    }

    #[test]
    fn engine_failure_surfaces_as_a_single_error() {
        let err = export(&sample_invoice(), &FailingEngine).unwrap_err();
        assert!(matches!(err, InvoiceError::PdfGeneration(_)));
    }
}
