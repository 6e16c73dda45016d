use std::fmt::Display;
use std::fs;
use std::path::Path;

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};

use super::{page_height_mm, PageSetup, RenderEngine};
use crate::error::{InvoiceError, Result};

const MM_PER_INCH: f64 = 25.4;

/// Headless-Chromium rendering engine. One browser process per call,
/// no pooling and no reuse; the process is released when the pass
/// finishes, whether it succeeded or not.
pub struct ChromiumEngine;

impl ChromiumEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChromiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for ChromiumEngine {
    fn render_to_pdf(&self, markup: &str, setup: &PageSetup) -> Result<Vec<u8>> {
        let temp_dir = std::env::temp_dir().join("facture");
        fs::create_dir_all(&temp_dir)?;
        let html_path = temp_dir.join("invoice.html");
        fs::write(&html_path, markup)?;

        let result = print_markup(&html_path, setup);

        let _ = fs::remove_file(&html_path);
        result
    }
}

fn print_markup(html_path: &Path, setup: &PageSetup) -> Result<Vec<u8>> {
    let launch = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .build()
        .map_err(|e| InvoiceError::BrowserLaunch(e.to_string()))?;
    let browser = Browser::new(launch).map_err(|e| InvoiceError::BrowserLaunch(e.to_string()))?;

    let tab = browser.new_tab().map_err(pdf_err)?;
    tab.navigate_to(&format!("file://{}", html_path.display()))
        .map_err(pdf_err)?;
    // Sub-resources (fonts, styles) must settle before measuring,
    // otherwise the height comes out short and the print truncates.
    tab.wait_until_navigated().map_err(pdf_err)?;

    let content_height_px = tab
        .evaluate("document.body.scrollHeight", false)
        .map_err(pdf_err)?
        .value
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height_mm = page_height_mm(setup, content_height_px);

    tab.print_to_pdf(Some(PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(setup.width_mm / MM_PER_INCH),
        paper_height: Some(height_mm / MM_PER_INCH),
        margin_top: Some(setup.margin_mm / MM_PER_INCH),
        margin_bottom: Some(setup.margin_mm / MM_PER_INCH),
        margin_left: Some(setup.margin_mm / MM_PER_INCH),
        margin_right: Some(setup.margin_mm / MM_PER_INCH),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }))
    .map_err(pdf_err)
    // Dropping `browser` here kills the engine process on success and
    // failure alike.
}

fn pdf_err(e: impl Display) -> InvoiceError {
    InvoiceError::PdfGeneration(e.to_string())
}
