mod clipboard;
mod config;
mod error;
mod invoice;
mod pdf;
mod render;
mod server;
mod store;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_config, resolve_output_dir, state_dir, Config, CONFIG_TEMPLATE,
};
use crate::error::{InvoiceError, Result};
use crate::invoice::{
    build_email, compose_invoice, draft_defaults, Currency, InvoiceTerms,
};
use crate::pdf::ChromiumEngine;
use crate::store::{DebouncedSaver, DraftFields, DraftStore, FileStore, SequenceCounter};

#[derive(Parser)]
#[command(name = "facture")]
#[command(version, about = "Contractor invoice generator", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.facture or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config file
    Init,

    /// Show configuration, invoice numbering and draft state
    Status,

    /// Inspect or persist the reusable draft fields
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },

    /// Show or rebase the invoice-number counter
    Number {
        #[command(subcommand)]
        command: NumberCommands,
    },

    /// Generate an invoice PDF
    Generate {
        #[command(flatten)]
        invoice: InvoiceArgs,

        /// Custom output file path (default: output_dir/<number>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the rendered invoice markup
    Preview {
        #[command(flatten)]
        invoice: InvoiceArgs,

        /// Write markup to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the invoice email template for manual sending
    Email {
        #[command(flatten)]
        invoice: InvoiceArgs,

        /// Copy subject and body to the system clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Run the PDF export endpoint on localhost
    Serve {
        #[arg(short, long, default_value_t = 8023)]
        port: u16,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Show the saved draft
    Show,

    /// Save draft fields; unset flags keep the current draft value
    /// (or the config default when no draft exists yet)
    Save {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete the saved draft
    Clear,
}

#[derive(Subcommand)]
enum NumberCommands {
    /// Show the current invoice number without advancing it
    Show,

    /// Rebase the counter from an invoice number (e.g. INV-042)
    Set { identifier: String },
}

/// Draft-field overrides shared by `draft save`, `generate`, `preview`
/// and `email`.
#[derive(Args, Default)]
struct FieldArgs {
    #[arg(long, value_name = "NAME")]
    contractor_name: Option<String>,
    #[arg(long, value_name = "ADDRESS")]
    contractor_address: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    contractor_email: Option<String>,
    #[arg(long, value_name = "PHONE")]
    contractor_phone: Option<String>,
    #[arg(long, value_name = "NAME")]
    client_name: Option<String>,
    #[arg(long, value_name = "COMPANY")]
    client_company: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    client_email: Option<String>,
    #[arg(long, value_name = "TEXT")]
    service_description: Option<String>,
    #[arg(long, value_enum)]
    currency: Option<Currency>,
    #[arg(long, value_name = "TEXT")]
    bank_details: Option<String>,
    #[arg(long, value_name = "TEXT")]
    notes: Option<String>,
}

impl FieldArgs {
    fn any_set(&self) -> bool {
        self.contractor_name.is_some()
            || self.contractor_address.is_some()
            || self.contractor_email.is_some()
            || self.contractor_phone.is_some()
            || self.client_name.is_some()
            || self.client_company.is_some()
            || self.client_email.is_some()
            || self.service_description.is_some()
            || self.currency.is_some()
            || self.bank_details.is_some()
            || self.notes.is_some()
    }

    fn apply_to(&self, fields: &mut DraftFields) {
        if let Some(v) = &self.contractor_name {
            fields.contractor_name = v.clone();
        }
        if let Some(v) = &self.contractor_address {
            fields.contractor_address = v.clone();
        }
        if let Some(v) = &self.contractor_email {
            fields.contractor_email = v.clone();
        }
        if let Some(v) = &self.contractor_phone {
            fields.contractor_phone = v.clone();
        }
        if let Some(v) = &self.client_name {
            fields.client_name = v.clone();
        }
        if let Some(v) = &self.client_company {
            fields.client_company = v.clone();
        }
        if let Some(v) = &self.client_email {
            fields.client_email = v.clone();
        }
        if let Some(v) = &self.service_description {
            fields.service_description = v.clone();
        }
        if let Some(v) = self.currency {
            fields.currency = v;
        }
        if let Some(v) = &self.bank_details {
            fields.bank_details = v.clone();
        }
        if let Some(v) = &self.notes {
            fields.notes = v.clone();
        }
    }
}

/// Per-invoice terms shared by `generate`, `preview` and `email`.
#[derive(Args)]
struct InvoiceArgs {
    /// Invoice amount
    #[arg(long, allow_negative_numbers = true)]
    amount: f64,

    /// Invoice number; rebases the counter for future auto-numbering.
    /// Auto-generated when omitted.
    #[arg(long, value_name = "NUMBER")]
    number: Option<String>,

    /// Invoice date (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    invoice_date: Option<NaiveDate>,

    /// Due date (YYYY-MM-DD, default: invoice date + due_days)
    #[arg(long, value_name = "DATE")]
    due_date: Option<NaiveDate>,

    /// Service period start (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    service_start: Option<NaiveDate>,

    /// Service period end (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    service_end: Option<NaiveDate>,

    #[command(flatten)]
    fields: FieldArgs,
}

impl InvoiceArgs {
    fn terms(&self) -> InvoiceTerms {
        InvoiceTerms {
            amount: self.amount,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            service_start: self.service_start,
            service_end: self.service_end,
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Draft { command } => match command {
            DraftCommands::Show => cmd_draft_show(&cfg_dir),
            DraftCommands::Save { fields } => cmd_draft_save(&cfg_dir, &fields),
            DraftCommands::Clear => cmd_draft_clear(&cfg_dir),
        },
        Commands::Number { command } => match command {
            NumberCommands::Show => cmd_number_show(&cfg_dir),
            NumberCommands::Set { identifier } => cmd_number_set(&cfg_dir, &identifier),
        },
        Commands::Generate { invoice, output } => cmd_generate(&cfg_dir, &invoice, output),
        Commands::Preview { invoice, output } => cmd_preview(&cfg_dir, &invoice, output),
        Commands::Email { invoice, copy } => cmd_email(&cfg_dir, &invoice, copy),
        Commands::Serve { port } => cmd_serve(port),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::create_dir_all(state_dir(cfg_dir))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized facture config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your details:        $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Save a reusable draft:    facture draft save --client-name <name> --client-company <company>");
    println!();
    println!("Then generate your first invoice:");
    println!("  facture generate --amount 1500 --service-start 2025-01-01 --service-end 2025-01-31");

    Ok(())
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "FIELD")]
    field: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn open_stores(cfg_dir: &PathBuf) -> Result<(Config, FileStore)> {
    let config = load_config(cfg_dir)?;
    let store = FileStore::new(state_dir(cfg_dir));
    Ok((config, store))
}

/// Show configuration, numbering and draft state
fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());
    let drafts = DraftStore::new(&store);

    println!("Facture Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!(
        "Contractor:       {}",
        if config.contractor.name.is_empty() {
            "(not configured)"
        } else {
            config.contractor.name.as_str()
        }
    );

    let current = counter.peek_current();
    if current.is_ephemeral() {
        println!(
            "Current number:   {} (numbering storage unavailable)",
            current
        );
    } else {
        println!("Current number:   {current}");
    }

    match drafts.last_saved_at() {
        Some(at) => println!("Draft:            saved {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Draft:            none"),
    }

    Ok(())
}

/// Compose the effective draft fields: saved draft (or config defaults)
/// overridden by whatever flags were passed.
fn effective_fields(config: &Config, drafts: &DraftStore<&FileStore>, args: &FieldArgs) -> DraftFields {
    let mut fields = drafts
        .load()
        .map(|s| s.fields)
        .unwrap_or_else(|| draft_defaults(config));
    args.apply_to(&mut fields);
    fields
}

/// Show the saved draft
fn cmd_draft_show(cfg_dir: &PathBuf) -> Result<()> {
    let (_, store) = open_stores(cfg_dir)?;
    let drafts = DraftStore::new(&store);

    let Some(snapshot) = drafts.load() else {
        println!("No draft saved.");
        return Ok(());
    };

    let f = &snapshot.fields;
    let rows = vec![
        FieldRow { field: "contractor-name", value: f.contractor_name.clone() },
        FieldRow { field: "contractor-address", value: f.contractor_address.clone() },
        FieldRow { field: "contractor-email", value: f.contractor_email.clone() },
        FieldRow { field: "contractor-phone", value: f.contractor_phone.clone() },
        FieldRow { field: "client-name", value: f.client_name.clone() },
        FieldRow { field: "client-company", value: f.client_company.clone() },
        FieldRow { field: "client-email", value: f.client_email.clone() },
        FieldRow { field: "service-description", value: f.service_description.clone() },
        FieldRow { field: "currency", value: f.currency.code().to_string() },
        FieldRow { field: "bank-details", value: f.bank_details.clone() },
        FieldRow { field: "notes", value: f.notes.clone() },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!(
        "Last saved: {}",
        snapshot.last_saved.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(())
}

/// Save draft fields through the debounced saver, flushed on exit
fn cmd_draft_save(cfg_dir: &PathBuf, args: &FieldArgs) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let fields = effective_fields(&config, &DraftStore::new(&store), args);

    let mut saver = DebouncedSaver::new(DraftStore::new(&store));
    saver.schedule_save(fields);
    saver.flush();

    println!("Draft saved.");
    Ok(())
}

/// Delete the saved draft
fn cmd_draft_clear(cfg_dir: &PathBuf) -> Result<()> {
    let (_, store) = open_stores(cfg_dir)?;
    DraftStore::new(&store).clear();
    println!("Draft cleared.");
    Ok(())
}

/// Show the current invoice number without advancing it
fn cmd_number_show(cfg_dir: &PathBuf) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());

    let current = counter.peek_current();
    if current.is_ephemeral() {
        println!("{current} (numbering storage unavailable)");
    } else {
        println!("{current}");
    }
    Ok(())
}

/// Rebase the counter from a manually chosen invoice number
fn cmd_number_set(cfg_dir: &PathBuf, identifier: &str) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());

    counter.reconcile_from(identifier);
    println!("Current number: {}", counter.peek_current());
    Ok(())
}

/// Generate an invoice PDF
fn cmd_generate(cfg_dir: &PathBuf, args: &InvoiceArgs, output: Option<PathBuf>) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let drafts = DraftStore::new(&store);
    let fields = effective_fields(&config, &drafts, &args.fields);

    // Edited fields become the new draft, like a form auto-save.
    if args.fields.any_set() {
        let mut saver = DebouncedSaver::new(DraftStore::new(&store));
        saver.schedule_save(fields.clone());
        saver.flush();
    }

    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());

    // Validate against a provisional number so a rejected submission
    // does not consume one.
    let provisional = match &args.number {
        Some(n) => n.clone(),
        None => counter.peek_current().into_inner(),
    };
    let mut invoice = compose_invoice(&config, &fields, provisional, &args.terms());
    invoice.validate()?;

    match &args.number {
        Some(n) => counter.reconcile_from(n),
        None => {
            let issued = counter.advance();
            if issued.is_ephemeral() {
                eprintln!(
                    "Warning: numbering storage is unavailable; using ephemeral number {issued}"
                );
            }
            invoice.invoice_number = issued.into_inner();
        }
    }

    let document = pdf::export(&invoice, &ChromiumEngine::new())?;

    let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;
    let pdf_path = output.unwrap_or_else(|| output_dir.join(&document.filename));
    std::fs::write(&pdf_path, &document.bytes)?;

    println!("Generated {}", invoice.invoice_number);
    println!("  Client: {}", invoice.client_name);
    println!("  Total:  {}", invoice.formatted_amount());
    println!("  Saved:  {}", pdf_path.display());

    Ok(())
}

/// Print the rendered invoice markup
fn cmd_preview(cfg_dir: &PathBuf, args: &InvoiceArgs, output: Option<PathBuf>) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let fields = effective_fields(&config, &DraftStore::new(&store), &args.fields);
    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());

    let number = match &args.number {
        Some(n) => n.clone(),
        None => counter.peek_current().into_inner(),
    };
    let invoice = compose_invoice(&config, &fields, number, &args.terms());

    let markup = render::render_html(&invoice)?;
    match output {
        Some(path) => {
            std::fs::write(&path, markup)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{markup}"),
    }

    Ok(())
}

/// Print the invoice email template
fn cmd_email(cfg_dir: &PathBuf, args: &InvoiceArgs, copy: bool) -> Result<()> {
    let (config, store) = open_stores(cfg_dir)?;
    let fields = effective_fields(&config, &DraftStore::new(&store), &args.fields);
    let counter = SequenceCounter::new(&store, config.invoice.prefix.clone());

    let number = match &args.number {
        Some(n) => n.clone(),
        None => counter.peek_current().into_inner(),
    };
    let invoice = compose_invoice(&config, &fields, number, &args.terms());
    invoice.validate()?;

    let template = build_email(&invoice, &config);

    println!("To:      {}", template.recipients.join(", "));
    println!("Subject: {}", template.subject);
    println!();
    println!("{}", template.body);

    if copy {
        let text = format!("Subject: {}\n\n{}", template.subject, template.body);
        clipboard::copy_to_clipboard(&text)?;
        println!();
        println!("Copied to clipboard.");
    }

    Ok(())
}

/// Run the PDF export endpoint
fn cmd_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(port))
}
