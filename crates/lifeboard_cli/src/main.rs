//! Command-line front end for the life dashboard.
//!
//! # Responsibility
//! - Parse user input, build one session context per invocation and render
//!   results as plain text.
//! - Keep every business rule inside `lifeboard_core`.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use lifeboard_core::credentials::CredentialChain;
use lifeboard_core::filter::contacts::PickError;
use lifeboard_core::http::create_http_client;
use lifeboard_core::model::journal::parse_entry_date;
use lifeboard_core::sheets::{spreadsheet_id, SheetsClient, TokenSource};
use lifeboard_core::{
    default_log_level, init_logging, AppConfig, BackendKind, Contact, ContactService, CsvBackend,
    DashboardError, EntryStore, GeminiClient, JournalEntry, JournalKind, JournalService,
    PromptBuilder, Refresher, RefresherService, SessionContext, SheetsBackend, SqliteBackend,
    TableBackend, TimeWindow, TruncationPolicy,
};
use log::{info, warn};
use std::fs::File;
use std::path::PathBuf;

type Store = EntryStore<Box<dyn TableBackend>>;

#[derive(Parser)]
#[command(name = "lifeboard")]
#[command(author, version, about = "Contacts, daily journals and AI refreshers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to <config_dir>/lifeboard/lifeboard.toml)
    #[arg(long, global = true, env = "LIFEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Storage backend override
    #[arg(long, global = true)]
    backend: Option<BackendArg>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Csv,
    Sheets,
    Sqlite,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Csv => Self::Csv,
            BackendArg::Sheets => Self::Sheets,
            BackendArg::Sqlite => Self::Sqlite,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Life,
    Work,
}

impl From<KindArg> for JournalKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Life => Self::Life,
            KindArg::Work => Self::Work,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Life and work journals
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },

    /// Combined life/work briefing
    Briefing {
        /// 7d, 30d or all
        #[arg(long, value_parser = parse_window)]
        window: Option<TimeWindow>,
    },

    /// Contact rolodex
    Contacts {
        #[command(subcommand)]
        action: ContactAction,
    },

    /// Check core wiring
    Ping,

    /// Print the core version
    Version,
}

#[derive(Subcommand)]
enum JournalAction {
    /// Save (or overwrite) the entry for one day
    Save {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Entry date (YYYY-MM-DD); defaults to the reference date
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        entry1: String,
        entry2: String,
        entry3: String,
    },

    /// Show entries newest first
    List {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Only entries inside this window
        #[arg(long, value_parser = parse_window)]
        window: Option<TimeWindow>,
    },

    /// Past days without an entry
    Missing {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Number of past days to check
        #[arg(long)]
        days: Option<u32>,
    },

    /// Summarize one journal
    Refresh {
        #[arg(long, value_enum)]
        kind: KindArg,
        /// 7d, 30d or all
        #[arg(long, value_parser = parse_window)]
        window: Option<TimeWindow>,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Replace all contacts with a CSV file
    Import { file: PathBuf },

    /// List contacts in a category
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// Category selector options
    Categories,

    /// Pick one contact to reach out to
    Random {
        #[arg(long)]
        category: Option<String>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_entry_date(value).ok_or_else(|| format!("unrecognized date `{value}`"))
}

fn parse_window(value: &str) -> Result<TimeWindow, String> {
    TimeWindow::parse(value).ok_or_else(|| format!("unknown window `{value}`; use 7d, 30d or all"))
}

fn main() -> Result<()> {
    lifeboard_core::config::load_dotenv();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }

    let level = config
        .log
        .level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, &config.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let session = match cli.today {
        Some(today) => SessionContext::new(today),
        None => SessionContext::for_today(),
    }
    .with_window(config.window);

    match cli.command {
        Commands::Ping => {
            println!("lifeboard_core ping={}", lifeboard_core::ping());
            Ok(())
        }
        Commands::Version => {
            println!("lifeboard_core version={}", lifeboard_core::core_version());
            Ok(())
        }
        Commands::Journal { action } => {
            let store = open_store(&config)?;
            run_journal(&config, &store, session, action)
        }
        Commands::Briefing { window } => {
            let store = open_store(&config)?;
            let session = session.with_window(window.unwrap_or(config.window));
            let summarizer = gemini_client(&config)?;
            let service = RefresherService::new(&store, PromptBuilder::new(config.prompt));
            print_refresher(
                service.briefing(&session, &summarizer),
                &session,
                config.prompt.truncation,
            )
        }
        Commands::Contacts { action } => {
            let store = open_store(&config)?;
            run_contacts(&store, session, action)
        }
    }
}

fn open_store(config: &AppConfig) -> Result<Store> {
    let backend: Box<dyn TableBackend> = match config.backend {
        BackendKind::Csv => Box::new(CsvBackend::new(&config.data_dir)),
        BackendKind::Sqlite => Box::new(
            SqliteBackend::open(config.sqlite_path()).context("failed to open sqlite store")?,
        ),
        BackendKind::Sheets => {
            let Some(url) = config.sheet_url.as_deref() else {
                bail!("sheets backend needs `sheet_url` (or LIFEBOARD_SHEET_URL)");
            };
            let id = spreadsheet_id(url)?;
            let chain = CredentialChain::standard(&config.secrets_file, &config.key_file);
            let key = chain
                .service_account()
                .context("no Google service account configured")?;
            let http = create_http_client(&config.http).context("failed to build http client")?;
            let tokens = TokenSource::new(key, http.clone());
            Box::new(SheetsBackend::new(SheetsClient::new(http, tokens, id)))
        }
    };
    info!(
        "event=store_open module=cli status=ok backend={}",
        backend.backend_id()
    );
    Ok(EntryStore::new(backend))
}

fn gemini_client(config: &AppConfig) -> Result<GeminiClient> {
    let chain = CredentialChain::standard(&config.secrets_file, &config.key_file);
    let api_key = chain
        .gemini_api_key()
        .context("Gemini API key not found; set GEMINI_API_KEY or add it to secrets.toml")?;
    let http = create_http_client(&config.http).context("failed to build http client")?;
    Ok(GeminiClient::new(http, api_key, config.model.clone()))
}

fn run_journal(
    config: &AppConfig,
    store: &Store,
    session: SessionContext,
    action: JournalAction,
) -> Result<()> {
    let journals = JournalService::new(store);
    match action {
        JournalAction::Save {
            kind,
            date,
            entry1,
            entry2,
            entry3,
        } => {
            let kind = JournalKind::from(kind);
            let entry = JournalEntry::new(date.unwrap_or(session.today), entry1, entry2, entry3);
            journals.save_entry(kind, &entry)?;
            println!("Saved {} entry for {}.", kind, entry.date);
        }
        JournalAction::List { kind, window } => {
            let kind = JournalKind::from(kind);
            let entries = match window {
                Some(window) => journals.entries_in_window(kind, &session.with_window(window))?,
                None => journals.recent_entries(kind)?,
            };
            if entries.is_empty() {
                println!("No {kind} entries yet.");
            }
            for entry in entries {
                let [first, second, third] = entry.entries();
                println!("{} | {} | {} | {}", entry.date, first, second, third);
            }
        }
        JournalAction::Missing { kind, days } => {
            let kind = JournalKind::from(kind);
            let mut session = session;
            if let Some(days) = days {
                session.lookback_days = days;
            }
            let missing = journals.missing_days(kind, &session)?;
            if missing.is_empty() {
                println!("No missing {kind} entries in the last {} days.", session.lookback_days);
            } else {
                let labels: Vec<String> = missing.iter().map(|day| day.label()).collect();
                println!("Missing {kind} entries: {}", labels.join(", "));
            }
        }
        JournalAction::Refresh { kind, window } => {
            let session = session.with_window(window.unwrap_or(config.window));
            let summarizer = gemini_client(config)?;
            let builder = PromptBuilder::new(config.prompt);
            let result = journals.refresh(kind.into(), &session, &builder, &summarizer);
            print_refresher(result, &session, config.prompt.truncation)?;
        }
    }
    Ok(())
}

fn print_refresher(
    result: Result<Refresher, DashboardError>,
    session: &SessionContext,
    truncation: TruncationPolicy,
) -> Result<()> {
    match result {
        Ok(refresher) => {
            println!("{}", refresher.text);
            if let Some(note) = truncation_note(&refresher, truncation) {
                println!("\n{note}");
            }
            Ok(())
        }
        Err(DashboardError::NoEntries(window)) => {
            println!("No entries in {} to summarize.", window.label());
            info!(
                "event=refresh module=cli status=skipped today={}",
                session.today
            );
            Ok(())
        }
        Err(err) => Err(err).context("refresher failed"),
    }
}

/// Names which end of the window was dropped by the prompt limits.
fn truncation_note(refresher: &Refresher, truncation: TruncationPolicy) -> Option<String> {
    if refresher.omitted_rows == 0 {
        return None;
    }
    let dropped = match truncation {
        TruncationPolicy::MostRecentFirst => "older",
        TruncationPolicy::OldestFirst => "newer",
    };
    Some(format!(
        "(Summary covers {} entries; {} {dropped} entries were left out.)",
        refresher.included_rows, refresher.omitted_rows
    ))
}

/// One-line contact record: name, category, then non-empty extra columns.
fn contact_line(contact: &Contact) -> String {
    let details: Vec<String> = contact
        .extra
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| format!("{column}: {value}"))
        .collect();
    if details.is_empty() {
        format!("{} [{}]", contact.name, contact.category)
    } else {
        format!("{} [{}] {}", contact.name, contact.category, details.join(", "))
    }
}

fn run_contacts(store: &Store, session: SessionContext, action: ContactAction) -> Result<()> {
    let contacts = ContactService::new(store);
    match action {
        ContactAction::Import { file } => {
            let source = File::open(&file)
                .with_context(|| format!("failed to open `{}`", file.display()))?;
            let book = contacts.import_csv(source)?;
            println!("Imported {} contacts.", book.len());
        }
        ContactAction::List { category } => {
            let session = with_category(session, category);
            let stats = contacts.stats(&session)?;
            for contact in contacts.filtered(&session)? {
                println!("{}", contact_line(&contact));
            }
            println!("Total contacts: {} | In view: {}", stats.total, stats.in_view);
        }
        ContactAction::Categories => {
            for category in contacts.categories()? {
                println!("{category}");
            }
        }
        ContactAction::Random { category } => {
            let session = with_category(session, category);
            let mut rng = rand::rng();
            match contacts.random_contact(&session, &mut rng) {
                Ok(contact) => println!("Reach out to {}", contact_line(&contact)),
                Err(DashboardError::Pick(PickError::EmptySet)) => {
                    warn!("event=contact_pick module=cli status=empty");
                    println!("No contacts in this view to pick from.");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}

fn with_category(session: SessionContext, category: Option<String>) -> SessionContext {
    match category {
        Some(category) => session.with_category(category),
        None => session,
    }
}

#[cfg(test)]
mod tests {
    use super::{contact_line, truncation_note};
    use lifeboard_core::{Contact, Refresher, TruncationPolicy};

    fn refresher(included_rows: usize, omitted_rows: usize) -> Refresher {
        Refresher {
            text: "summary".to_string(),
            included_rows,
            omitted_rows,
        }
    }

    #[test]
    fn truncation_note_names_the_dropped_end() {
        let note = truncation_note(&refresher(2, 3), TruncationPolicy::MostRecentFirst).unwrap();
        assert_eq!(note, "(Summary covers 2 entries; 3 older entries were left out.)");

        let note = truncation_note(&refresher(2, 3), TruncationPolicy::OldestFirst).unwrap();
        assert_eq!(note, "(Summary covers 2 entries; 3 newer entries were left out.)");
    }

    #[test]
    fn no_truncation_note_when_nothing_omitted() {
        assert!(truncation_note(&refresher(4, 0), TruncationPolicy::OldestFirst).is_none());
    }

    #[test]
    fn contact_line_includes_filled_extra_columns() {
        let contact = Contact::new("Ada", "Work")
            .with_field("Phone", "555-0100")
            .with_field("Email", "")
            .with_field("City", "London");
        assert_eq!(
            contact_line(&contact),
            "Ada [Work] Phone: 555-0100, City: London"
        );
        assert_eq!(contact_line(&Contact::new("Bo", "")), "Bo [Uncategorized]");
    }
}
