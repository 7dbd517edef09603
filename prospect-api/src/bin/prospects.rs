use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use prospect_api::config::ApiConfig;
use prospect_api::{helpers, SqliteContactStore};
use prospect_core::import::import_schema_template;
use prospect_core::{
    format_phone_number, is_valid_phone_number, ContactFilter, DashboardController,
    DashboardError, FieldFilter, MarkdownEditor, MarkdownField, Notice, ProposalFilter,
    StatusTab,
};
use shared_types::{
    Contact, ContactChange, ContactStatus, GoodFit, NewContact, ReferralType, Temperature,
};

#[derive(Parser, Debug)]
#[command(name = "prospects", about = "Manage the prospect tracker from the terminal")]
struct Cli {
    /// Config file (defaults to <config dir>/prospect-tracker/api.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List contacts in a tab, with optional filters
    List {
        #[arg(long, default_value = "Prospect")]
        tab: StatusTab,
        /// Case-insensitive substring of the name
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        temperature: FieldFilter<Temperature>,
        #[arg(long, default_value = "all")]
        proposal: ProposalFilter,
        #[arg(long, default_value = "all")]
        referral_type: FieldFilter<ReferralType>,
    },

    /// Add a contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Prospect")]
        status: ContactStatus,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        temperature: Option<Temperature>,
        #[arg(long)]
        referral_type: Option<ReferralType>,
        #[arg(long)]
        referral_source: Option<String>,
        #[arg(long)]
        good_fit: Option<GoodFit>,
        #[arg(long)]
        proposal_sent: bool,
        #[arg(long)]
        next_follow_up: Option<String>,
    },

    /// Set one field, e.g. `set <id> temperature Hot`; an empty value clears it
    Set {
        id: String,
        field: String,
        #[arg(default_value = "")]
        value: String,
    },

    /// Move a contact to another status
    Status { id: String, status: ContactStatus },

    /// Write the brief or notes from stdin
    Write {
        id: String,
        #[arg(default_value = "notes")]
        field: MarkdownField,
    },

    /// Permanently delete a contact
    Delete {
        id: String,
        /// Required: deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Import a JSON array of contacts from a file (`-` for stdin)
    Import { file: PathBuf },

    /// Print an example import file
    Schema,

    /// Write every contact to contacts-export-<date>.json
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Print a phone number in display format
    FormatPhone { input: String },
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
    }
}

/// Build a single-field change from command-line text
fn parse_change(field: &str, value: &str) -> Result<ContactChange> {
    let value = if value.is_empty() {
        serde_json::Value::Null
    } else if field == "proposal_sent" {
        serde_json::Value::Bool(matches!(value, "true" | "yes" | "1"))
    } else {
        serde_json::Value::String(value.to_string())
    };

    serde_json::from_value(serde_json::json!({ "field": field, "value": value }))
        .with_context(|| format!("Invalid value for field {}", field))
}

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{notice}");
    } else {
        println!("{notice}");
    }
}

fn print_row(contact: &Contact) {
    println!(
        "{}  {:<24} {:<10} {:<9} {:<15} {}",
        contact.id,
        contact.name,
        contact.status.to_string(),
        contact
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_default(),
        contact.phone.as_deref().unwrap_or(""),
        contact.email.as_deref().unwrap_or(""),
    );
}

async fn run(cli: Cli) -> Result<()> {
    let (config, _) = ApiConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let db_path = config.db_path()?;
    let db = helpers::database::initialize_database(&db_path)
        .with_context(|| format!("Failed to open database at {:?}", db_path))?;

    let store: SqliteContactStore = db.contact_store();
    let mut controller = DashboardController::new(store);

    match cli.command {
        Command::List {
            tab,
            search,
            temperature,
            proposal,
            referral_type,
        } => {
            controller.fetch_all().await?;
            let filter = ContactFilter {
                tab,
                search,
                temperature,
                proposal,
                referral_type,
            };

            for contact in controller.cache().filtered(&filter) {
                print_row(contact);
            }

            let counts = controller.cache().counts();
            println!(
                "\nProspect: {}  Signed On: {}  Archived: {}  All: {}",
                counts.prospect, counts.signed_on, counts.archived, counts.all
            );
        }
        Command::Add {
            name,
            status,
            phone,
            email,
            temperature,
            referral_type,
            referral_source,
            good_fit,
            proposal_sent,
            next_follow_up,
        } => {
            let contact = NewContact {
                status,
                phone,
                email,
                temperature,
                referral_type,
                referral_source,
                good_fit,
                proposal_sent,
                next_follow_up,
                ..NewContact::named(name)
            };
            print_notice(&controller.create(contact).await?);
        }
        Command::Set { id, field, value } => {
            let change = parse_change(&field, &value)?;
            controller.fetch_all().await?;
            print_notice(&controller.update_field(&id, change).await?);
        }
        Command::Status { id, status } => {
            print_notice(&controller.change_status(&id, status).await?);
        }
        Command::Write { id, field } => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;

            controller.fetch_all().await?;
            let contact = controller
                .cache()
                .get(&id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Contact {id} not found"))?;

            let mut editor = MarkdownEditor::open(&contact, field);
            editor.begin_edit();
            editor.input(text.trim_end(), Instant::now());
            if editor.blur(&mut controller).await? {
                println!("{} saved for {}.", field.title(), contact.name);
            } else {
                println!("{} unchanged.", field.title());
            }
        }
        Command::Delete { id, yes } => {
            if !yes {
                anyhow::bail!("Deleting is permanent; pass --yes to confirm.");
            }
            controller.fetch_all().await?;
            print_notice(&controller.delete(&id).await?);
        }
        Command::Import { file } => {
            let text = read_input(&file)?;
            let (_, notice) = controller.import(&text).await?;
            print_notice(&notice);
        }
        Command::Schema => {
            println!("{}", import_schema_template());
        }
        Command::Export { out } => {
            let export = controller.export().await?;
            let path = out.join(&export.file_name);
            std::fs::write(&path, &export.body)
                .with_context(|| format!("Failed to write {:?}", path))?;
            print_notice(&Notice::info(
                "Export Complete",
                format!("Exported {} contacts to {}.", export.count, path.display()),
            ));
        }
        Command::FormatPhone { input } => {
            let formatted = format_phone_number(&input);
            if is_valid_phone_number(&input) {
                println!("{formatted}");
            } else {
                println!("{formatted} (incomplete)");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        let notice = match e.downcast_ref::<DashboardError>() {
            Some(err) => err.notice(),
            None => Notice::error(format!("{e:#}")),
        };
        print_notice(&notice);
        std::process::exit(1);
    }
}
