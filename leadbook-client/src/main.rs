//! leadbook: command-line front end for the lead and note access layers.

use clap::{Parser, Subcommand};
use leadbook_client::notifications::drain;
use leadbook_client::telemetry::init_tracing;
use leadbook_client::{
    ClientConfig, DetailState, LeadAccess, LeadDetail, NoteAccess, Notification,
    NotificationLevel, Notifier, Session,
};
use leadbook_core::{csv_template, Lead, LeadDraft, LeadField, LeadFilters, LeadId, LeadPatch, PipelineKind, Remark};
use leadbook_storage::{RecordStore, RestRecordStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Parser)]
#[command(name = "leadbook")]
#[command(author, version, about = "Track sales leads and their notes")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML configuration (falls back to LEADBOOK_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List leads, newest first
    List {
        /// Only leads with this status
        #[arg(short, long)]
        status: Option<Remark>,

        /// Free-text search across names, phones, email, source and type
        #[arg(long)]
        search: Option<String>,

        /// Field criterion as column=value (repeatable)
        #[arg(short, long = "where", value_parser = parse_assignment)]
        criteria: Vec<(LeadField, String)>,
    },

    /// Show one lead with its notes
    Show { id: LeadId },

    /// Add a lead
    Add {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(short, long, default_value = "Leads")]
        status: Remark,

        #[arg(long)]
        called_by: Option<String>,

        /// Extra field as column=value (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        fields: Vec<(LeadField, String)>,
    },

    /// Update fields of a lead; an empty value clears the field
    Edit {
        id: LeadId,

        /// Field as column=value (repeatable)
        #[arg(long = "set", required = true, value_parser = parse_assignment)]
        fields: Vec<(LeadField, String)>,
    },

    /// Move a lead to another status
    SetStatus { id: LeadId, status: Remark },

    /// Delete one or more leads
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<LeadId>,
    },

    /// Import leads from a CSV file
    Import {
        file: PathBuf,

        /// Status view to import into; selects the column profile
        #[arg(short, long)]
        status: Option<Remark>,
    },

    /// Print the CSV import template for a pipeline
    Template {
        #[arg(short, long, default_value = "contact")]
        pipeline: PipelineKind,
    },

    /// List the notes of a lead
    Notes { id: LeadId },

    /// Add a note to a lead as the current user
    NoteAdd { id: LeadId, content: String },

    /// Remember who is using this machine
    Login { name: String },

    /// Forget the current user
    Logout,

    /// Print the current user
    Whoami,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Template { pipeline } = &cli.command {
        print!("{}", csv_template(*pipeline)?);
        return Ok(());
    }

    let config = ClientConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging)?;
    let session = Session::open(&config.session_path, config.known_users.clone())?;

    match cli.command {
        Commands::Login { name } => {
            let user = session.login(&name)?;
            println!("Logged in as {}", user);
            return Ok(());
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out");
            return Ok(());
        }
        Commands::Whoami => {
            match session.get() {
                Some(user) => println!("{}", user),
                None => println!("Not logged in"),
            }
            return Ok(());
        }
        _ => {}
    }

    let store: Arc<dyn RecordStore> = Arc::new(RestRecordStore::new(&config.endpoint())?);
    let (notifier, mut notifications) = Notifier::channel();
    let result = dispatch(cli.command, store, notifier, &session).await;
    print_notifications(&mut notifications);
    result
}

async fn dispatch(
    command: Commands,
    store: Arc<dyn RecordStore>,
    notifier: Notifier,
    session: &Session,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List {
            status,
            search,
            criteria,
        } => {
            let mut leads = LeadAccess::new(store, notifier, status);
            leads.list().await?;
            let mut filters = LeadFilters::new();
            filters.search_term = search;
            for (field, value) in criteria {
                if !filters.set(field, value) {
                    return Err(format!("{} cannot be used as a filter", field).into());
                }
            }
            for lead in leads.filter(&filters) {
                print_lead_line(lead);
            }
        }
        Commands::Show { id } => {
            let mut detail = LeadDetail::new(store.clone(), notifier.clone(), id);
            match detail.load().await? {
                DetailState::Found(lead) => print_lead_detail(lead),
                _ => {
                    println!("Lead {} not found", id);
                    return Ok(());
                }
            }
            let mut notes = NoteAccess::new(store, notifier, id);
            for note in notes.list().await? {
                println!(
                    "  [{}] {}: {}",
                    note.created_at.format("%Y-%m-%d %H:%M"),
                    note.user_name.as_deref().unwrap_or("unknown"),
                    note.content
                );
            }
        }
        Commands::Add {
            first_name,
            last_name,
            status,
            called_by,
            fields,
        } => {
            let mut draft = LeadDraft::new(first_name, status);
            if let Some(last_name) = last_name {
                draft = draft.with_last_name(last_name);
            }
            if let Some(called_by) = called_by {
                draft = draft.with_called_by(called_by);
            }
            for (field, value) in &fields {
                draft.set_field(*field, value)?;
            }
            let mut leads = LeadAccess::new(store, notifier, None);
            let lead = leads.create(draft).await?;
            println!("{}", lead.id);
        }
        Commands::Edit { id, fields } => {
            let mut patch = LeadPatch::new();
            for (field, value) in &fields {
                patch = patch.set(*field, value)?;
            }
            let mut leads = LeadAccess::new(store, notifier, None);
            let lead = leads.update(id, patch).await?;
            print_lead_line(&lead);
        }
        Commands::SetStatus { id, status } => {
            let mut leads = LeadAccess::new(store, notifier, None);
            let lead = leads.set_status(id, status).await?;
            print_lead_line(&lead);
        }
        Commands::Delete { ids } => {
            let mut leads = LeadAccess::new(store, notifier, None);
            if let [id] = ids.as_slice() {
                leads.delete(*id).await?;
            } else {
                let report = leads.batch_delete(&ids).await?;
                println!("Deleted {} leads", report.deleted.len());
            }
        }
        Commands::Import { file, status } => {
            let reader = std::fs::File::open(&file)?;
            let mut leads = LeadAccess::new(store, notifier, status);
            let count = leads.import_csv(reader).await?;
            println!("Imported {} leads", count);
        }
        Commands::Notes { id } => {
            let mut notes = NoteAccess::new(store, notifier, id);
            for note in notes.list().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    note.id,
                    note.created_at.to_rfc3339(),
                    note.user_name.as_deref().unwrap_or(""),
                    note.content
                );
            }
        }
        Commands::NoteAdd { id, content } => {
            let user = session
                .get()
                .ok_or("No current user; run `leadbook login <name>` first")?;
            let mut notes = NoteAccess::new(store, notifier, id);
            let note = notes.create(&content, &user).await?;
            println!("{}", note.id);
        }
        Commands::Template { .. } | Commands::Login { .. } | Commands::Logout | Commands::Whoami => {}
    }
    Ok(())
}

fn parse_assignment(input: &str) -> Result<(LeadField, String), String> {
    let (field, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected column=value, got '{}'", input))?;
    let field = field.trim().parse::<LeadField>()?;
    Ok((field, value.to_string()))
}

fn print_lead_line(lead: &Lead) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        lead.id,
        lead.full_name(),
        lead.remarks,
        lead.called_by.as_deref().unwrap_or(""),
        lead.source.as_deref().unwrap_or("")
    );
}

fn print_lead_detail(lead: &Lead) {
    println!("{} ({})", lead.full_name(), lead.id);
    for field in LeadField::ALL {
        if let Some(value) = lead.field_text(field) {
            println!("  {:<17} {}", field.column(), value);
        }
    }
    println!("  {:<17} {}", "created_at", lead.created_at.to_rfc3339());
    println!("  {:<17} {}", "updated_at", lead.updated_at.to_rfc3339());
}

fn print_notifications(receiver: &mut UnboundedReceiver<Notification>) {
    for notification in drain(receiver) {
        let level = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Warning => "warn",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{}] {}", level, notification.message);
    }
}
