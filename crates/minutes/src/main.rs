//! `minutes` - CLI for meeting-minutes
//!
//! This binary lists, creates, edits, deletes and exports meeting minutes
//! kept in the configured storage backend.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;

use meeting_minutes::cli::{
    Cli, Command, ConfigCommand, CreateCommand, EditCommand, ExportCommand, ListCommand,
    OutputFormat, ShowCommand,
};
use meeting_minutes::export::{render_view, TextRasterizer};
use meeting_minutes::meeting::sort_by_date_desc;
use meeting_minutes::{
    dates, init_logging, Backend, Config, Error, Exporter, KeyValueStore, MeetingCollection,
    MeetingDraft, MeetingRecord, MeetingStore,
};

const NOT_FOUND: &str = "Ata não encontrada";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error) {
    if let Some(errors) = err
        .downcast_ref::<Error>()
        .and_then(Error::validation_errors)
    {
        eprintln!("Erro: dados inválidos");
        for field in errors.iter() {
            eprintln!("  {}: {}", field.field, field.message);
        }
    } else {
        eprintln!("Erro: {err:#}");
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.as_deref())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::List(cmd) => handle_list(&open_store(&config)?, &cmd).await,
        Command::Show(cmd) => handle_show(&open_store(&config)?, &cmd).await,
        Command::Create(cmd) => handle_create(open_store(&config)?, &cmd).await,
        Command::Edit(cmd) => handle_edit(open_store(&config)?, &cmd).await,
        Command::Delete(cmd) => {
            let mut collection = MeetingCollection::load(open_store(&config)?).await;
            if collection.find(&cmd.id).is_none() {
                bail!("{NOT_FOUND}: {}", cmd.id);
            }
            collection.remove(&cmd.id).await?;
            println!("Ata excluída: {}", cmd.id);
            Ok(())
        }
        Command::Clear(cmd) => {
            if !cmd.yes {
                println!("Isto excluirá todas as atas.");
                println!("Use --yes para confirmar.");
                return Ok(());
            }
            let mut collection = MeetingCollection::new(open_store(&config)?);
            collection.clear().await?;
            println!("Todas as atas foram excluídas.");
            Ok(())
        }
        Command::Export(cmd) => handle_export(&config, &open_store(&config)?, &cmd).await,
        Command::Status(cmd) => handle_status(&config, &open_store(&config)?, cmd.json).await,
    }
}

fn open_store(config: &Config) -> anyhow::Result<MeetingStore<Backend>> {
    MeetingStore::open(config).context("failed to open storage")
}

async fn find_meeting(store: &MeetingStore<Backend>, id: &str) -> anyhow::Result<MeetingRecord> {
    match store.get_one(id).await? {
        Some(record) => Ok(record),
        None => bail!("{NOT_FOUND}: {id}"),
    }
}

async fn handle_list(store: &MeetingStore<Backend>, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut records = store.get_all().await?;
    sort_by_date_desc(&mut records);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for r in &records {
                println!("{}  {}  {}", r.id, dates::format_date(&r.date), r.title);
            }
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("Nenhuma ata encontrada.");
                return Ok(());
            }
            let id_width = records.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
            println!(
                "{:<id_width$}  {:<10}  {:<6}  {:<12}  {:>5}  {:>6}  TÍTULO",
                "ID", "DATA", "INÍCIO", "DURAÇÃO", "PART.", "AÇÕES"
            );
            for r in &records {
                println!(
                    "{:<id_width$}  {:<10}  {:<6}  {:<12}  {:>5}  {:>6}  {}",
                    r.id,
                    dates::format_date(&r.date),
                    r.start_time,
                    r.duration().to_string(),
                    r.participants.len(),
                    r.action_items.len(),
                    r.title
                );
            }
        }
    }
    Ok(())
}

async fn handle_show(store: &MeetingStore<Backend>, cmd: &ShowCommand) -> anyhow::Result<()> {
    let record = find_meeting(store, &cmd.id).await?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", render_view(&record, Utc::now()).text());
    println!();
    println!("Duração: {}", record.duration());
    println!(
        "Ações: {} pendente(s), {} em andamento, {} concluída(s)",
        record.pending_action_items().count(),
        record.in_progress_action_items().count(),
        record.completed_action_items().count()
    );
    println!("Criada em: {}", dates::format_date_time(&record.created_at));
    println!("Atualizada em: {}", dates::format_date_time(&record.updated_at));
    Ok(())
}

async fn handle_create(store: MeetingStore<Backend>, cmd: &CreateCommand) -> anyhow::Result<()> {
    let draft = match &cmd.file {
        Some(path) => MeetingDraft::load(path)?,
        None => cmd.flag_draft(),
    };
    let record = draft.create(Utc::now())?;

    let mut collection = MeetingCollection::load(store).await;
    collection.save(&record).await?;
    println!("Ata criada: {}", record.id);
    Ok(())
}

async fn handle_edit(store: MeetingStore<Backend>, cmd: &EditCommand) -> anyhow::Result<()> {
    let mut collection = MeetingCollection::load(store).await;
    let Some(existing) = collection.find(&cmd.id).cloned() else {
        bail!("{NOT_FOUND}: {}", cmd.id);
    };

    let draft = MeetingDraft::load(&cmd.file)?;
    let record = draft.apply(&existing, Utc::now())?;
    collection.save(&record).await?;
    println!("Ata atualizada: {}", record.id);
    Ok(())
}

async fn handle_export(
    config: &Config,
    store: &MeetingStore<Backend>,
    cmd: &ExportCommand,
) -> anyhow::Result<()> {
    let record = find_meeting(store, &cmd.id).await?;
    let out_dir = cmd.out.clone().unwrap_or_else(|| config.output_dir());
    ensure_dir(&out_dir)?;

    let mut exporter = Exporter::new(TextRasterizer::from_config(&config.export));
    let element_id = exporter.register(render_view(&record, Utc::now()));
    let path = exporter.export(&record, &element_id, &out_dir)?;
    println!("PDF exportado: {}", path.display());
    Ok(())
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))
}

async fn handle_status(
    config: &Config,
    store: &MeetingStore<Backend>,
    json: bool,
) -> anyhow::Result<()> {
    let readable = store.try_get_all().await;
    let (count, problem) = match &readable {
        Ok(records) => (records.len(), None),
        Err(e) => (0, Some(e.to_string())),
    };

    if json {
        let status = serde_json::json!({
            "backend": store.backend().kind(),
            "location": store.backend().describe(),
            "key": store.key(),
            "read_policy": store.read_policy(),
            "meetings": count,
            "readable": problem.is_none(),
            "error": problem,
            "config_path": Config::default_config_path(),
            "export_dir": config.output_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("minutes status");
        println!("--------------");
        println!("Backend:      {}", store.backend().describe());
        println!("Key:          {}", store.key());
        println!("Read policy:  {}", store.read_policy());
        println!("Meetings:     {count}");
        match problem {
            None => println!("Readable:     yes"),
            Some(message) => println!("Readable:     no ({message})"),
        }
        println!("Export dir:   {}", config.output_dir().display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:        {}", config.storage.backend);
                println!("  Data dir:       {}", config.data_dir().display());
                println!("  Key:            {}", config.storage.key);
                println!("  Read policy:    {}", config.storage.read_policy);
                println!("  Quota (bytes):  {}", config.storage.quota_bytes);
                println!();
                println!("[Export]");
                println!("  Output dir:     {}", config.output_dir().display());
                println!("  Font size:      {}", config.export.font_size);
                println!("  Line height:    {} mm", config.export.line_height_mm);
                println!("  Margin:         {} mm", config.export.margin_mm);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(&path))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
