use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use srl_crypto::LocalWallet;
use srl_sdk::{BannerState, Record, RecordId, SdkResult, Srl, SrlConfig, Status, Timestamp};
use srl_store::{FileLedgerStore, TimeoutStore};
use srl_sync::StatusFacet;
use srl_types::ChainId;

use crate::cli::*;
use crate::prompt::{Approval, ConfirmingStore, PromptWallet};

type Client = Srl<ConfirmingStore<TimeoutStore<FileLedgerStore>>, PromptWallet>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Init(args) => cmd_init(&cli, args).await,
        Command::Create(args) => cmd_create(&open(&cli).await?, cli.format, args).await,
        Command::List(args) => cmd_list(&open(&cli).await?, cli.format, args).await,
        Command::Show(args) => cmd_show(&open(&cli).await?, cli.format, args).await,
        Command::Cast(args) => cmd_transition(&open(&cli).await?, cli.format, args, Status::Cast).await,
        Command::Fail(args) => cmd_transition(&open(&cli).await?, cli.format, args, Status::Failed).await,
        Command::Reveal(args) => cmd_reveal(&open(&cli).await?, cli.format, args).await,
        Command::Stats(_) => cmd_stats(&open(&cli).await?, cli.format).await,
        Command::Challenge(_) => cmd_challenge(&open(&cli).await?, cli.format),
    }
}

fn approval(cli: &Cli) -> Approval {
    if cli.yes {
        Approval::Always(true)
    } else {
        Approval::Interactive
    }
}

async fn open(cli: &Cli) -> anyhow::Result<Client> {
    let config = SrlConfig::load_or_default(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    let secret = tokio::fs::read_to_string(&cli.key)
        .await
        .with_context(|| format!("no wallet key at {}; run `srl init` first", cli.key.display()))?;
    let wallet = LocalWallet::from_secret_hex(secret.trim(), ChainId(cli.chain_id))
        .with_context(|| format!("invalid wallet key in {}", cli.key.display()))?;
    let store = FileLedgerStore::open(&cli.store)
        .await
        .with_context(|| format!("opening ledger {}", cli.store.display()))?;

    // Only the ledger call is timed; the write prompt sits above it.
    let approval = approval(cli);
    let timed = TimeoutStore::new(store, config.operation_timeout());
    let store = ConfirmingStore::new(timed, approval);
    let client =
        Srl::connect_unbounded(store, PromptWallet::new(wallet, approval), config).await?;
    Ok(client)
}

/// `Ok(None)` when the user cancelled; the cancellation is reported here.
fn settle<T>(result: SdkResult<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_user_rejected() => {
            eprintln!("{} {}", "!".yellow().bold(), e.user_message().as_str().yellow());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_banner(client: &Client) {
    if let BannerState::Success { message, .. } = client.banner() {
        println!("{} {}", "✓".green().bold(), message);
    }
}

fn parse_id(raw: &str) -> anyhow::Result<RecordId> {
    Ok(RecordId::parse(raw.trim())?)
}

fn format_time(ts: Timestamp) -> String {
    i64::try_from(ts.as_secs())
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.as_secs().to_string())
}

fn paint_status(status: Status) -> colored::ColoredString {
    match status {
        Status::Prepared => status.as_str().yellow(),
        Status::Cast => status.as_str().green(),
        Status::Failed => status.as_str().red(),
    }
}

fn print_record_line(record: &Record) {
    println!(
        "{}  {:<8}  {:<16}  {}  {}",
        record.id.as_str().yellow(),
        paint_status(record.status),
        record.category.as_str().bold(),
        record.author.short().as_str().cyan(),
        format_time(record.created_at).as_str().dimmed(),
    );
}

async fn cmd_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    if let Some(parent) = cli.key.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let chain_id = ChainId(cli.chain_id);
    let wallet = if !args.force && tokio::fs::try_exists(&cli.key).await? {
        let secret = tokio::fs::read_to_string(&cli.key).await?;
        LocalWallet::from_secret_hex(secret.trim(), chain_id)
            .with_context(|| format!("invalid wallet key in {}", cli.key.display()))?
    } else {
        let wallet = LocalWallet::generate(chain_id);
        tokio::fs::write(&cli.key, format!("{}\n", wallet.secret_hex())).await?;
        wallet
    };

    let store = FileLedgerStore::open(&cli.store).await?;
    if !tokio::fs::try_exists(&cli.config).await? {
        if let Some(parent) = cli.config.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&cli.config, SrlConfig::default().to_toml_string()?).await?;
    }

    let ledger_address = srl_store::LedgerStore::address(&store).await?;
    match cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "account": wallet.account(),
            "ledger": ledger_address,
            "store": cli.store,
            "config": cli.config,
        })),
        OutputFormat::Text => {
            println!("{} Initialized SRL client", "✓".green().bold());
            println!("  Account: {}", wallet.account().as_str().cyan());
            println!("  Ledger:  {} ({})", ledger_address.as_str().yellow(), cli.store.display());
            println!("  Config:  {}", cli.config.display());
            Ok(())
        }
    }
}

async fn cmd_create(client: &Client, format: OutputFormat, args: &CreateArgs) -> anyhow::Result<()> {
    let Some(record) = settle(client.create_record(&args.category, args.cost).await)? else {
        return Ok(());
    };
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            print_banner(client);
            println!("  Id:      {}", record.id.as_str().yellow());
            println!("  Encoded: {}", record.encoded_value.as_str().dimmed());
            Ok(())
        }
    }
}

async fn cmd_list(client: &Client, format: OutputFormat, args: &ListArgs) -> anyhow::Result<()> {
    let facet: StatusFacet = args.status.parse()?;
    let report = client.load_all().await?;
    let mut records = srl_sync::filter(&report.records, &args.search, facet);
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "storeAvailable": report.store_available,
            "records": records,
            "skipped": report.skipped,
        })),
        OutputFormat::Text => {
            if !report.store_available {
                println!("{} ledger is not available", "!".yellow().bold());
                return Ok(());
            }
            if records.is_empty() {
                println!("No records.");
            }
            for record in &records {
                print_record_line(record);
            }
            if !report.skipped.is_empty() {
                println!(
                    "{}",
                    format!("({} unreadable entries skipped)", report.skipped.len())
                        .as_str()
                        .dimmed()
                );
            }
            Ok(())
        }
    }
}

async fn cmd_show(client: &Client, format: OutputFormat, args: &RecordArgs) -> anyhow::Result<()> {
    let record = client.get(&parse_id(&args.id)?).await?;
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            println!("Record {}", record.id.as_str().yellow().bold());
            println!("  Status:   {}", paint_status(record.status));
            println!("  Category: {}", record.category.as_str().bold());
            println!("  Author:   {}", record.author.as_str().cyan());
            println!("  Created:  {}", format_time(record.created_at));
            println!("  Encoded:  {}", record.encoded_value.as_str().dimmed());
            Ok(())
        }
    }
}

async fn cmd_transition(
    client: &Client,
    format: OutputFormat,
    args: &RecordArgs,
    target: Status,
) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let result = match target {
        Status::Failed => client.fail(&id).await,
        _ => client.cast(&id).await,
    };
    let Some(record) = settle(result)? else {
        return Ok(());
    };
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            print_banner(client);
            print_record_line(&record);
            Ok(())
        }
    }
}

async fn cmd_reveal(client: &Client, format: OutputFormat, args: &RecordArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let Some(revealed) = settle(client.reveal(&id).await)? else {
        return Ok(());
    };
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": revealed.id,
            "value": revealed.value,
            "signer": revealed.signature.signer,
            "signature": revealed.signature.to_hex(),
        })),
        OutputFormat::Text => {
            print_banner(client);
            println!("  {} = {}", revealed.id.as_str().yellow(), revealed.value.to_string().as_str().bold());
            Ok(())
        }
    }
}

async fn cmd_stats(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let stats = client.stats().await?;
    match format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            println!("Total records: {}", stats.total.to_string().as_str().bold());
            for status in Status::ALL {
                println!(
                    "  {:<8} {:>5}  {:>5.1}%",
                    paint_status(status),
                    stats.count(status),
                    stats.percent(status)
                );
            }
            Ok(())
        }
    }
}

fn cmd_challenge(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let session = client.session();
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "challenge": session.challenge(),
            "expiresAt": session.expires_at(),
        })),
        OutputFormat::Text => {
            println!("{}", session.challenge());
            Ok(())
        }
    }
}
