use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::fs::File;
use std::io;
use std::path::PathBuf;

use trade_journal_core::journal::{Journal, TradeFilter, TradeSort};
use trade_journal_core::trade::{Trade, TradeDraft, TradeEdit};

use super::psychology::PsychFlags;
use super::{read_input, MarketArg, OutcomeArg, SideArg, SortFieldArg, SortOrderArg};
use crate::config::Config;
use crate::output::csv_out::write_trade_export;
use crate::repository::JsonFileRepository;

/// Arguments for journal management
#[derive(Args)]
pub struct JournalArgs {
    /// Journal file (falls back to config `journal_path`)
    #[arg(long, global = true)]
    pub journal: Option<String>,

    #[command(subcommand)]
    pub action: JournalCommand,
}

#[derive(Subcommand)]
pub enum JournalCommand {
    /// Record a new trade, open or already closed
    Add(AddArgs),
    /// Exit an open trade
    Close(CloseArgs),
    /// Edit fields of an existing trade
    Edit(EditArgs),
    /// Remove a trade
    Delete(IdArgs),
    /// Show a single trade
    Show(IdArgs),
    /// List trades with optional filter and sort
    List(ListArgs),
    /// Write all trades as CSV
    Export(ExportArgs),
}

/// Trade fields shared by `add` and `edit`
#[derive(Args)]
pub struct TradeFields {
    #[arg(long)]
    pub symbol: Option<String>,

    #[arg(long)]
    pub market: Option<MarketArg>,

    #[arg(long)]
    pub direction: Option<SideArg>,

    /// Entry timestamp (RFC 3339)
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,

    #[arg(long)]
    pub entry: Option<Decimal>,

    #[arg(long)]
    pub exit: Option<Decimal>,

    /// Exit timestamp (RFC 3339)
    #[arg(long)]
    pub exit_date: Option<DateTime<Utc>>,

    #[arg(long)]
    pub stop: Option<Decimal>,

    #[arg(long)]
    pub target: Option<Decimal>,

    #[arg(long)]
    pub size: Option<Decimal>,

    #[arg(long)]
    pub strategy: Option<String>,

    #[arg(long)]
    pub timeframe: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    #[arg(long)]
    pub pre_emotion: Option<String>,

    #[arg(long)]
    pub post_emotion: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// JSON trade draft file
    #[arg(long, conflicts_with_all = ["TradeFields", "PsychFlags"])]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: TradeFields,

    #[command(flatten)]
    pub psych: PsychFlags,
}

#[derive(Args)]
pub struct CloseArgs {
    pub id: String,

    #[arg(long)]
    pub exit: Decimal,

    /// Exit timestamp (RFC 3339), defaults to now
    #[arg(long)]
    pub exit_date: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,

    /// JSON file with the fields to change
    #[arg(long, conflicts_with = "TradeFields")]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: TradeFields,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive symbol substring
    #[arg(long)]
    pub market: Option<String>,

    #[arg(long)]
    pub outcome: Option<OutcomeArg>,

    #[arg(long)]
    pub strategy: Option<String>,

    /// Matches symbol, notes or strategy
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, default_value = "date")]
    pub sort: SortFieldArg,

    #[arg(long, default_value = "desc")]
    pub order: SortOrderArg,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output path; stdout when omitted
    #[arg(long)]
    pub out: Option<String>,
}

impl TradeFields {
    fn into_draft(self) -> Result<TradeDraft, Box<dyn std::error::Error>> {
        let d = TradeDraft::default();
        Ok(TradeDraft {
            symbol: self.symbol.ok_or("--symbol required")?,
            market: self.market.map(Into::into),
            direction: self.direction.map(Into::into).unwrap_or(d.direction),
            date: self.date,
            entry_price: self.entry.ok_or("--entry required")?,
            exit_price: self.exit,
            exit_date: self.exit_date,
            stop_loss: self.stop.unwrap_or(d.stop_loss),
            take_profit: self.target.unwrap_or(d.take_profit),
            position_size: self.size.unwrap_or(d.position_size),
            strategy: self.strategy.unwrap_or_default(),
            timeframe: self.timeframe.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            pre_emotion: self.pre_emotion.unwrap_or_default(),
            post_emotion: self.post_emotion.unwrap_or_default(),
            ..d
        })
    }

    fn into_edit(self) -> TradeEdit {
        TradeEdit {
            symbol: self.symbol,
            market: self.market.map(Into::into),
            direction: self.direction.map(Into::into),
            date: self.date,
            entry_price: self.entry,
            exit_price: self.exit,
            exit_date: self.exit_date,
            stop_loss: self.stop,
            take_profit: self.target,
            position_size: self.size,
            strategy: self.strategy,
            timeframe: self.timeframe,
            notes: self.notes,
            tags: self.tags,
            pre_emotion: self.pre_emotion,
            post_emotion: self.post_emotion,
            ..Default::default()
        }
    }
}

pub fn run_journal(args: JournalArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let path = args
        .journal
        .map(PathBuf::from)
        .unwrap_or_else(|| config.journal_path.clone());
    let mut journal = Journal::new(JsonFileRepository::open(&path)?);

    match args.action {
        JournalCommand::Add(add) => {
            let draft = if add.fields.symbol.is_some() {
                TradeDraft {
                    psych: add.psych.into_optional(),
                    ..add.fields.into_draft()?
                }
            } else {
                read_input::<TradeDraft>(add.input.as_deref())?
                    .ok_or("--symbol and --entry, or --input <draft.json> / stdin required")?
            };
            let trade = journal.record(draft)?;
            Ok(serde_json::to_value(trade)?)
        }
        JournalCommand::Close(close) => {
            let trade = journal.close(&close.id, close.exit, close.exit_date)?;
            Ok(serde_json::to_value(trade)?)
        }
        JournalCommand::Edit(edit) => {
            let changes = match read_file_only::<TradeEdit>(edit.input.as_deref())? {
                Some(changes) => changes,
                None => edit.fields.into_edit(),
            };
            let trade = journal.edit(&edit.id, changes)?;
            Ok(serde_json::to_value(trade)?)
        }
        JournalCommand::Delete(target) => {
            journal.delete(&target.id)?;
            Ok(json!({ "deleted": target.id }))
        }
        JournalCommand::Show(target) => {
            let trade = journal
                .get(&target.id)?
                .ok_or_else(|| format!("Trade not found: {}", target.id))?;
            trade_report(&trade)
        }
        JournalCommand::List(list) => {
            let filter = TradeFilter {
                market: list.market,
                outcome: list.outcome.map(Into::into),
                strategy: list.strategy,
                search: list.search,
            };
            let sort = TradeSort {
                field: list.sort.into(),
                order: list.order.into(),
            };
            let trades = journal.trades(&filter, sort)?;
            Ok(serde_json::to_value(trades)?)
        }
        JournalCommand::Export(export) => {
            let trades = journal.trades(&TradeFilter::default(), TradeSort::default())?;
            match export.out {
                Some(out) => {
                    let file = File::create(&out)
                        .map_err(|e| format!("Failed to create '{}': {}", out, e))?;
                    write_trade_export(&trades, file)?;
                    Ok(json!({ "exported": trades.len(), "path": out }))
                }
                None => {
                    write_trade_export(&trades, io::stdout().lock())?;
                    Ok(Value::Null)
                }
            }
        }
    }
}

/// The stored trade plus its readiness score and planned reward:risk.
fn trade_report(trade: &Trade) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(trade)?;
    if let Value::Object(fields) = &mut value {
        fields.insert("readiness".into(), serde_json::to_value(trade.readiness())?);
        fields.insert(
            "planned_risk_reward".into(),
            serde_json::to_value(trade.planned_risk_reward())?,
        );
    }
    Ok(value)
}

fn read_file_only<T: serde::de::DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(crate::input::file::read_json(p)?)),
        None => Ok(None),
    }
}
