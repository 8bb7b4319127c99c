use std::{env, process};

use chrono::{Local, NaiveDate};
use colored::Colorize;
use uuid::Uuid;

use finance_core::{
    config::{Config, ConfigManager},
    core::services::{
        DashboardService, InsightsService, RecurrenceRequest, TagService, TransactionService,
    },
    currency::{format_currency, format_signed, parse_amount},
    domain::{
        period::parse_anchor, Displayable, MonetaryRecord, PeriodKind, RecordDraft, RecordKind,
        RecordUpdate, MAX_INSTALLMENTS,
    },
    init,
    storage::{DataStore, JsonStore},
    utils::build_info,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        process::exit(1);
    };

    if command == "version" {
        println!("{}", build_info::current().summary());
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let user = manager.local_user()?;
    let config = manager.load()?;
    let mut store = JsonStore::open(manager.data_file(&config))?;

    match command.as_str() {
        "dashboard" => {
            let period = match rest.first() {
                Some(raw) => raw.parse()?,
                None => config.default_period,
            };
            let anchor = anchor_arg(rest.get(1).map(String::as_str))?;
            let search = rest.get(2..).map(|words| words.join(" ")).unwrap_or_default();
            let view = DashboardService::load(&store, user, period, anchor, &search)?;
            print_dashboard(&config, &view)?;
        }
        "add-income" | "add-expense" => {
            let kind = if command == "add-income" {
                RecordKind::Income
            } else {
                RecordKind::Expense
            };
            add_record(&mut store, user, kind, rest)?;
        }
        "edit" => edit_record(&mut store, user, rest)?,
        "remove" => {
            let kind = kind_arg(rest.first())?;
            let id = uuid_arg(rest.get(1))?;
            let removed = TransactionService::remove(&mut store, user, kind, id)?;
            println!("Removed {} \"{}\"", removed.kind, removed.display_label());
        }
        "tags" => {
            for tag in TagService::list(&store, user)? {
                println!("{}  {}  {}", tag.id, tag.background, tag.name);
            }
        }
        "add-tag" => {
            let (name, color) = match rest {
                [name, color, ..] => (name, color),
                _ => return Err("usage: add-tag <name> <#RRGGBB>".into()),
            };
            let tag = TagService::create(&mut store, user, name, color)?;
            println!("Tag created: {} ({})", tag.id, tag.display_label());
        }
        "delete-tag" => {
            let id = uuid_arg(rest.first())?;
            let tag = TagService::remove(&mut store, user, id)?;
            println!("Tag deleted: {}", tag.name);
        }
        "insights" => {
            let tag_id = uuid_arg(rest.first())?;
            let period = match rest.get(1) {
                Some(raw) => raw.parse()?,
                None => PeriodKind::Month,
            };
            let anchor = anchor_arg(rest.get(2).map(String::as_str))?;
            let insights = InsightsService::for_tag(&store, user, tag_id, period, anchor)?;
            let currency = config.currency_code();
            let locale = config.locale_config();
            println!("Tag {} - {} of {}", insights.tag.name, period, anchor);
            println!(
                "  period:   in {}  out {}",
                format_currency(insights.period.totals.income, &currency, &locale),
                format_currency(insights.period.totals.expense, &currency, &locale)
            );
            println!(
                "  all time: balance {}",
                format_currency(insights.all_time.balance, &currency, &locale)
            );
            print_entries(&config, &insights.period.transactions);
        }
        "toggle-balance" => {
            let visible = manager.toggle_balance_visibility()?;
            println!("Balance {}", if visible { "shown" } else { "hidden" });
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}

fn add_record(
    store: &mut JsonStore,
    user: Uuid,
    kind: RecordKind,
    rest: &[String],
) -> CliResult<()> {
    let mut positional = Vec::new();
    let mut installments: u32 = 1;
    let mut overrides = None;
    let mut tag_id = None;
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--installments" => {
                installments = iter
                    .next()
                    .ok_or("--installments needs a number")?
                    .parse()?;
            }
            "--amounts" => {
                let raw = iter.next().ok_or("--amounts needs a quoted list of amounts")?;
                let amounts = raw
                    .split_whitespace()
                    .map(parse_amount)
                    .collect::<Result<Vec<_>, _>>()?;
                overrides = Some(amounts);
            }
            "--tag" => tag_id = Some(uuid_arg(iter.next())?),
            _ => positional.push(arg.as_str()),
        }
    }
    if installments == 0 || installments > MAX_INSTALLMENTS {
        return Err(format!("--installments must be between 1 and {MAX_INSTALLMENTS}").into());
    }
    if overrides.is_some() && installments == 1 {
        return Err("--amounts needs --installments".into());
    }
    let (description, amount) = match positional.as_slice() {
        [description, amount, ..] => (*description, parse_amount(amount)?),
        _ => return Err("usage: add-income|add-expense <description> <amount> [YYYY-MM-DD]".into()),
    };
    let date = anchor_arg(positional.get(2).copied())?;
    let when = date.and_time(Local::now().time());

    if installments > 1 {
        let mut request = RecurrenceRequest::new(kind, description, when, installments, amount)
            .with_tag(tag_id);
        if let Some(amounts) = overrides {
            request = request.with_overrides(amounts);
        }
        let records = TransactionService::add_recurring(store, user, &request)?;
        println!("Saved {} installments of \"{}\"", records.len(), description);
    } else {
        let draft = RecordDraft::single(kind, description, amount, when).with_tag(tag_id);
        let record = TransactionService::add_single(store, user, draft)?;
        println!("Saved {} {}", record.kind, record.id);
    }
    Ok(())
}

/// Edits one record in place; flags left out keep their current value.
fn edit_record(store: &mut JsonStore, user: Uuid, rest: &[String]) -> CliResult<()> {
    let kind = kind_arg(rest.first())?;
    let id = uuid_arg(rest.get(1))?;
    let current = store.get(kind, id)?;
    let mut update = RecordUpdate::from_record(&current);

    let mut iter = rest.iter().skip(2);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--description" => {
                update.description = iter.next().ok_or("--description needs a value")?.clone();
            }
            "--amount" => {
                update.amount = parse_amount(iter.next().ok_or("--amount needs a value")?)?;
            }
            "--date" => {
                let day = parse_anchor(iter.next().ok_or("--date needs YYYY-MM-DD")?)?;
                update.transaction_date = day.and_time(current.transaction_date.time());
            }
            "--tag" => update.tag_id = Some(uuid_arg(iter.next())?),
            "--no-tag" => update.tag_id = None,
            "--received" => update.received = true,
            "--pending" => update.received = false,
            other => return Err(format!("unknown edit option `{other}`").into()),
        }
    }

    let record = TransactionService::update(store, user, kind, id, &update)?;
    println!("Updated {} \"{}\"", record.kind, record.display_label());
    Ok(())
}

fn print_dashboard(
    config: &Config,
    view: &finance_core::core::services::DashboardView,
) -> CliResult<()> {
    let currency = config.currency_code();
    let locale = config.locale_config();
    let totals = &view.summary.totals;
    println!("{} - {}", view.summary.period, view.summary.anchor);
    println!(
        "  income  {}",
        format_currency(totals.income, &currency, &locale).green()
    );
    println!(
        "  expense {}",
        format_currency(totals.expense, &currency, &locale).red()
    );
    println!(
        "  balance {}",
        format_currency(totals.balance, &currency, &locale)
    );
    if let Some(mtd) = view.month_to_date_balance {
        if config.balance_visible {
            println!("  month to date {}", format_currency(mtd, &currency, &locale));
        } else {
            println!("  month to date ******");
        }
    }
    print_entries(config, &view.visible);
    Ok(())
}

fn print_entries(config: &Config, entries: &[MonetaryRecord]) {
    let currency = config.currency_code();
    let locale = config.locale_config();
    for entry in entries {
        let amount = format_signed(entry.kind, entry.amount, &currency, &locale);
        let amount = match entry.kind {
            RecordKind::Income => amount.green(),
            RecordKind::Expense => amount.red(),
        };
        println!(
            "  {}  {:<32} {}  {}",
            entry.transaction_date.format("%d/%m/%Y"),
            entry.display_label(),
            amount,
            entry.id.to_string().dimmed()
        );
    }
}

fn anchor_arg(raw: Option<&str>) -> CliResult<NaiveDate> {
    match raw {
        Some(value) => Ok(parse_anchor(value)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn kind_arg(raw: Option<&String>) -> CliResult<RecordKind> {
    match raw.map(String::as_str) {
        Some("income") => Ok(RecordKind::Income),
        Some("expense") => Ok(RecordKind::Expense),
        _ => Err("expected `income` or `expense`".into()),
    }
}

fn uuid_arg(raw: Option<&String>) -> CliResult<Uuid> {
    let raw = raw.ok_or("missing id")?;
    Ok(Uuid::parse_str(raw)?)
}

fn print_usage() {
    eprintln!(
        "Usage: finance_core_cli <command>\n\
         Commands:\n  \
         dashboard [day|month|year] [YYYY-MM-DD] [search...]\n  \
         add-income <description> <amount> [YYYY-MM-DD]\n      \
         [--installments N] [--amounts \"a b ...\"] [--tag <id>]\n  \
         add-expense <description> <amount> [YYYY-MM-DD]\n      \
         [--installments N] [--amounts \"a b ...\"] [--tag <id>]\n  \
         edit <income|expense> <id> [--description D] [--amount A] [--date YYYY-MM-DD]\n      \
         [--tag <id>|--no-tag] [--received|--pending]\n  \
         remove <income|expense> <id>\n  \
         tags\n  \
         add-tag <name> <#RRGGBB>\n  \
         delete-tag <id>\n  \
         insights <tag-id> [day|month|year] [YYYY-MM-DD]\n  \
         toggle-balance\n  \
         version"
    );
}
