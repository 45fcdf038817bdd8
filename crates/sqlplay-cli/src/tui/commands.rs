use std::collections::BTreeSet;
use std::path::PathBuf;

use sqlplay_generate::{PersonColumn, Scenario};
use sqlplay_session::{RecordId, SessionError};

use crate::CliError;
use crate::grid::render_grid;
use crate::tui::state::{App, PaletteEntry};
use crate::workspace::write_download;

/// Route one line from the input bar. Slash commands are dispatched, anything
/// else is executed as SQL.
pub fn submit_input(app: &mut App, input: &str) -> Result<(), CliError> {
    if input.starts_with('/') {
        execute_command(app, input)
    } else {
        run_sql(app, input)
    }
}

pub fn execute_command(app: &mut App, input: &str) -> Result<(), CliError> {
    let parts = split_args(input);
    let Some((command, rest)) = parts.split_first() else {
        return Ok(());
    };
    let command = command.as_str();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match command {
        "/help" => cmd_help(app),
        "/exit" => {
            app.should_quit = true;
            Ok(())
        }
        "/status" => cmd_status(app),
        "/seed" => cmd_seed(app, args),
        "/rows" => cmd_rows(app, args),
        "/scenario" => cmd_scenario(app, args),
        "/companies" => cmd_companies(app, args),
        "/columns" => cmd_columns(app, args),
        "/upload" => cmd_upload(app, args),
        "/generate" => {
            let params = app.params.clone();
            app.regenerate(params)
        }
        "/tables" => cmd_tables(app),
        "/show" => cmd_show(app, args),
        "/schema" => cmd_schema(app, args),
        "/history" => cmd_history(app),
        "/delete" => cmd_delete(app, args),
        "/export" => cmd_export(app, args),
        "/save" => cmd_save(app, args),
        "/clear" => {
            app.messages.clear();
            app.scroll_offset = 0;
            Ok(())
        }
        _ => {
            app.push_message(format!("unknown command: {command}"));
            Ok(())
        }
    }
}

/// Split a command line on whitespace. Double quotes group a single argument,
/// so paths with spaces can be passed as `"my data/file.csv"`.
fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            ch if ch.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            ch => {
                current.push(ch);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

fn run_sql(app: &mut App, sql: &str) -> Result<(), CliError> {
    let preview = app.settings.preview_rows;
    let record = app.session.run_query(sql)?;
    let header = format!("#{} . {} row(s)", record.id(), record.result().row_count());
    let lines = render_grid(record.result(), preview);
    app.push_message(header);
    app.push_lines(lines);
    Ok(())
}

pub fn cmd_help(app: &mut App) -> Result<(), CliError> {
    app.push_message("COMMANDS");
    app.push_message("query:");
    app.push_message("  <sql>                    run a statement against the active tables");
    app.push_message("  /history");
    app.push_message("  /delete <id>");
    app.push_message("  /save <id> [dir]");
    app.push_message("");
    app.push_message("data:");
    app.push_message("  /generate");
    app.push_message("  /seed <n>");
    app.push_message("  /rows <n>");
    app.push_message("  /scenario consumption|people");
    app.push_message("  /companies <n>");
    app.push_message("  /columns name,surname,email,birth_date,address,company");
    app.push_message("  /upload <path> [name]    quote paths with spaces");
    app.push_message("  /tables");
    app.push_message("  /show <table>");
    app.push_message("  /schema <table>");
    app.push_message("  /export <table> [dir]");
    app.push_message("");
    app.push_message("/status");
    app.push_message("/clear");
    app.push_message("/help");
    app.push_message("/exit");
    Ok(())
}

fn cmd_status(app: &mut App) -> Result<(), CliError> {
    let limits = app.session.limits().clone();
    let tables: Vec<String> = app
        .session
        .dataset()
        .map(|dataset| dataset.table_names().map(str::to_string).collect())
        .unwrap_or_default();
    let columns: Vec<&str> = app.params.columns.iter().map(|c| c.as_str()).collect();

    app.push_message("");
    app.push_message("PLAYGROUND STATUS");
    app.push_message("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    app.push_message(format!("Source:    {}", app.source_display()));
    app.push_message(format!("Scenario:  {}", app.params.scenario));
    app.push_message(format!(
        "Seed:      {}  (allowed {}..={})",
        app.params.seed, limits.min_seed, limits.max_seed
    ));
    app.push_message(format!(
        "Rows:      {}  (allowed {}..={})",
        app.params.row_count,
        limits.min_rows,
        limits.max_rows(app.params.scenario)
    ));
    app.push_message(format!(
        "Companies: {}",
        app.params
            .companies
            .map(|n| n.to_string())
            .unwrap_or_else(|| "auto".to_string())
    ));
    app.push_message(format!("Columns:   {}", columns.join(", ")));
    app.push_message("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    app.push_message(format!(
        "Tables: {}  |  History: {}",
        if tables.is_empty() {
            "none".to_string()
        } else {
            tables.join(", ")
        },
        app.session.history().len()
    ));
    app.push_message("");
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[&str], usage: &str) -> Result<T, CliError> {
    args.first()
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| CliError::InvalidConfig(format!("usage: {usage}")))
}

fn cmd_seed(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let seed: u64 = parse_arg(&args, "/seed <n>")?;
    let mut params = app.params.clone();
    params.seed = seed;
    app.regenerate(params)
}

fn cmd_rows(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let rows: usize = parse_arg(&args, "/rows <n>")?;
    let mut params = app.params.clone();
    params.row_count = rows;
    app.regenerate(params)
}

fn cmd_scenario(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(value) = args.first() else {
        app.push_message(format!("scenario: {}", app.params.scenario));
        return Ok(());
    };
    let scenario: Scenario = value.parse().map_err(CliError::InvalidConfig)?;
    let mut params = app.params.clone();
    params.scenario = scenario;
    if scenario == Scenario::Consumption {
        params.table_name = None;
    }
    app.regenerate(params)
}

fn cmd_companies(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let companies = match args.first() {
        Some(&"auto") => None,
        _ => Some(parse_arg::<usize>(&args, "/companies <n>|auto")?),
    };
    let mut params = app.params.clone();
    params.companies = companies;
    app.regenerate(params)
}

fn cmd_columns(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    if args.is_empty() {
        app.push_message("usage: /columns name,surname,email,birth_date,address,company | all");
        return Ok(());
    }
    let joined = args.join(",");
    let columns: BTreeSet<PersonColumn> = if joined.trim() == "all" {
        PersonColumn::ALL.into_iter().collect()
    } else {
        joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<PersonColumn>().map_err(CliError::InvalidConfig))
            .collect::<Result<_, _>>()?
    };
    let mut params = app.params.clone();
    params.columns = columns;
    app.regenerate(params)
}

fn cmd_upload(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(path) = args.first() else {
        app.push_message("usage: /upload <path> [name]");
        return Ok(());
    };
    let name = args.get(1).map(|name| name.to_string());
    app.upload(PathBuf::from(path), name)
}

fn cmd_tables(app: &mut App) -> Result<(), CliError> {
    let lines: Vec<String> = match app.session.dataset() {
        Some(dataset) => dataset
            .tables()
            .iter()
            .map(|table| {
                format!(
                    "  {:<20} {:>6} rows  {} columns",
                    table.name(),
                    table.row_count(),
                    table.columns().len()
                )
            })
            .collect(),
        None => vec!["no active dataset. use /generate or /upload.".to_string()],
    };
    app.push_lines(lines);
    Ok(())
}

fn cmd_show(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(name) = args.first() else {
        app.push_message("usage: /show <table>");
        return Ok(());
    };
    let table = app
        .session
        .dataset()
        .ok_or(SessionError::NoActiveDataset)?
        .get(name)
        .ok_or_else(|| SessionError::UnknownTable(name.to_string()))?;
    let lines = render_grid(table, app.settings.preview_rows);
    app.push_lines(lines);
    Ok(())
}

fn cmd_schema(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(name) = args.first() else {
        app.push_message("usage: /schema <table>");
        return Ok(());
    };
    let columns = app.session.describe(name)?;
    app.push_message(format!("{name}:"));
    for column in columns {
        app.push_message(format!("  {:<24} {}", column.name, column.data_type));
    }
    Ok(())
}

fn cmd_history(app: &mut App) -> Result<(), CliError> {
    let lines: Vec<String> = app
        .session
        .history()
        .list()
        .iter()
        .map(|record| {
            format!(
                "  #{:<4} {}  {:>6} rows  {}",
                record.id(),
                record.executed_at().with_timezone(&chrono::Local).format("%H:%M:%S"),
                record.result().row_count(),
                record.query().split_whitespace().collect::<Vec<_>>().join(" ")
            )
        })
        .collect();
    if lines.is_empty() {
        app.push_message("history is empty.");
    }
    app.push_lines(lines);
    Ok(())
}

fn parse_record_id(args: &[&str], usage: &str) -> Result<RecordId, CliError> {
    let id: u64 = parse_arg(
        &args
            .iter()
            .map(|arg| arg.trim_start_matches('#'))
            .collect::<Vec<_>>(),
        usage,
    )?;
    Ok(RecordId::from(id))
}

fn cmd_delete(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let id = parse_record_id(&args, "/delete <id>")?;
    let record = app.session.delete_record(id)?;
    app.push_message(format!("deleted #{}: {}", record.id(), record.query()));
    Ok(())
}

fn cmd_export(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(name) = args.first() else {
        app.push_message("usage: /export <table> [dir]");
        return Ok(());
    };
    let download = app.session.export_table(name)?;
    let dir = target_dir(app, &args);
    let path = write_download(&dir, &download)?;
    app.push_message(format!("wrote {}", path.display()));
    Ok(())
}

fn cmd_save(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let id = parse_record_id(&args, "/save <id> [dir]")?;
    let download = app.session.export_record(id)?;
    let dir = target_dir(app, &args);
    let path = write_download(&dir, &download)?;
    app.push_message(format!("wrote {}", path.display()));
    Ok(())
}

fn target_dir(app: &App, args: &[&str]) -> PathBuf {
    args.get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| app.settings.export_dir.clone())
}

pub fn command_palette_matches(input: &str) -> Vec<PaletteEntry> {
    if !input.starts_with('/') {
        return Vec::new();
    }
    let typed = input.trim_end();
    // Once arguments are being typed the palette gets out of the way.
    if typed.contains(char::is_whitespace) {
        return Vec::new();
    }
    command_palette_entries()
        .into_iter()
        .filter(|entry| entry.command.starts_with(typed))
        .collect()
}

pub fn command_palette_entries() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry {
            command: "/generate",
            description: "regenerate with current settings",
        },
        PaletteEntry {
            command: "/seed",
            description: "set seed and regenerate",
        },
        PaletteEntry {
            command: "/rows",
            description: "set row count and regenerate",
        },
        PaletteEntry {
            command: "/scenario",
            description: "consumption or people",
        },
        PaletteEntry {
            command: "/companies",
            description: "number of companies (consumption)",
        },
        PaletteEntry {
            command: "/columns",
            description: "people columns",
        },
        PaletteEntry {
            command: "/upload",
            description: "load a CSV file",
        },
        PaletteEntry {
            command: "/tables",
            description: "list active tables",
        },
        PaletteEntry {
            command: "/show",
            description: "preview a table",
        },
        PaletteEntry {
            command: "/schema",
            description: "list table columns",
        },
        PaletteEntry {
            command: "/history",
            description: "list executed queries",
        },
        PaletteEntry {
            command: "/delete",
            description: "delete a history record",
        },
        PaletteEntry {
            command: "/export",
            description: "write a table as CSV",
        },
        PaletteEntry {
            command: "/save",
            description: "write a query result as CSV",
        },
        PaletteEntry {
            command: "/status",
            description: "show current configuration",
        },
        PaletteEntry {
            command: "/clear",
            description: "clear messages",
        },
        PaletteEntry {
            command: "/help",
            description: "show command list",
        },
        PaletteEntry {
            command: "/exit",
            description: "quit",
        },
    ]
}
