use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::browse::{FieldKey, NavigationPolicy, Page, ViewMode};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::roster::DEFAULT_ROSTER_URL;
use crate::runner::{Options, Runner};

fn print_banner() {
    const BANNER: &str = r#"
    _       __                  _
   (_)___  / /__________ _   __(_)__ _      _____  _____
  / / __ \/ __/ ___/ __ \ | / / / _ \ | /| / / _ \/ ___/
 / / / / / /_/ /  / /_/ / |/ / /  __/ |/ |/ /  __/ /
/_/_/ /_/\__/_/   \____/|___/_/\___/|__/|__/\___/_/
    "#;
    eprintln!("{}", BANNER);
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    url: String,
    timeout: u64,
    media_origin: Option<String>,
    policy: NavigationPolicy,
    search: Option<String>,
    hidden: Vec<FieldKey>,
    show_all: bool,
    interactive: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let url = args
        .url
        .or(cfg.url)
        .unwrap_or_else(|| DEFAULT_ROSTER_URL.to_string())
        .trim()
        .to_string();
    if reqwest::Url::parse(&url).is_err() {
        return Err(format!("invalid URL: {url}"));
    }

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let policy_raw = args
        .policy
        .or(cfg.policy)
        .unwrap_or_else(|| "wrap".to_string());
    let policy = NavigationPolicy::parse(&policy_raw)
        .ok_or_else(|| format!("invalid policy '{policy_raw}', expected wrap or clamp"))?;

    let hidden_raw = if args.hide.is_empty() {
        cfg.hide.unwrap_or_default()
    } else {
        args.hide
    };
    let hidden = validation::parse_hidden_fields(&hidden_raw)?;

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}', expected text or json"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        url,
        timeout,
        media_origin: args.media_origin.or(cfg.media_origin),
        policy,
        search: args.search.or(cfg.search),
        hidden,
        show_all: args.all || cfg.show_all.unwrap_or(false),
        interactive: args.interactive || cfg.interactive.unwrap_or(false),
        output,
        output_format,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("introviewer={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Search(String),
    Toggle(String),
    ToggleMode,
    ListFields,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(term) = line.strip_prefix('/') {
        return Some(Command::Search(term.to_string()));
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let cmd = match head.to_lowercase().as_str() {
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Previous,
        "s" | "search" => Command::Search(rest.to_string()),
        "t" | "toggle" if !rest.is_empty() => Command::Toggle(rest.to_string()),
        "m" | "mode" => Command::ToggleMode,
        "l" | "fields" => Command::ListFields,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(cmd)
}

const COMMAND_HELP: &str = "commands: n next, p previous, s TERM or /TERM search (blank clears), t FIELD toggle, m one/all, l fields, q quit";

/// Applies one command to the page. Returns a note for the user, if any.
fn apply_command(page: &mut Page, cmd: &Command) -> Option<String> {
    match cmd {
        Command::Next => {
            page.next();
            None
        }
        Command::Previous => {
            page.previous();
            None
        }
        Command::Search(term) => {
            page.set_search_term(term.clone());
            None
        }
        Command::Toggle(name) => match page.toggle_field_named(name) {
            Ok(Some(visible)) => Some(format!(
                "{} {}",
                name.trim(),
                if visible { "shown" } else { "hidden" }
            )),
            Ok(None) => None,
            Err(e) => Some(e.to_string()),
        },
        Command::ToggleMode => page.model_mut().map(|m| match m.toggle_view_mode() {
            ViewMode::Single => "showing one student".to_string(),
            ViewMode::All => "showing all matching students".to_string(),
        }),
        Command::ListFields => {
            let visible = page.model().visible_fields();
            Some(
                FieldKey::ALL
                    .iter()
                    .map(|f| {
                        let mark = if visible.is_visible(*f) { "x" } else { " " };
                        format!("[{mark}] {:<12} {}", f.as_key(), f.label())
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
        Command::Help => Some(COMMAND_HELP.to_string()),
        Command::Quit => None,
        Command::Unknown(raw) => Some(format!("unknown command '{raw}' ({COMMAND_HELP})")),
    }
}

fn render_view(runner: &Runner, page: &Page, color: bool) -> String {
    let mut out = output::render_status(page, color);
    out.push('\n');
    if !page.is_ready() {
        return out;
    }
    let model = page.model();
    let visible = model.visible_fields();
    match model.view_mode() {
        ViewMode::Single => {
            if let Some(student) = model.current_normalized(runner.media_origin()) {
                out.push('\n');
                out.push_str(&output::render_card(&student, visible, color));
            }
        }
        ViewMode::All => {
            for student in runner.normalize_matches(page) {
                out.push('\n');
                out.push_str(&output::render_card(&student, visible, color));
            }
        }
    }
    out
}

fn new_spinner(url: &str) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message(format!("Loading students from {url}"));
    Ok(pb)
}

async fn write_export(
    runner: &Runner,
    page: &Page,
    path: &str,
    format: Option<OutputFormat>,
) -> Result<usize, String> {
    let format = format
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text);
    let students = runner.normalize_matches(page);
    let rendered = output::render(format, &students);

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))?;
    Ok(students.len())
}

async fn browse_interactive(runner: &Runner, page: &mut Page, color: bool) -> Result<(), String> {
    eprintln!("{}", COMMAND_HELP);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        eprint!("> ");
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read command: {e}")),
        };
        let Some(cmd) = parse_command(&line) else {
            continue;
        };
        if cmd == Command::Quit {
            break;
        }
        tracing::debug!(?cmd, "browse command");
        if let Some(note) = apply_command(page, &cmd) {
            eprintln!("{note}");
        }
        if !matches!(cmd, Command::ListFields | Command::Help | Command::Unknown(_)) {
            print!("{}", render_view(runner, page, color));
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let color = !run.no_color;
    print_banner();

    let runner = Runner::new(Options {
        url: run.url.clone(),
        timeout_seconds: run.timeout,
        policy: run.policy,
        view_mode: if run.show_all {
            ViewMode::All
        } else {
            ViewMode::Single
        },
        search: run.search.clone(),
        hidden_fields: run.hidden.clone(),
        media_origin: run.media_origin.clone(),
    })
    .map_err(|e| e.to_string())?;

    format_kv_line("Roster", runner.options().url.as_str());
    format_kv_line(
        "Browse",
        &format!(
            "policy={} all={} interactive={} search={}",
            run.policy.label(),
            format_bool(run.show_all),
            format_bool(run.interactive),
            run.search.as_deref().unwrap_or("-"),
        ),
    );
    if !run.hidden.is_empty() {
        format_kv_line(
            "Hidden",
            &run.hidden
                .iter()
                .map(|f| f.as_key())
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    eprintln!();

    let pb = new_spinner(&run.url)?;
    let loaded = runner.load().await;
    pb.finish_and_clear();
    let loaded = loaded.map_err(|e| e.to_string())?;
    let mut page = loaded.page;
    tracing::info!(
        elapsed_ms = loaded.elapsed.as_millis() as u64,
        ready = page.is_ready(),
        "page resolved"
    );

    if let Some(message) = page.error_message() {
        return Err(if color {
            message.red().to_string()
        } else {
            message.to_string()
        });
    }

    print!("{}", render_view(&runner, &page, color));

    if let Some(path) = run.output.as_deref() {
        let written = write_export(&runner, &page, path, run.output_format).await?;
        format_kv_line("Output", &format!("{written} students -> {path}"));
    }

    if run.interactive {
        browse_interactive(&runner, &mut page, color).await?;
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "could not determine home directory".to_string())?,
        };
        config::ensure_default_config_file(&path)?;
        format_kv_line("Config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use crate::roster::RawStudentRecord;
    use serde_json::json;

    #[test]
    fn cli_overrides_config_which_overrides_defaults() {
        let args = CliArgs::parse_from(["introviewer", "--policy", "clamp"]);
        let cfg = ConfigFile {
            policy: Some("wrap".to_string()),
            timeout: Some(4),
            hide: Some(vec!["image".to_string()]),
            ..ConfigFile::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.policy, NavigationPolicy::Clamp);
        assert_eq!(run.timeout, 4);
        assert_eq!(run.hidden, vec![FieldKey::Image]);
        assert_eq!(run.url, DEFAULT_ROSTER_URL);
        assert!(!run.show_all);
    }

    #[test]
    fn invalid_config_policy_is_reported() {
        let args = CliArgs::parse_from(["introviewer"]);
        let cfg = ConfigFile {
            policy: Some("bounce".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(args, cfg).unwrap_err().contains("bounce"));
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("n"), Some(Command::Next));
        assert_eq!(parse_command("/ana lee"), Some(Command::Search("ana lee".into())));
        assert_eq!(parse_command("s"), Some(Command::Search(String::new())));
        assert_eq!(parse_command("t quote"), Some(Command::Toggle("quote".into())));
        assert_eq!(parse_command("t"), Some(Command::Unknown("t".into())));
        assert_eq!(parse_command("Q"), Some(Command::Quit));
    }

    #[test]
    fn commands_drive_the_page() {
        let mut page = Page::new(NavigationPolicy::Wrap);
        page.resolve(Ok(vec![
            RawStudentRecord::from(json!({"name": {"first": "Ana", "last": "Lee"}})),
            RawStudentRecord::from(json!({"name": {"preferred": "Bo"}})),
        ]));
        apply_command(&mut page, &Command::Previous);
        assert_eq!(page.model().cursor(), 1);
        apply_command(&mut page, &Command::Search("lee".into()));
        assert_eq!(page.model().match_count(), 1);
        let note = apply_command(&mut page, &Command::Toggle("links".into()));
        assert_eq!(note.as_deref(), Some("links hidden"));
        let note = apply_command(&mut page, &Command::Toggle("email".into()));
        assert_eq!(note.as_deref(), Some("unknown field 'email'"));
    }
}
