use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use incidentlens::attachments::{download_attachment, save_attachment};
use incidentlens::config::{LensConfig, DEFAULT_CONFIG_FILE};
use incidentlens::session::{
    render_notice, render_session, Action, ActionOutcome, SessionContext, SessionState,
};
use incidentlens::ticketing::TicketSource;
use incidentlens::{build_orchestrator, init_logger, LiveOrchestrator};

#[derive(Parser)]
#[command(
    name = "incidentlens",
    version,
    about = "Summarize ServiceNow incidents with redacted notes"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (default)
    Shell,
    /// Summarize an incident's notes and attachments, then exit
    Summarize {
        /// Incident number, e.g. INC0010001
        number: String,
    },
    /// Generate resolution steps for an open incident, then exit
    Steps {
        /// Incident number, e.g. INC0010001
        number: String,
    },
    /// Download one attachment of an incident
    Download {
        /// Incident number, e.g. INC0010001
        number: String,
        /// Attachment id, or file name as listed by the ticketing system
        attachment: String,
        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

/// One line typed into the interactive shell.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Act(Action),
    Show,
    Download { attachment: String, dir: PathBuf },
    Help,
    Quit,
}

const SHELL_HELP: &str = "\
commands:
  summarize <NUMBER>        fetch, redact and summarize an incident
  steps [NUMBER]            resolution steps (defaults to the loaded incident)
  clear                     forget the loaded incident
  show                      print the loaded incident again
  download <ID|FILE> [DIR]  save an attachment of the loaded incident
  help                      this text
  quit                      leave the shell";

fn parse_shell_line(line: &str, state: &SessionState) -> std::result::Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some(command) => command.to_lowercase(),
        None => return Err(String::new()),
    };
    let arg = words.next().map(str::to_string);

    match command.as_str() {
        "summarize" | "s" => Ok(ShellCommand::Act(Action::Summarize(
            arg.unwrap_or_default(),
        ))),
        "steps" | "r" => {
            let number = arg
                .or_else(|| state.incident_number.clone())
                .unwrap_or_default();
            Ok(ShellCommand::Act(Action::ResolutionSteps(number)))
        }
        "clear" | "c" => Ok(ShellCommand::Act(Action::Clear)),
        "show" => Ok(ShellCommand::Show),
        "download" | "d" => match arg {
            Some(attachment) => Ok(ShellCommand::Download {
                attachment,
                dir: PathBuf::from(words.next().unwrap_or(".")),
            }),
            None => Err("usage: download <ID|FILE> [DIR]".to_string()),
        },
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {} (try `help`)", other)),
    }
}

fn print_outcome(outcome: &ActionOutcome) {
    for notice in &outcome.notices {
        eprintln!("{}", render_notice(notice));
    }
    if !outcome.state.is_empty() {
        print!("{}", render_session(&outcome.state));
    }
}

fn save_from_state(
    orchestrator: &LiveOrchestrator,
    state: &SessionState,
    attachment: &str,
    dir: &Path,
) -> Result<PathBuf> {
    if state.is_empty() {
        bail!("no incident loaded; run `summarize <NUMBER>` first");
    }
    let (meta, bytes) = download_attachment(orchestrator.tickets(), &state.attachments, attachment)?;
    let path = save_attachment(dir, &meta.file_name, &bytes)?;
    Ok(path)
}

fn run_shell(orchestrator: &LiveOrchestrator) -> Result<()> {
    println!("IncidentLens. Type `help` for commands.");

    let stdin = io::stdin();
    let mut state = SessionState::default();
    let mut lines = stdin.lock().lines();

    loop {
        print!("incidentlens> ");
        io::stdout().flush().context("flush prompt")?;

        let line = match lines.next() {
            Some(line) => line.context("read command")?,
            None => break,
        };

        match parse_shell_line(&line, &state) {
            Ok(ShellCommand::Act(action)) => {
                let outcome = orchestrator.dispatch(state, action);
                print_outcome(&outcome);
                state = outcome.state;
            }
            Ok(ShellCommand::Show) => print!("{}", render_session(&state)),
            Ok(ShellCommand::Download { attachment, dir }) => {
                match save_from_state(orchestrator, &state, &attachment, &dir) {
                    Ok(path) => println!("saved {}", path.display()),
                    Err(e) => eprintln!("error: {:#}", e),
                }
            }
            Ok(ShellCommand::Help) => println!("{}", SHELL_HELP),
            Ok(ShellCommand::Quit) => break,
            Err(message) if message.is_empty() => {}
            Err(message) => eprintln!("{}", message),
        }
    }

    Ok(())
}

fn run_once(orchestrator: &LiveOrchestrator, action: Action) -> Result<()> {
    let outcome = orchestrator.dispatch(SessionState::default(), action);
    print_outcome(&outcome);
    if outcome.notices.iter().any(|n| n.is_error()) {
        bail!("action finished with errors");
    }
    Ok(())
}

fn run_download(orchestrator: &LiveOrchestrator, number: &str, attachment: &str, out: &Path) -> Result<()> {
    let tickets = orchestrator.tickets();
    let incident = tickets
        .fetch_incident(number)
        .with_context(|| format!("incident {} not found", number))?;
    let attachments = tickets.fetch_attachment_list(&incident.sys_id);
    let (meta, bytes) = download_attachment(tickets, &attachments, attachment)?;
    let path = save_attachment(out, &meta.file_name, &bytes)?;
    println!("saved {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = LensConfig::load(&cli.config)
        .with_context(|| format!("cannot start with config {}", cli.config.display()))?;

    let session = SessionContext::new();
    let ctx = session.log_context();
    log::info!("{} SESSION_STARTED started_at={}", ctx, session.started_at.to_rfc3339());

    let orchestrator = build_orchestrator(&config, &ctx)?;

    let result = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_shell(&orchestrator),
        Command::Summarize { number } => run_once(&orchestrator, Action::Summarize(number)),
        Command::Steps { number } => run_once(&orchestrator, Action::ResolutionSteps(number)),
        Command::Download {
            number,
            attachment,
            out,
        } => run_download(&orchestrator, &number, &attachment, &out),
    };

    log::info!("{} SESSION_ENDED duration_secs={}", ctx, session.age_secs());
    result
}
