use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use skyfetch_core::{
    AppContext, Config, Controller, DisplaySink, FileStore, HtmlSurface, Intent, SearchHistory,
    Units, history::Confirm,
};

use crate::terminal::TerminalSurface;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyfetch", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and unit system.
    Configure,

    /// Show weather for a city and exit.
    Show {
        /// City name.
        city: String,

        /// Print the page markup instead of text.
        #[arg(long)]
        html: bool,
    },

    /// Search repeatedly; `:N` repeats recent search N, `:clear` clears history, `:q` quits.
    Interactive,

    /// List recent searches.
    History {
        /// Clear the list after confirmation.
        #[arg(long)]
        clear: bool,
    },
}

/// Confirmation gate backed by an interactive yes/no prompt.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        inquire::Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city, html } => show(city, html).await,
            Command::Interactive => interactive().await,
            Command::History { clear } => history(clear),
        }
    }
}

fn load_config() -> Result<Config> {
    Ok(Config::load()?.with_env_overrides())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let units = Select::new("Unit system:", Units::all().to_vec())
        .prompt()
        .context("Failed to read unit system")?;
    config.units = units;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_controller<S: DisplaySink>(config: Config, sink: S) -> Result<Controller<S>> {
    let ctx = AppContext::from_config(config)?;
    Ok(Controller::new(ctx, sink, Box::new(PromptConfirm)))
}

async fn show(city: String, html: bool) -> Result<()> {
    let config = load_config()?;
    let units = config.units;

    if html {
        let mut controller = build_controller(config, HtmlSurface::new(units))?;
        controller.handle(Intent::Submit(city)).await;
        println!("{}", controller.sink().region());
    } else {
        let mut controller = build_controller(config, TerminalSurface::stdout(units))?;
        controller.handle(Intent::Submit(city)).await;
    }

    Ok(())
}

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Quit,
    Intent(Intent),
    UnknownChip(String),
}

fn parse_line(line: &str, recent: &[String]) -> Line {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" => Line::Quit,
        ":clear" => Line::Intent(Intent::ClearHistory),
        _ => match trimmed.strip_prefix(':') {
            Some(index) => index
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| recent.get(i))
                .map(|city| Line::Intent(Intent::ChipClicked(city.clone())))
                .unwrap_or_else(|| Line::UnknownChip(trimmed.to_string())),
            None => Line::Intent(Intent::Submit(line.to_string())),
        },
    }
}

async fn interactive() -> Result<()> {
    let config = load_config()?;
    let units = config.units;
    let mut controller = build_controller(config, TerminalSurface::stdout(units))?;

    controller.start().await;

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse_line(&line, controller.history().entries()) {
            Line::Quit => break,
            Line::Intent(intent) => {
                controller.handle(intent).await;
            }
            Line::UnknownChip(chip) => println!("No recent search {chip}."),
        }
    }

    Ok(())
}

fn history(clear: bool) -> Result<()> {
    let config = load_config()?;
    let mut store = FileStore::open(config.store_file_path()?);
    let mut history = SearchHistory::load(&store);

    if clear {
        if history.clear(&mut PromptConfirm, &mut store) {
            println!("Recent searches cleared.");
        }
        return Ok(());
    }

    if history.is_empty() {
        println!("No recent searches.");
    }
    for (i, city) in history.entries().iter().enumerate() {
        println!("{}. {city}", i + 1);
    }
    Ok(())
}
