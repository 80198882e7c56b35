use anyhow::{Context, bail};
use clap::Parser;
use maskfield::app::{self, App, Outcome};
use maskfield::terminal::Terminal;
use maskfield::{Config, MaskedInput};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "maskfield", version, about = "Masked single-line input for the terminal")]
struct Cli {
    /// Named mask from the built-in set or the config file.
    #[arg(short, long, conflicts_with = "mask")]
    preset: Option<String>,
    /// Mask pattern: 9 digit, a letter, * any character, plus configured tokens.
    #[arg(long, requires = "placeholder")]
    mask: Option<String>,
    /// Placeholder shown for unfilled positions, same length as the mask.
    #[arg(long, requires = "mask")]
    placeholder: Option<String>,
    /// Literal characters for this mask, overriding the configured set.
    #[arg(long)]
    special: Option<String>,
    /// Initial value, assigned as an external value.
    #[arg(long)]
    value: Option<String>,
    #[arg(short, long)]
    label: Option<String>,
    /// YAML file with special characters, tokens and presets.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    list_presets: bool,
    /// Print the effective configuration as YAML and exit.
    #[arg(long)]
    print_config: bool,
    /// Print the submitted value as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_presets {
        for (name, preset) in &config.presets {
            println!("{name:<10} {:<20} {}", preset.mask, preset.placeholder);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let special: Option<Vec<char>> = cli.special.as_deref().map(|chars| chars.chars().collect());
    let (mask, label) = match (&cli.mask, &cli.placeholder) {
        (Some(mask), Some(placeholder)) => (
            config.build_mask(mask, placeholder, special.as_deref())?,
            mask.clone(),
        ),
        (None, None) => {
            let name = cli.preset.as_deref().unwrap_or("date");
            let preset = config.preset(name)?;
            let special = special.as_deref().or(preset.special_characters.as_deref());
            let mask = config.build_mask(&preset.mask, &preset.placeholder, special)?;
            (mask, name.to_string())
        }
        _ => bail!("--mask and --placeholder must be given together"),
    };

    let mut input = MaskedInput::new("input", mask);
    if let Some(value) = &cli.value {
        input.set_value(value);
    }
    let label = cli.label.unwrap_or_else(|| format!("{label}:"));
    let mut app = App::new(label, input);

    let mut terminal = Terminal::new().context("failed to open terminal")?;
    terminal.enter_raw_mode().context("failed to enter raw mode")?;
    let result = app::run(&mut terminal, &mut app);
    terminal.exit_raw_mode().context("failed to restore terminal")?;

    match result.context("terminal I/O failed")? {
        Outcome::Submitted(value) => {
            if cli.json {
                let input = app.input();
                let out = serde_json::json!({
                    "value": value,
                    "raw": input.raw_value(),
                    "complete": input.is_complete(),
                });
                println!("{out}");
            } else {
                println!("{value}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Cancelled => Ok(ExitCode::FAILURE),
    }
}
