use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use logparser::{LogParser, StateProjector};
use model::EventModel;
use replay::{export_dir, ConfigFile, JsonDirWriter, ReplayConfig, ReplayCursor, ReplayError};

#[derive(Parser, Debug)]
#[command(name = "werewolf-replay", about = "Parse and replay werewolf game transcripts")]
struct Params {
    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// YAML phrase table overriding the built-in phrasings
    #[arg(long, global = true)]
    phrases: Option<PathBuf>,
    #[arg(long, global = true)]
    max_input_bytes: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print or write the parsed game as JSON
    Parse {
        #[arg(value_name = "LOG")]
        transcript: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Show a player's state right after an event
    State {
        #[arg(value_name = "LOG")]
        transcript: PathBuf,
        #[arg(short, long)]
        player: String,
        #[arg(short, long)]
        event: usize,
    },
    /// Walk through the events with the roster at each step
    Step {
        #[arg(value_name = "LOG")]
        transcript: PathBuf,
        #[arg(long, default_value_t = 0)]
        from: usize,
        #[arg(long)]
        count: Option<usize>,
    },
    /// Convert every finished game in a directory to JSON
    Export {
        log_dir: PathBuf,
        out_dir: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn load(parser: &LogParser, path: &Path) -> Result<EventModel, ReplayError> {
    let bytes = std::fs::read(path).map_err(|err| ReplayError::io(path, err))?;
    Ok(parser.parse_bytes(&bytes)?)
}

fn run(args: Params) -> Result<(), ReplayError> {
    let yaml = args.config.as_deref().map(ConfigFile::load).transpose()?;
    let config = ReplayConfig::from_cli_or_env_or_yaml(args.phrases, args.max_input_bytes, yaml);
    log::debug!("config: {config:?}");
    let parser = config.parser()?;

    match args.command {
        Command::Parse {
            transcript,
            out,
            pretty,
        } => {
            let model = load(&parser, &transcript)?;
            let json = if pretty {
                serde_json::to_string_pretty(&model)?
            } else {
                serde_json::to_string(&model)?
            };
            match out {
                Some(out) => std::fs::write(&out, json).map_err(|err| ReplayError::io(&out, err))?,
                None => println!("{json}"),
            }
        }
        Command::State {
            transcript,
            player,
            event,
        } => {
            let model = load(&parser, &transcript)?;
            if model.player_by_name(&player).is_none() {
                log::warn!("{player} does not appear in {}", transcript.display());
            }
            let snapshot = StateProjector::new(&model).state_at(&player, event);
            println!("{player} after event {event}: {} ({})", snapshot.status, snapshot.role);
        }
        Command::Step {
            transcript,
            from,
            count,
        } => {
            let model = load(&parser, &transcript)?;
            let mut cursor = ReplayCursor::new(&model);
            let Some(mut event) = cursor.jump(from) else {
                println!("No events");
                return Ok(());
            };
            let mut remaining = count.unwrap_or(usize::MAX);
            while remaining > 0 {
                println!("{event}");
                println!("    alive: {}", cursor.alive().join(", "));
                println!("    dead:  {}", cursor.dead().join(", "));
                remaining -= 1;
                match cursor.next() {
                    Some(next) => event = next,
                    None => break,
                }
            }
        }
        Command::Export {
            log_dir,
            out_dir,
            pretty,
        } => {
            let mut writer = JsonDirWriter::new(&out_dir)?.pretty(pretty);
            let index = export_dir(&parser, &log_dir, &mut writer)?;
            println!("Exported {} games to {}", index.len(), out_dir.display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");
    if let Err(err) = run(args) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
