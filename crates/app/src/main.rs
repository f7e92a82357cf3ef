use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tokio::sync::mpsc::UnboundedReceiver;

use huduga_core::Clock;
use services::audio::{AudioEffectPlayer, ChannelSink, RenderedSound, SynthPlayer, Synthesizer};
use services::{GameConfig, GameServices};
use storage::Storage;
use ui::{App, UiApp, build_app_context};

/// Effects are short; a lower rate keeps the buffers sent to the webview small.
const EFFECT_SAMPLE_RATE: u32 = 22_050;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: GameServices,
    sound_output: Mutex<Option<UnboundedReceiver<RenderedSound>>>,
}

impl UiApp for DesktopApp {
    fn services(&self) -> GameServices {
        self.services.clone()
    }

    fn take_sound_output(&self) -> Option<UnboundedReceiver<RenderedSound>> {
        self.sound_output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

struct Args {
    db_url: String,
    seed: Option<u64>,
    mute: bool,
    log_level: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [--db <sqlite_url>] [--seed <n>] [--mute] [--log-level <filter>]");
    eprintln!("  cargo run -p app -- profile [--db <sqlite_url>]   # print the saved profile");
    eprintln!("  cargo run -p app -- reset   [--db <sqlite_url>]   # forget scores, coins and unlocks");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://huduga.sqlite3");
    eprintln!("  --log-level info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  HUDUGA_DB_URL, HUDUGA_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Profile,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "profile" => Some(Self::Profile),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("HUDUGA_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://huduga.sqlite3".into(), normalize_sqlite_url);
        let mut seed = std::env::var("HUDUGA_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());
        let mut mute = false;
        let mut log_level = "info".to_string();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--mute" => mute = true,
                "--log-level" => log_level = require_value(args, "--log-level")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            seed,
            mute,
            log_level,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the game.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(&parsed.log_level);

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    match cmd {
        Command::Ui => {
            let (sink, sound_output) = ChannelSink::channel();
            let audio: Arc<dyn AudioEffectPlayer> = Arc::new(SynthPlayer::new(
                Synthesizer::new(EFFECT_SAMPLE_RATE),
                sink,
            ));
            let config = GameConfig {
                clock: Clock::default_clock(),
                seed: parsed.seed,
                audio,
                mute: parsed.mute,
                ..GameConfig::default()
            };
            let services = GameServices::with_storage(&storage, config).await?;

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                sound_output: Mutex::new(Some(sound_output)),
            });
            let context = build_app_context(&app);

            // Some window managers default new windows to always-on-top; the game should not be.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("ಸಿನಿಮಾ ಹುಡುಗ")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Profile => {
            let profile = storage.profile().load_profile().await?;
            let unlocked: Vec<String> = profile
                .unlocked_levels
                .iter()
                .map(|level| level.number().to_string())
                .collect();
            println!("best score:      {}", profile.best_score);
            println!("coins:           {}", profile.coin_balance);
            println!("unlocked levels: {}", unlocked.join(", "));
            println!("sound:           {}", if profile.sound_enabled { "on" } else { "off" });
            match profile.daily_challenge_last_played {
                Some(date) => println!("daily played:    {date}"),
                None => println!("daily played:    never"),
            }
            Ok(())
        }
        Command::Reset => {
            storage.profile().reset().await?;
            tracing::info!(db = %parsed.db_url, "profile reset");
            println!("profile reset ({})", parsed.db_url);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
