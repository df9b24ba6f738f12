use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use lookaround::config::Config;
use lookaround::logging::{default_directive, init_tracing};
use lookaround::repo::fixture::FixtureRepository;
use lookaround::ui::camera::CameraProcessor;
use lookaround::ui::main::{MainProcessor, MainSettings};
use lookaround::ui::map_scene::MapSceneProcessor;
use lookaround::ui::mvi::{
    ContainerOptions, DebugLoggingMiddleware, FlowProcessor, SavedStateHandle, StateContainer,
};
use lookaround::ui::recent_searches::RecentSearchesProcessor;
use lookaround::ui::search::SearchProcessor;

#[derive(Parser)]
#[command(name = "lookaround", version, about = "Drive feature containers from scripted intents")]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed a JSON-lines intent script to one feature and print its states.
    Replay {
        #[arg(value_enum)]
        feature: Feature,

        /// One JSON intent per line; `-` reads stdin.
        script: PathBuf,

        /// Fixture with location, places, points and recent searches.
        #[arg(long)]
        places: Option<PathBuf>,

        /// Start with connectivity off.
        #[arg(long)]
        offline: bool,

        /// How long to keep printing states after the last intent.
        #[arg(long, default_value_t = 500)]
        settle_ms: u64,

        /// Do not read or write the saved-state snapshot.
        #[arg(long)]
        no_persist: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Feature {
    MapScene,
    Search,
    RecentSearches,
    Camera,
    Main,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    init_tracing(default_directive(
        config.logging.log_updates,
        config.logging.log_states,
    ));

    match cli.command {
        Command::Config => {
            let path = cli.config.unwrap_or_else(Config::config_path);
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Replay {
            feature,
            script,
            places,
            offline,
            settle_ms,
            no_persist,
        } => {
            let repo = match places {
                Some(path) => FixtureRepository::load(&path)?,
                None => FixtureRepository::default(),
            };
            repo.set_online(!offline);

            let snapshot = (!no_persist).then(|| config.persistence.snapshot_path.clone());
            let saved_state = match &snapshot {
                Some(path) => SavedStateHandle::load_from(path)?,
                None => SavedStateHandle::new(),
            };

            let run = Replay {
                config: &config,
                script: &script,
                settle: Duration::from_millis(settle_ms),
                saved_state: saved_state.clone(),
            };
            run_feature(feature, run, repo).await?;

            if let Some(path) = snapshot {
                saved_state.persist_to(&path)?;
                tracing::debug!(path = %path.display(), "Saved state written");
            }
            Ok(())
        }
    }
}

async fn run_feature(feature: Feature, run: Replay<'_>, repo: FixtureRepository) -> Result<()> {
    let repo = Arc::new(repo);
    let config = run.config;
    match feature {
        Feature::MapScene => {
            let processor = MapSceneProcessor::new(repo)
                .with_loading_timeout(config.timing.scene_loading_timeout());
            run.drive(processor).await
        }
        Feature::Search => {
            let processor = SearchProcessor::new(repo)
                .with_min_alphanumeric_chars(config.search.min_alphanumeric_chars);
            run.drive(processor).await
        }
        Feature::RecentSearches => {
            let processor = RecentSearchesProcessor::new(repo)
                .with_page_size(config.search.recent_searches_page_size);
            run.drive(processor).await
        }
        Feature::Camera => {
            let processor =
                CameraProcessor::new(repo).with_interval(config.timing.location_update_interval());
            run.drive(processor).await
        }
        Feature::Main => {
            let processor = MainProcessor::new(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo,
            )
            .with_settings(MainSettings::from(config));
            run.drive(processor).await
        }
    }
}

struct Replay<'a> {
    config: &'a Config,
    script: &'a Path,
    settle: Duration,
    saved_state: SavedStateHandle,
}

impl Replay<'_> {
    async fn drive<P>(self, processor: P) -> Result<()>
    where
        P: FlowProcessor,
        P::Intent: DeserializeOwned,
        P::State: Serialize + DeserializeOwned,
    {
        let mut options = ContainerOptions::<P>::default();
        options.log_updates = self.config.logging.log_updates;
        options.log_states = self.config.logging.log_states;
        options
            .intent_middlewares
            .push(Arc::new(DebugLoggingMiddleware::new("INTENT")));

        let initial = self.saved_state.initial_state::<P::State>();
        let container = StateContainer::launch_with(processor, initial, self.saved_state, options);

        let mut states = container.states();
        let printer = tokio::spawn(async move {
            while let Some(state) = states.next().await {
                match serde_json::to_string(&state) {
                    Ok(line) => println!("{line}"),
                    Err(err) => tracing::warn!(error = %err, "Failed to encode state"),
                }
            }
        });

        let mut signals = container.signals();
        let signal_logger = tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                log_signal(&signal);
            }
        });

        for intent in read_script::<P::Intent>(self.script).await? {
            container.intent(intent)?;
        }

        tokio::select! {
            result = container.closed() => result?,
            _ = tokio::time::sleep(self.settle) => {}
        }

        container.shutdown();
        printer.abort();
        signal_logger.abort();
        Ok(())
    }
}

fn log_signal<S: Debug>(signal: &S) {
    tracing::info!(?signal, "SIGNAL");
}

async fn read_script<I: DeserializeOwned>(path: &Path) -> Result<Vec<I>> {
    let mut lines = if path == Path::new("-") {
        BufReader::new(Box::new(tokio::io::stdin()) as Box<dyn tokio::io::AsyncRead + Unpin + Send>)
            .lines()
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open script {}", path.display()))?;
        BufReader::new(Box::new(file) as Box<dyn tokio::io::AsyncRead + Unpin + Send>).lines()
    };

    let mut intents = Vec::new();
    let mut number = 0;
    while let Some(line) = lines.next_line().await? {
        number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let intent = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid intent", path.display(), number))?;
        intents.push(intent);
    }
    Ok(intents)
}
