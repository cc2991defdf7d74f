// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SpiritBytes - mood-aware recipe suggestions from a selfie.

mod app;
mod commands;
mod doctor;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spiritbytes_config::SpiritConfig;

use crate::render::Output;

#[derive(Parser, Debug)]
#[command(name = "spiritbytes", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the emotions in a photo.
    Analyze {
        /// JPEG image of a face.
        image: PathBuf,
    },
    /// Generate recipes for one or more moods, strongest first.
    Recipes {
        #[arg(long = "mood", required = true)]
        moods: Vec<String>,
        /// Number of recipes to ask for (defaults to the configured count).
        #[arg(long)]
        count: Option<u32>,
    },
    /// Show the full recipe for a title.
    Detail {
        title: String,
        #[arg(long)]
        mood: Option<String>,
    },
    /// Manage saved recipes.
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Manage dietary preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Photo to recipe in one go.
    Run {
        image: PathBuf,
        /// Accept the emotion reading without asking.
        #[arg(long)]
        yes: bool,
        /// Open the Nth recipe (1-based).
        #[arg(long)]
        pick: Option<usize>,
        /// Save the opened recipe.
        #[arg(long, requires = "pick")]
        save: bool,
    },
    /// Check configuration and service reachability.
    Doctor,
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    List,
    Show { title: String },
    Remove { title: String },
    Clear,
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    Show,
    /// Replace the stored preferences.
    Set {
        #[arg(long = "diet")]
        diets: Vec<String>,
        #[arg(long, default_value = "")]
        allergens: String,
    },
    /// Pull preferences from the identity provider.
    Pull,
    /// Push the local preferences to the identity provider.
    Push,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => spiritbytes_config::load_and_validate_path(path),
        None => spiritbytes_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            spiritbytes_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);
    let out = Output::new(cli.plain);

    match dispatch(cli.command, config, &out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(
    command: Commands,
    config: SpiritConfig,
    out: &Output,
) -> Result<(), spiritbytes_core::SpiritError> {
    if let Commands::Doctor = command {
        return doctor::run_doctor(&config, out).await;
    }

    let app = app::App::assemble(&config).await?;
    match command {
        Commands::Analyze { image } => commands::analyze(&app, image, out).await,
        Commands::Recipes { moods, count } => {
            let count = count.unwrap_or(config.generation.recipe_count);
            commands::recipes(&app, &moods, count, config.generation.fallback_to_curated, out)
                .await
        }
        Commands::Detail { title, mood } => {
            commands::detail(&app, &title, mood.as_deref(), out).await
        }
        Commands::Saved { action } => match action {
            SavedAction::List => commands::saved_list(&app, out).await,
            SavedAction::Show { title } => commands::saved_show(&app, &title, out).await,
            SavedAction::Remove { title } => commands::saved_remove(&app, &title, out).await,
            SavedAction::Clear => commands::saved_clear(&app, out).await,
        },
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs_show(&app, out).await,
            PrefsAction::Set { diets, allergens } => {
                commands::prefs_set(&app, &diets, &allergens, out).await
            }
            PrefsAction::Pull => commands::prefs_pull(&app, out).await,
            PrefsAction::Push => commands::prefs_push(&app, out).await,
        },
        Commands::Run {
            image,
            yes,
            pick,
            save,
        } => {
            let options = commands::RunOptions { yes, pick, save };
            commands::run(app.into_flow(&config), image, options, out).await
        }
        Commands::Doctor => Ok(()),
    }
}

/// Initialize tracing. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spiritbytes={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recipes_accepts_repeated_moods() {
        let cli = Cli::try_parse_from([
            "spiritbytes", "recipes", "--mood", "Happy", "--mood", "Calm", "--count", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Recipes { moods, count } => {
                assert_eq!(moods, vec!["Happy", "Calm"]);
                assert_eq!(count, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn save_requires_pick() {
        assert!(Cli::try_parse_from(["spiritbytes", "run", "face.jpg", "--save"]).is_err());
        assert!(
            Cli::try_parse_from(["spiritbytes", "run", "face.jpg", "--pick", "1", "--save"])
                .is_ok()
        );
    }

    #[test]
    fn default_config_is_valid() {
        let config = spiritbytes_config::load_and_validate_str("").expect("defaults are valid");
        assert_eq!(config.generation.recipe_count, 3);
    }
}
