use crate::app;
use bevy::app::AppExit;
use bevy::window::WindowResolution;
use clap::ArgAction;
use solar_system::scene::{Catalog, CatalogError};
use solar_system::state::SceneState;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(clap::Parser)]
#[clap(version, about = "Animated, interactive model of the solar system")]
#[clap(args_conflicts_with_subcommands = true)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Option<CliCommand>,
    #[clap(flatten)]
    run: RunArgs,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), CliError> {
        self.command.unwrap_or(CliCommand::Run(self.run)).run()
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Open the viewer (default)
    Run(RunArgs),
    /// Print the resolved catalog as YAML
    Catalog {
        /// Read the catalog from this file instead of the built-in one
        #[clap(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Window size, as <width>x<height>
    #[clap(short, long)]
    resolution: Option<Resolution>,
    /// Show the world inspector
    #[clap(long, action = ArgAction::SetTrue)]
    inspector: bool,
    /// Read the catalog from this file instead of the built-in one
    #[clap(long)]
    catalog: Option<PathBuf>,
    /// Start with the animation paused
    #[clap(long, action = ArgAction::SetTrue)]
    paused: bool,
    /// Start with the orbit paths hidden
    #[clap(long, action = ArgAction::SetTrue)]
    hide_orbits: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Resolution {
    width: f32,
    height: f32,
}

impl FromStr for Resolution {
    type Err = ResolutionInvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ResolutionInvalidFormat)?;
        let width = w.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        let height = h.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        if !(width > 0.0 && height > 0.0) {
            return Err(ResolutionInvalidFormat);
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid format for resolution; expected <width>x<height>")]
struct ResolutionInvalidFormat;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Viewer exited with code {0}")]
    Exit(u8),
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => Catalog::from_path(path),
        None => Catalog::builtin(),
    }
}

impl CliCommand {
    fn run(self) -> Result<(), CliError> {
        match self {
            Self::Catalog { catalog } => {
                let catalog = load_catalog(catalog.as_deref())?;
                print!("{}", catalog.to_yaml()?);
                Ok(())
            }
            Self::Run(args) => {
                let catalog = load_catalog(args.catalog.as_deref())?;
                let exit = app::get_app(app::AppSettings {
                    resolution: args
                        .resolution
                        .map(|r| WindowResolution::new(r.width, r.height))
                        .unwrap_or_default(),
                    with_inspector: args.inspector,
                    catalog,
                    scene_state: SceneState {
                        running: !args.paused,
                        orbits_visible: !args.hide_orbits,
                    },
                })
                .run();
                match exit {
                    AppExit::Success => Ok(()),
                    AppExit::Error(code) => Err(CliError::Exit(code.get())),
                }
            }
        }
    }
}
