//! soilx CLI: soil mechanics calculators from the command line.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use soilx::{Config, SigmaScale, View};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "soilx")]
#[command(version, about = "Soil mechanics calculators")]
struct Cli {
    /// JSON file overriding the default inputs.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug").
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stresses on a plane and the Mohr–Coulomb factor of safety.
    Mohr {
        /// Major principal stress.
        #[arg(long, allow_negative_numbers = true)]
        sigma1: Option<f64>,
        /// Minor principal stress.
        #[arg(long, allow_negative_numbers = true)]
        sigma2: Option<f64>,
        /// Plane orientation in degrees.
        #[arg(long, allow_negative_numbers = true)]
        theta: Option<f64>,
        /// Cohesion.
        #[arg(long, allow_negative_numbers = true)]
        cohesion: Option<f64>,
        /// Friction angle in degrees.
        #[arg(long, allow_negative_numbers = true)]
        friction_angle: Option<f64>,
        /// Write the diagram to this SVG file.
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Phase relations of a soil sample and compaction chart data.
    Compaction {
        /// Volume of water.
        #[arg(long)]
        water: Option<f64>,
        /// Volume of air.
        #[arg(long)]
        air: Option<f64>,
        /// Volume of solids.
        #[arg(long)]
        solids: Option<f64>,
    },

    /// Critical state and normal compression lines.
    CriticalState {
        /// Slope of the critical state line in stress space.
        #[arg(long, allow_negative_numbers = true)]
        m: Option<f64>,
        /// Void ratio of the critical state line at unit stress.
        #[arg(long, allow_negative_numbers = true)]
        gamma: Option<f64>,
        /// Slope of both lines against ln σ.
        #[arg(long, allow_negative_numbers = true)]
        lambda: Option<f64>,
        /// Void ratio of the normal compression line at unit stress.
        #[arg(long, allow_negative_numbers = true)]
        n: Option<f64>,
        /// σ spacing.
        #[arg(long, value_enum)]
        scale: Option<ScaleArg>,
        /// Projection to plot.
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
    },

    /// Void ratio, porosity and solid fraction rulers.
    Ruler {
        /// Number of intervals per ruler.
        #[arg(long)]
        divisions: Option<usize>,
    },
}

impl Commands {
    /// Overwrite configured inputs with the flags given on the command line.
    fn apply_to(&self, config: &mut Config) {
        match *self {
            Commands::Mohr {
                sigma1,
                sigma2,
                theta,
                cohesion,
                friction_angle,
                ..
            } => {
                let mohr = &mut config.mohr;
                mohr.sigma1 = sigma1.unwrap_or(mohr.sigma1);
                mohr.sigma2 = sigma2.unwrap_or(mohr.sigma2);
                mohr.theta = theta.unwrap_or(mohr.theta);
                mohr.cohesion = cohesion.unwrap_or(mohr.cohesion);
                mohr.friction_angle = friction_angle.unwrap_or(mohr.friction_angle);
            }
            Commands::Compaction { water, air, solids } => {
                let compaction = &mut config.compaction;
                compaction.water = water.unwrap_or(compaction.water);
                compaction.air = air.unwrap_or(compaction.air);
                compaction.solids = solids.unwrap_or(compaction.solids);
            }
            Commands::CriticalState {
                m,
                gamma,
                lambda,
                n,
                scale,
                view,
            } => {
                let critical_state = &mut config.critical_state;
                let params = &mut critical_state.params;
                params.m = m.unwrap_or(params.m);
                params.gamma = gamma.unwrap_or(params.gamma);
                params.lambda = lambda.unwrap_or(params.lambda);
                params.n = n.unwrap_or(params.n);
                if let Some(scale) = scale {
                    critical_state.scale = scale.into();
                }
                if let Some(view) = view {
                    critical_state.view = view.into();
                }
            }
            Commands::Ruler { divisions } => {
                if let Some(divisions) = divisions {
                    config.ruler.divisions = divisions;
                }
            }
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Linear,
    Log,
}

impl From<ScaleArg> for SigmaScale {
    fn from(value: ScaleArg) -> Self {
        match value {
            ScaleArg::Linear => SigmaScale::Linear,
            ScaleArg::Log => SigmaScale::Log,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    TauSigma,
    ESigma,
    #[value(name = "3d")]
    ThreeD,
}

impl From<ViewArg> for View {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::TauSigma => View::TauSigma,
            ViewArg::ESigma => View::ESigma,
            ViewArg::ThreeD => View::ThreeD,
        }
    }
}

/// Install the log subscriber; `RUST_LOG` wins over the fallback filter.
fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_owned());
    init_logging(&level);

    cli.command.apply_to(&mut config);
    let output = match &cli.command {
        Commands::Mohr { svg, .. } => commands::mohr(&config, svg.as_deref(), cli.json)?,
        Commands::Compaction { .. } => commands::compaction(&config, cli.json)?,
        Commands::CriticalState { .. } => commands::critical_state(&config, cli.json)?,
        Commands::Ruler { .. } => commands::ruler(&config, cli.json)?,
    };

    print!("{output}");

    Ok(())
}
