//! Command-line front end for the trajectory evaluator.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use safetraj::report::{
    render_feature_importance, render_pose_table, render_scores, render_trajectory,
};
use safetraj::{
    Command, CommandBounds, SafeTrajConfig, SafeTrajEvaluator, Severity, TrajectoryPredictor,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "safetraj")]
#[command(version, about = "Trajectory preview with OOD risk scoring", long_about = None)]
struct Cli {
    /// JSON configuration file (missing fields use defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the corpus seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the corpus size
    #[arg(long, global = true)]
    samples: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommandArgs {
    /// Orientation (rad)
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    orientation: f64,

    /// Linear velocity (m/s)
    #[arg(long, default_value_t = 1.2, allow_negative_numbers = true)]
    v_lin: f64,

    /// Rotational velocity (rad/s)
    #[arg(long, default_value_t = 0.3, allow_negative_numbers = true)]
    v_rot: f64,
}

impl CommandArgs {
    fn command(&self) -> Command {
        Command::new(self.orientation, self.v_lin, self.v_rot)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a command and show its risk label and charts
    Evaluate {
        #[command(flatten)]
        input: CommandArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Skip the trajectory and importance charts
        #[arg(long)]
        no_plot: bool,
    },

    /// Print the predicted poses only
    Trajectory {
        #[command(flatten)]
        input: CommandArgs,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<SafeTrajConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => SafeTrajConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(samples) = cli.samples {
        config.n_train_samples = samples;
    }
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<SafeTrajConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn warn_if_out_of_bounds(command: &Command) {
    if !CommandBounds::default().contains(command) {
        warn!(
            input = ?command.to_array(),
            "command lies outside the training range"
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Evaluate {
            input,
            json,
            no_plot,
        } => {
            let command = input.command();
            warn_if_out_of_bounds(&command);

            let evaluator = SafeTrajEvaluator::new(config).context("building evaluator")?;
            let result = evaluator
                .evaluate_command(&command, true)
                .context("evaluating command")?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let headline = format!("Risk label: {}", result.risk_label);
            let headline = match Severity::from_label(result.risk_label.as_str()) {
                Severity::Error => headline.red().bold(),
                Severity::Warning => headline.yellow().bold(),
                Severity::Success => headline.green().bold(),
            };
            println!("{headline}");
            for line in render_scores(&result).lines() {
                println!("  {line}");
            }

            if !*no_plot {
                if let Some(trajectory) = &result.trajectory {
                    println!();
                    println!("{}", "Predicted trajectory (x-y)".cyan().bold());
                    print!("{}", render_trajectory(trajectory, 48, 16));
                }
                println!();
                println!("{}", "Feature importance".cyan().bold());
                print!("{}", render_feature_importance(&result.feature_importance, 30));
            }
        }

        Commands::Trajectory { input } => {
            config.validate()?;
            let command = input.command();
            command.ensure_finite()?;
            let predictor = TrajectoryPredictor::from_config(&config);
            let trajectory = predictor.predict(&command);
            print!("{}", render_pose_table(&trajectory, &predictor.timestamps()));
        }
    }

    Ok(())
}
