// Entry point: loads config and data, then renders one paper figure.
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use costfig::cli::{Args, FigureKind};
use costfig::config::AppConfig;
use costfig::core::error::DomainError;
use costfig::core::surface::constraint_surface;
use costfig::data::{GasData, MetricsData, load_scaling};
use costfig::render::{Figure, render};

fn load_figure(args: &Args, config: &AppConfig) -> Result<Figure, Box<dyn Error>> {
    let input = match (&args.input, args.figure.needs_input()) {
        (Some(path), _) => Some(PathBuf::from(path)),
        (None, false) => None,
        (None, true) => {
            return Err(format!("figure {:?} needs --input <json>", args.figure).into());
        }
    };
    let input = input.as_deref().unwrap_or(Path::new(""));

    Ok(match args.figure {
        FigureKind::Comparison => {
            let cfg = &config.comparison;
            if !(cfg.candidate_divisor.is_finite() && cfg.candidate_divisor > 0.0) {
                return Err(DomainError::NonPositive(cfg.candidate_divisor).into());
            }
            let series = GasData::load(input)?
                .paired(&cfg.baseline_key, &cfg.candidate_key)?
                .with_candidate_divisor(cfg.candidate_divisor);
            info!(
                "{} leaves: {} vs {}",
                series.len(),
                cfg.baseline_key,
                cfg.candidate_key
            );
            Figure::Comparison(series)
        }
        FigureKind::Heatmap => {
            let heatmap = MetricsData::load(input)?
                .heatmap(config.heatmap.metric)?
                .normalized_to_min()?;
            info!(
                "heatmap {}x{} ({:?})",
                heatmap.grid.rows(),
                heatmap.grid.cols(),
                config.heatmap.metric
            );
            Figure::Heatmap(heatmap)
        }
        FigureKind::Surface => Figure::Surface(constraint_surface(&config.surface.params())?),
        FigureKind::Scaling => {
            let records = load_scaling(input)?;
            info!("{} scaling records", records.len());
            Figure::Scaling(records)
        }
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_or_default(&args.config);
    if let Some(format) = args.format {
        config.render.format = format;
    }

    let out_path = match &args.out {
        Some(p) => PathBuf::from(p),
        None => Path::new(&config.render.out_dir).join(format!(
            "{}.{}",
            args.figure.default_stem(),
            config.render.format.extension()
        )),
    };

    let figure = load_figure(&args, &config)?;
    render(figure, &config, &out_path)?;
    info!("Saved {:?} figure to {}", args.figure, out_path.display());
    Ok(())
}
