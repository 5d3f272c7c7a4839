use clap::{Parser, ValueEnum};

use crate::config::ImageFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FigureKind {
    /// Baseline vs candidate gas per leaf index
    Comparison,
    /// Runtime heatmap over tree height
    Heatmap,
    /// Constraint-count surface over batch size and tree height
    Surface,
    /// Runtime vs constraint count, log-log
    Scaling,
}

impl FigureKind {
    pub fn needs_input(self) -> bool {
        !matches!(self, FigureKind::Surface)
    }

    pub fn default_stem(self) -> &'static str {
        match self {
            FigureKind::Comparison => "gas_comparison",
            FigureKind::Heatmap => "hm1",
            FigureKind::Surface => "constraint_surface",
            FigureKind::Scaling => "runtime_scaling",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Figure to render
    #[arg(value_enum, value_name = "FIGURE")]
    pub figure: FigureKind,

    /// JSON data file (not used by `surface`)
    #[arg(long, short)]
    pub input: Option<String>,

    /// Output image path (defaults to <render.out_dir>/<figure>.<format>)
    #[arg(long, short)]
    pub out: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "costfig.toml")]
    pub config: String,

    /// Image format (overrides config)
    #[arg(long, value_enum)]
    pub format: Option<ImageFormat>,
}
