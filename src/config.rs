use crate::core::error::DomainError;
use crate::core::log_scale::ScaleRange;
use crate::core::paired::TieBreak;
use crate::core::surface::SurfaceParams;
use crate::data::Metric;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "ComparisonConfig::default_baseline_key")]
    pub baseline_key: String,
    #[serde(default = "ComparisonConfig::default_candidate_key")]
    pub candidate_key: String,
    #[serde(default = "ComparisonConfig::default_baseline_label")]
    pub baseline_label: String,
    #[serde(default = "ComparisonConfig::default_candidate_label")]
    pub candidate_label: String,
    /// Candidate values are divided by this before comparing (amortised cost).
    #[serde(default = "ComparisonConfig::default_candidate_divisor")]
    pub candidate_divisor: f64,
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default = "ComparisonConfig::default_y_label")]
    pub y_label: String,
}

impl ComparisonConfig {
    fn default_baseline_key() -> String {
        "mmrGas".to_string()
    }
    fn default_candidate_key() -> String {
        "imtGas".to_string()
    }
    fn default_baseline_label() -> String {
        "MMR".to_string()
    }
    fn default_candidate_label() -> String {
        "IMT".to_string()
    }
    fn default_candidate_divisor() -> f64 {
        1.0
    }
    fn default_y_label() -> String {
        "Gas Used".to_string()
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            baseline_key: Self::default_baseline_key(),
            candidate_key: Self::default_candidate_key(),
            baseline_label: Self::default_baseline_label(),
            candidate_label: Self::default_candidate_label(),
            candidate_divisor: Self::default_candidate_divisor(),
            tie_break: TieBreak::default(),
            y_label: Self::default_y_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default = "HeatmapConfig::default_vmin_exp")]
    pub vmin_exp: i32,
    #[serde(default = "HeatmapConfig::default_vmax_exp")]
    pub vmax_exp: i32,
    /// Ignore `vmin_exp`/`vmax_exp` and fit the range to the data.
    #[serde(default)]
    pub autoscale: bool,
    #[serde(default)]
    pub clip: bool,
    #[serde(default = "HeatmapConfig::default_tick_every")]
    pub tick_every: u32,
}

impl HeatmapConfig {
    fn default_vmin_exp() -> i32 {
        0
    }
    fn default_vmax_exp() -> i32 {
        11
    }
    fn default_tick_every() -> u32 {
        2
    }

    /// Fixed colour range, or `None` when autoscaling.
    pub fn range(&self) -> Result<Option<ScaleRange>, DomainError> {
        if self.autoscale {
            return Ok(None);
        }
        ScaleRange::from_exponents(self.vmin_exp, self.vmax_exp).map(Some)
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            vmin_exp: Self::default_vmin_exp(),
            vmax_exp: Self::default_vmax_exp(),
            autoscale: false,
            clip: false,
            tick_every: Self::default_tick_every(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "SurfaceConfig::default_coefficient")]
    pub coefficient: f64,
    #[serde(default = "SurfaceConfig::default_base")]
    pub base: f64,
    #[serde(default = "SurfaceConfig::default_u_min")]
    pub u_min: f64,
    #[serde(default = "SurfaceConfig::default_u_max")]
    pub u_max: f64,
    #[serde(default = "SurfaceConfig::default_u_steps")]
    pub u_steps: usize,
    #[serde(default = "SurfaceConfig::default_y_min")]
    pub y_min: f64,
    #[serde(default = "SurfaceConfig::default_y_max")]
    pub y_max: f64,
    #[serde(default = "SurfaceConfig::default_y_steps")]
    pub y_steps: usize,
    #[serde(default = "SurfaceConfig::default_bucket_min_exp")]
    pub bucket_min_exp: i32,
    #[serde(default = "SurfaceConfig::default_bucket_max_exp")]
    pub bucket_max_exp: i32,
    #[serde(default = "SurfaceConfig::default_bucket_step")]
    pub bucket_step: u32,
    #[serde(default = "SurfaceConfig::default_tick_every")]
    pub tick_every: u32,
}

impl SurfaceConfig {
    fn default_coefficient() -> f64 {
        SurfaceParams::default().coefficient
    }
    fn default_base() -> f64 {
        SurfaceParams::default().base
    }
    fn default_u_min() -> f64 {
        SurfaceParams::default().u_min
    }
    fn default_u_max() -> f64 {
        SurfaceParams::default().u_max
    }
    fn default_u_steps() -> usize {
        SurfaceParams::default().u_steps
    }
    fn default_y_min() -> f64 {
        SurfaceParams::default().y_min
    }
    fn default_y_max() -> f64 {
        SurfaceParams::default().y_max
    }
    fn default_y_steps() -> usize {
        SurfaceParams::default().y_steps
    }
    fn default_bucket_min_exp() -> i32 {
        10
    }
    fn default_bucket_max_exp() -> i32 {
        26
    }
    fn default_bucket_step() -> u32 {
        1
    }
    fn default_tick_every() -> u32 {
        2
    }

    pub fn params(&self) -> SurfaceParams {
        SurfaceParams {
            coefficient: self.coefficient,
            base: self.base,
            u_min: self.u_min,
            u_max: self.u_max,
            u_steps: self.u_steps,
            y_min: self.y_min,
            y_max: self.y_max,
            y_steps: self.y_steps,
        }
    }

    pub fn bucket_range(&self) -> Result<ScaleRange, DomainError> {
        ScaleRange::from_exponents(self.bucket_min_exp, self.bucket_max_exp)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            coefficient: Self::default_coefficient(),
            base: Self::default_base(),
            u_min: Self::default_u_min(),
            u_max: Self::default_u_max(),
            u_steps: Self::default_u_steps(),
            y_min: Self::default_y_min(),
            y_max: Self::default_y_max(),
            y_steps: Self::default_y_steps(),
            bucket_min_exp: Self::default_bucket_min_exp(),
            bucket_max_exp: Self::default_bucket_max_exp(),
            bucket_step: Self::default_bucket_step(),
            tick_every: Self::default_tick_every(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_out_dir")]
    pub out_dir: String,
    #[serde(default)]
    pub format: ImageFormat,
    /// Pixels per inch of figure size.
    #[serde(default = "RenderConfig::default_dpi")]
    pub dpi: f64,
}

impl RenderConfig {
    fn default_out_dir() -> String {
        "figure".to_string()
    }
    fn default_dpi() -> f64 {
        200.0
    }

    /// Pixel size of a `w_in × h_in` inch figure.
    pub fn pixels(&self, w_in: f64, h_in: f64) -> (u32, u32) {
        let dpi = self.dpi.max(1.0);
        ((w_in * dpi).round() as u32, (h_in * dpi).round() as u32)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            out_dir: Self::default_out_dir(),
            format: ImageFormat::default(),
            dpi: Self::default_dpi(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl AppConfig {
    fn round_f64(x: f64) -> f64 {
        (x * 1_000_000.0).round() / 1_000_000.0
    }

    /// Shortest decimal form of `x` with at most six fractional digits;
    /// keeps a trailing `.0` on whole numbers so TOML still reads a float.
    fn float_literal(x: f64) -> String {
        let fixed = format!("{x:.6}");
        let trimmed = fixed.trim_end_matches('0');
        match trimmed.strip_suffix('.') {
            Some(whole) => format!("{whole}.0"),
            None => trimmed.to_string(),
        }
    }

    fn rounded(mut self) -> Self {
        self.comparison.candidate_divisor = Self::round_f64(self.comparison.candidate_divisor);
        self.surface.coefficient = Self::round_f64(self.surface.coefficient);
        self.surface.base = Self::round_f64(self.surface.base);
        self.surface.u_min = Self::round_f64(self.surface.u_min);
        self.surface.u_max = Self::round_f64(self.surface.u_max);
        self.surface.y_min = Self::round_f64(self.surface.y_min);
        self.surface.y_max = Self::round_f64(self.surface.y_max);
        self.render.dpi = Self::round_f64(self.render.dpi);
        self
    }

    /// Comment out every key of a serialized config, keeping section headers.
    fn commented(text: &str) -> String {
        text.lines()
            .map(|line| {
                let t = line.trim();
                if t.is_empty() || (t.starts_with('[') && t.ends_with(']')) {
                    return format!("{line}\n");
                }
                let float = line.split_once('=').and_then(|(key, value)| {
                    let value = value.trim();
                    let looks_float = value.contains(['.', 'e', 'E']) && !value.contains('"');
                    let parsed = value.parse::<f64>().ok().filter(|_| looks_float)?;
                    Some(format!("{} = {}", key.trim(), Self::float_literal(parsed)))
                });
                format!("# {}\n", float.as_deref().unwrap_or(line))
            })
            .collect()
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default().rounded();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, Self::commented(&text)) {
                    warn!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}; continuing with defaults"),
        }
        default_cfg
    }
}
