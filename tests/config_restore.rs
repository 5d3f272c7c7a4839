use std::fs;
use std::path::PathBuf;

use costfig::config::{AppConfig, ImageFormat};
use costfig::core::paired::TieBreak;
use costfig::data::Metric;

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "costfig_config_restore_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn assert_close(a: f64, b: f64, label: &str) {
    let diff = (a - b).abs();
    assert!(diff <= 1e-9, "{label} mismatch: {a} vs {b}");
}

fn assert_config_eq(actual: &AppConfig, expected: &AppConfig) {
    assert_eq!(actual.comparison.baseline_key, expected.comparison.baseline_key);
    assert_eq!(actual.comparison.candidate_key, expected.comparison.candidate_key);
    assert_close(
        actual.comparison.candidate_divisor,
        expected.comparison.candidate_divisor,
        "comparison.candidate_divisor",
    );
    assert_eq!(actual.comparison.tie_break, expected.comparison.tie_break);
    assert_eq!(actual.heatmap.metric, expected.heatmap.metric);
    assert_eq!(actual.heatmap.vmin_exp, expected.heatmap.vmin_exp);
    assert_eq!(actual.heatmap.vmax_exp, expected.heatmap.vmax_exp);
    assert_eq!(actual.heatmap.clip, expected.heatmap.clip);
    assert_close(
        actual.surface.coefficient,
        expected.surface.coefficient,
        "surface.coefficient",
    );
    assert_eq!(actual.surface.u_steps, expected.surface.u_steps);
    assert_eq!(actual.surface.bucket_step, expected.surface.bucket_step);
    assert_eq!(actual.render.format, expected.render.format);
    assert_close(actual.render.dpi, expected.render.dpi, "render.dpi");
}

#[test]
fn edited_config_survives_reload() {
    let path = unique_path("edited.toml");
    let path_str = path.to_string_lossy().to_string();

    let mut expected = AppConfig::default();
    expected.comparison.baseline_key = "S.AGG Dep./ST.".into();
    expected.comparison.candidate_key = "Amotised S.AGG Dep./ST.".into();
    expected.comparison.candidate_divisor = 32.0;
    expected.comparison.tie_break = TieBreak::GroupA;
    expected.heatmap.metric = Metric::ProveRuntime;
    expected.heatmap.vmax_exp = 9;
    expected.heatmap.clip = true;
    expected.surface.coefficient = 243.0;
    expected.surface.u_steps = 120;
    expected.surface.bucket_step = 2;
    expected.render.format = ImageFormat::Png;
    expected.render.dpi = 300.0;

    fs::write(&path, toml::to_string_pretty(&expected).unwrap()).unwrap();
    let loaded = AppConfig::load_or_default(&path_str);
    assert_config_eq(&loaded, &expected);
    let _ = fs::remove_file(&path);
}

#[test]
fn written_defaults_reload_to_defaults() {
    let path = unique_path("defaults.toml");
    let path_str = path.to_string_lossy().to_string();

    let first = AppConfig::load_or_default(&path_str);
    assert!(path.exists());
    // Every key is commented out, so the second load falls back to serde defaults.
    let second = AppConfig::load_or_default(&path_str);
    assert_config_eq(&second, &first);
    assert_config_eq(&second, &AppConfig::default());
    let _ = fs::remove_file(&path);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let path = unique_path("partial.toml");
    let path_str = path.to_string_lossy().to_string();
    fs::write(&path, "[heatmap]\nautoscale = true\n\n[render]\nformat = \"png\"\n").unwrap();

    let cfg = AppConfig::load_or_default(&path_str);
    assert!(cfg.heatmap.autoscale);
    assert!(cfg.heatmap.range().unwrap().is_none());
    assert_eq!(cfg.heatmap.vmax_exp, 11);
    assert_eq!(cfg.render.format, ImageFormat::Png);
    assert_eq!(cfg.comparison.candidate_key, "imtGas");
    let _ = fs::remove_file(&path);
}
