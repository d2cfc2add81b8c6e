use anyhow::{Context, Result};
use assets::{AssetLoader, AssetRequest};
use slideconfig::SliderConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::SliderArgs;
use crate::paths::default_config_path;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (explicit, then discovered, then built-in defaults) with the
/// command-line overrides applied on top.
pub fn resolve_config(args: &SliderArgs) -> Result<SliderConfig> {
    let mut config = match &args.config {
        Some(path) => SliderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => match default_config_path() {
            Some(path) if path.is_file() => SliderConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            candidate => {
                tracing::debug!(?candidate, "no config file found; using defaults");
                SliderConfig::default()
            }
        },
    };

    apply_overrides(&mut config, args);
    config.validate().context("invalid slider configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut SliderConfig, args: &SliderArgs) {
    if let Some(intensity) = args.intensity {
        config.intensity = intensity;
    }
    if let Some(duration) = args.duration {
        config.duration = duration;
    }
    if !args.images.is_empty() {
        config.images = args.images.clone();
    }
    if let Some(displacement) = &args.displacement {
        config.displacement = displacement.clone();
    }
    if let Some(container) = args.container() {
        config.container = container;
    }
    if args.no_auto_transition {
        config.auto_transition = false;
    }
}

pub fn run(args: &SliderArgs) -> Result<()> {
    let config = resolve_config(args)?;
    tracing::info!(
        slides = config.images.len(),
        container = %config.container,
        duration = ?config.duration,
        intensity = config.intensity,
        "starting slider"
    );
    renderer::run(config)
}

pub fn print_config(args: &SliderArgs) -> Result<()> {
    let config = resolve_config(args)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn check_assets(args: &SliderArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let request = AssetRequest::from_config(&config).context("invalid asset location")?;
    tracing::debug!(textures = request.texture_count(), "loading slider assets");
    let loader = AssetLoader::new()?;
    let loaded = loader.load(&request).context("asset pipeline failed")?;
    for line in loaded.summary_lines() {
        println!("{line}");
    }
    Ok(())
}
