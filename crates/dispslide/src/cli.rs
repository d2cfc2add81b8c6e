use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use slideconfig::ContainerTarget;

#[derive(Parser, Debug)]
#[command(
    name = "dispslide",
    author,
    version,
    about = "Image slider with a displacement-map crossfade",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub slider: SliderArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct SliderArgs {
    /// Slider configuration file; defaults to `<config dir>/dispslide/slider.toml`.
    #[arg(long, env = "DISPSLIDE_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Displacement strength applied to both slides during a sweep.
    #[arg(long, value_name = "FLOAT", global = true)]
    pub intensity: Option<f32>,

    /// Sweep duration, in seconds (`2.5`) or humantime form (`800ms`).
    #[arg(long, value_name = "DURATION", value_parser = parse_duration, global = true)]
    pub duration: Option<Duration>,

    /// Slide image path or URL; repeat to build the slide list.
    #[arg(long = "image", value_name = "PATH|URL", global = true)]
    pub images: Vec<String>,

    /// Displacement map path or URL.
    #[arg(long, value_name = "PATH|URL", global = true)]
    pub displacement: Option<String>,

    /// Open fullscreen, optionally on the named monitor (`--fullscreen=DP-1`).
    #[arg(
        long,
        value_name = "MONITOR",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "",
        global = true
    )]
    pub fullscreen: Option<String>,

    /// Ignore navigation requests until re-enabled with the `a` key.
    #[arg(long, global = true)]
    pub no_auto_transition: bool,
}

impl SliderArgs {
    pub fn container(&self) -> Option<ContainerTarget> {
        self.fullscreen.as_deref().map(|monitor| {
            let monitor = monitor.trim();
            ContainerTarget::Fullscreen {
                monitor: (!monitor.is_empty()).then(|| monitor.to_string()),
            }
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration as TOML.
    Config,
    /// Load every texture without opening a window and report what was decoded.
    Assets,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let duration = match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Duration::try_from_secs_f64(seconds)
                .map_err(|err| format!("duration '{trimmed}' is out of range: {err}"))?
        }
        Ok(_) => return Err(format!("invalid duration '{trimmed}'")),
        Err(_) => humantime::parse_duration(trimmed)
            .map_err(|err| format!("invalid duration '{trimmed}': {err}"))?,
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
