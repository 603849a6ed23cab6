#[macro_use]
extern crate tracing;

use std::{path::PathBuf, sync::Arc};

use color_eyre::eyre::{eyre, WrapErr};
use structopt::StructOpt;
use tokio::runtime::Builder;

use eyedropper::{
    control::Picker,
    models::{PickRadius, PickerConfig, RadiusUnit, RgbChannelOrder},
    picker::{hooks::PickHooks, surface::HeadlessSurface, InputEvent},
    raster::FileRasterizer,
};

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    #[structopt(long)]
    dump_config: bool,
    /// Image to pick the color from
    #[structopt(short, long, required_unless = "dump-config")]
    image: Option<PathBuf>,
    #[structopt(short, default_value = "0", allow_hyphen_values = true)]
    x: i32,
    #[structopt(short, default_value = "0", allow_hyphen_values = true)]
    y: i32,
    /// Neighborhood unit, overrides the configured pick radius
    #[structopt(short, long, requires = "amount")]
    unit: Option<RadiusUnit>,
    #[structopt(short, long)]
    amount: Option<u32>,
    /// Encode the rgb string in R, G, B order
    #[structopt(long)]
    standard_rgb: bool,
}

async fn run(opts: Opts) -> color_eyre::eyre::Result<()> {
    // Load configuration
    let mut config = match opts.config_path.as_deref() {
        Some(path) => PickerConfig::load_file(path)
            .await
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => PickerConfig::default(),
    };

    // Command-line overrides
    if let Some(unit) = opts.unit {
        config.pick_radius = Some(PickRadius::new(unit, opts.amount.unwrap_or_default()));
    }

    if opts.standard_rgb {
        config.rgb_channel_order = RgbChannelOrder::Standard;
    }

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    let image = opts.image.ok_or_else(|| eyre!("no image to pick from"))?;

    let hooks = PickHooks::new()
        .on_pick_start(|| debug!("pick started"))
        .on_pick_click(|offset| debug!(offset = %offset, "clicked"))
        .on_pick_stop(|| debug!("pick stopped"))
        .on_pick_error(|error| error!(error = %error, "pick error"));

    let mut picker = Picker::mount(
        config,
        Arc::new(hooks),
        Arc::new(FileRasterizer),
        HeadlessSurface::new(),
    )?;

    picker.click()?;

    let handle = picker
        .handle_event(InputEvent::click(image, opts.x, opts.y))
        .ok_or_else(|| eyre!("click was not captured"))?;

    let picked = handle
        .await??
        .ok_or_else(|| eyre!("pick was discarded"))?;

    println!("{}", serde_json::to_string_pretty(&picked)?);

    picker.unmount();
    Ok(())
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_env("EYEDROPPER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "eyedropper=warn",
            1 => "eyedropper=info",
            2 => "eyedropper=debug",
            _ => "eyedropper=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    // Create tokio runtime
    let thd_count = match num_cpus::get() {
        1 => 2,
        other => other.min(4),
    };

    let rt = Builder::new_multi_thread()
        .worker_threads(thd_count)
        .enable_all()
        .build()?;
    rt.block_on(run(opts))
}
