use anyhow::Result;
use appicon_gen::icon_gen;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "appicon-gen",
    about = "Render the 1024x1024 app icon with dark and tinted variants"
)]
struct Args {
    /// Asset catalog icon set directory. Must already exist.
    #[clap(short, long, value_name = "DIR", default_value = "AppIcon.appiconset")]
    output: PathBuf,

    /// Background the icon is flattened onto (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#0f1218")]
    background: String,

    /// Font file to try before the system fonts. May be repeated.
    #[clap(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    icon_gen::generate_app_icon(icon_gen::Args {
        output: args.output,
        background: args.background,
        fonts: args.fonts,
    })
}
