use clap::Parser;
use std::path::PathBuf;
use takeout_meta::batch::process_dir;
use takeout_meta::{DEFAULT_OFFSET_HOURS, MigrationContext};

/// Apply Google Takeout sidecar metadata to every photo and video in a folder.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Takeout folder to process.
    dir: PathBuf,

    /// Offset in hours used when a file has no timezone of its own.
    #[arg(long, default_value_t = DEFAULT_OFFSET_HOURS, allow_negative_numbers = true)]
    offset_hours: f64,

    /// Path to the exiftool executable.
    #[arg(long)]
    exiftool: Option<PathBuf>,

    /// Also process hidden files and folders.
    #[arg(long)]
    include_hidden: bool,

    /// Don't rename files whose content doesn't match their extension.
    #[arg(long)]
    no_fix_extensions: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut ctx = MigrationContext::builder()
        .maybe_exiftool_path(args.exiftool)
        .default_offset_hours(args.offset_hours)
        .build()?;

    let summary = process_dir(
        &args.dir,
        &mut ctx,
        args.include_hidden,
        !args.no_fix_extensions,
    )
    .await?;

    println!("{summary}");
    Ok(())
}
