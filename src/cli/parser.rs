use clap::Parser;
use std::path::PathBuf;

/// Command-line interface definition for pomodoro-pet
/// Desktop pomodoro companion: work/rest timer with seasonal voice clips
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-pet",
    version = env!("CARGO_PKG_VERSION"),
    about = "A pomodoro timer pet that cheers you on with seasonal and holiday voice clips",
    long_about = None
)]
pub struct Cli {
    /// Print an inventory of images, sound pools and configuration, then exit
    #[arg(
        long = "check-resources",
        help = "Print which assets, sound pools and config files are found, then exit"
    )]
    pub check_resources: bool,

    /// Override the base directory (defaults to the executable's directory)
    #[arg(long = "base-dir", env = "POMODORO_BASE_DIR", hide = true)]
    pub base_dir: Option<PathBuf>,
}
