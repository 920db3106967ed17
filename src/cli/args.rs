use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indec-ipv")]
#[command(about = "Monthly INDEC export bulletin processor producing IPV snapshots")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Settings file [default: indec-ipv.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and hide progress")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Consolidate the year window and publish the next snapshot
    Run {
        #[arg(short, long, help = "Last year of the window [default: current year]")]
        year: Option<i32>,

        #[arg(
            short,
            long,
            help = "Read yearly archives from this directory instead of downloading"
        )]
        archive_dir: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Consolidate the year window into the intermediate table only
    Extract {
        #[arg(short, long, help = "Last year of the window [default: current year]")]
        year: Option<i32>,

        #[arg(
            short,
            long,
            help = "Read yearly archives from this directory instead of downloading"
        )]
        archive_dir: Option<PathBuf>,
    },

    /// Publish the next snapshot from an existing consolidated table
    Generate {
        #[arg(
            short,
            long,
            help = "Consolidated table [default: <processed_dir>/final_exp_table.csv]"
        )]
        input: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Show the update cursor and the snapshot the next run would write
    Status,
}
