use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a video's script and translate it to Korean when it is English
    Extract {
        /// YouTube video URL or id
        #[arg(short, long)]
        url: String,

        /// Title used to name the output files
        #[arg(short, long)]
        title: Option<String>,

        /// Output directory for the script files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Caption language to try first
        #[arg(short, long)]
        language: Option<String>,

        /// Only save the script, never translate
        #[arg(long)]
        no_translate: bool,
    },

    /// Play a video's audio track in the background
    Play {
        /// YouTube video URL or id
        #[arg(short, long)]
        url: String,

        /// Block until playback ends
        #[arg(long)]
        wait: bool,
    },

    /// List the latest videos of a channel
    Channel {
        /// Channel URL, @handle or name
        query: Option<String>,

        /// Use a favorite channel from the configuration
        #[arg(short, long)]
        favorite: Option<String>,

        /// Number of videos to list
        #[arg(short, long)]
        max_results: Option<usize>,
    },

    /// Check that the external tools are installed
    Check,

    /// List whisper.cpp models and their status
    Models {
        /// Download the configured model when missing
        #[arg(long)]
        download: bool,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "ytscript.toml")]
        path: PathBuf,
    },
}
