use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "boxlift", version, about = "Upload files and folders to Dropbox and print a share link")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file, or a directory as a zip archive
    Upload {
        /// Local file or directory
        local_path: PathBuf,
        /// Remote folder, e.g. /uploads (defaults to the configured folder)
        remote_folder: Option<String>,
        /// Remote file name; the source extension is appended if missing
        remote_name: Option<String>,
    },
    /// Link boxlift to a Dropbox account
    Authorize,
}
