use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{SearchOptions, SearchQuery};

#[derive(Parser, Debug)]
#[command(name = "anvesh")]
#[command(version)]
#[command(about = "Search text across local documents", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search folders for text in documents
    Search(SearchArgs),

    /// Show past searches, newest first
    History {
        #[arg(long)]
        json: bool,

        /// Delete the journal instead
        #[arg(long, conflicts_with = "json")]
        clear: bool,
    },

    /// Open a file, jumping to a line when the editor supports it
    Open {
        path: PathBuf,

        #[arg(long)]
        line: Option<usize>,
    },

    /// Image and video analysis
    #[command(subcommand)]
    Ai(AiCommand),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    pub query: String,

    /// Folder to search; repeat for several
    #[arg(short, long = "folder", value_name = "DIR")]
    pub folders: Vec<PathBuf>,

    #[arg(long)]
    pub exact: bool,

    #[arg(long)]
    pub case_sensitive: bool,

    /// Match file names as well as contents
    #[arg(long)]
    pub filenames: bool,

    /// Emit progress events as JSON lines
    #[arg(long, conflicts_with = "json")]
    pub stream: bool,

    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone(), self.folders.clone()).with_options(SearchOptions {
            exact_match: self.exact,
            case_sensitive: self.case_sensitive,
            search_filenames: self.filenames,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum AiCommand {
    /// Report which capabilities are usable
    Capabilities,

    /// Recognize text in an image
    Ocr { image: PathBuf },

    /// Recognize text in sampled video frames
    VideoOcr {
        video: PathBuf,
        #[arg(long)]
        interval: Option<u32>,
    },

    /// Detect objects in an image
    Objects {
        image: PathBuf,
        #[arg(long)]
        confidence: Option<f32>,
    },

    /// Detect faces in an image
    Faces { image: PathBuf },

    /// Detect faces in sampled video frames
    VideoFaces {
        video: PathBuf,
        #[arg(long)]
        interval: Option<u32>,
    },

    /// Compare the faces of two images
    MatchFaces {
        image1: PathBuf,
        image2: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Find images in a folder showing the reference face
    FindFaces {
        reference: PathBuf,
        folder: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
    },
}
