use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "meetbridge")]
#[command(about = "Live meeting bridge for Zoom", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP API (default)
    Serve,
    /// Show what is live right now, reconciling the store on the way
    Live,
    /// Start an instant meeting, ending anything already live
    Start(StartCliArgs),
    /// End a meeting by its Zoom meeting id
    End(EndCliArgs),
    /// Inspect stored meeting records
    Meetings(MeetingsCliArgs),
    /// Report Zoom credential and connectivity status
    Diagnose,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct StartCliArgs {
    /// Meeting title (default: "<default_title> MM-DD-YYYY")
    #[arg(long)]
    pub title: Option<String>,
    /// Identity to act as (default: first configured admin)
    #[arg(long = "as")]
    pub as_user: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct EndCliArgs {
    /// Zoom meeting id
    pub meeting_id: String,
    /// Identity to act as (default: first configured admin)
    #[arg(long = "as")]
    pub as_user: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct MeetingsCliArgs {
    #[command(subcommand)]
    pub command: MeetingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingsCommand {
    /// List meeting records, newest first
    List {
        /// Only records with this status (scheduled, live, ended)
        #[arg(long)]
        status: Option<String>,
        /// Only records hosted by this identity
        #[arg(long)]
        host: Option<String>,
    },
    /// Show a single meeting record
    Show {
        /// Record id
        id: String,
    },
    /// Ask Zoom for the status of a meeting
    Status {
        /// Zoom meeting id
        meeting_id: String,
    },
}
