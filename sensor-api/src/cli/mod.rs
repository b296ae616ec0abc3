use clap::{Parser, Subcommand};

pub mod database;
pub mod server;

#[derive(Parser, Debug)]
#[command(
    name = "sensor-api",
    about = "Sensor API - serves EMG and hand-data records stored in MongoDB",
    long_about = "Sensor API exposes read endpoints over sensor collections whose database and collection \
    names are supplied by the caller on every request.\n\n\
    Quick Start:\n  \
    sensor-api run --mongodb-connection-url mongodb://localhost:27017",
    after_help = "Examples:\n  \
    sensor-api run\n  \
    sensor-api run --port 8080\n  \
    MONGODB_URI=mongodb://db:27017 PORT=8000 sensor-api run"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct RunCmd {
    #[clap(flatten, next_help_heading = "Database")]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten, next_help_heading = "Server")]
    pub server_args: server::ServerCliArgs,
}
