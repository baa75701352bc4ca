use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use landmark_scrap::{
    dataset::DatasetConfig,
    info_time,
    process::process_datasets,
    server::{serve, ServerConfig},
    Result, DEFAULT_ADDR, DEFAULT_DATA_DIR, DEFAULT_STATIC_DIR, WIKI_BASE_URL,
};

#[derive(Parser)]
#[command(name = "landmark_scrap", about = "RIA resonance landmark scraper and API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the wiki and marker json, write the dataset files
    Scrape {
        #[arg(short, long, value_enum, default_value_t = DatasetArg::All)]
        dataset: DatasetArg,
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Serve the dataset files, the frontend and the wiki search
    Serve {
        #[arg(short, long, default_value = DEFAULT_ADDR)]
        addr: String,
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_STATIC_DIR)]
        static_dir: PathBuf,
        #[arg(long, default_value = WIKI_BASE_URL)]
        wiki_base: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetArg {
    Zth,
    Houtu,
    All,
}

impl DatasetArg {
    fn datasets(self) -> Vec<DatasetConfig> {
        match self {
            DatasetArg::Zth => vec![DatasetConfig::zth()],
            DatasetArg::Houtu => vec![DatasetConfig::houtu()],
            DatasetArg::All => DatasetConfig::all(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { dataset, data_dir } => {
            let client = reqwest::Client::new();
            let reports = process_datasets(&client, &dataset.datasets(), &data_dir).await?;
            for report in &reports {
                info_time!(
                    "{}: {} landmarks ({} with coordinates)",
                    report.dataset,
                    report.total,
                    report.with_coordinates
                );
            }
            info_time!(start_time, "Full program time:");
        }
        Commands::Serve {
            addr,
            data_dir,
            static_dir,
            wiki_base,
        } => {
            let config = ServerConfig {
                data_dir,
                static_dir,
                wiki_base,
            };
            serve(&addr, config).await?;
        }
    }

    Ok(())
}
