use anyhow::Result;
use clap::{Parser, Subcommand};
use ocm_support::commands::delete::DeleteOptions;
use ocm_support::{commands, config::Config, logging, utils::Prompt};

#[derive(Parser)]
#[command(name = "ocm-support")]
#[command(about = "Manage limited support reasons of OCM clusters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// OCM API URL (can also be set with OCM_URL environment variable)
    #[arg(global = true, long, env = "OCM_URL")]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete specified limited support reason for a given cluster
    Delete {
        /// Internal cluster ID, name or external ID
        #[arg(value_name = "CLUSTER_ID")]
        cluster_id: String,
        /// Limited support reason ID
        #[arg(short = 'i', long, required = true)]
        limited_support_reason_id: String,
        /// Dry-run - print the limited support reason about to be deleted but don't delete it
        #[arg(short = 'd', long)]
        dry_run: bool,
        /// Verbose output
        #[arg(long)]
        verbose: bool,
    },
    /// Generate markdown documentation (hidden command)
    #[command(hide = true)]
    GenerateDocs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Delete { verbose: true, .. });
    logging::init(verbose);

    match cli.command {
        Commands::Delete {
            cluster_id,
            limited_support_reason_id,
            dry_run,
            verbose,
        } => {
            let mut config = Config::load()?;

            // Override the API URL if provided via CLI or OCM_URL
            if let Some(url) = cli.url {
                config.url = Some(url);
            }

            let options = DeleteOptions {
                cluster_id,
                limited_support_reason_id,
                dry_run,
                verbose,
            };
            let mut stdout = std::io::stdout().lock();
            commands::delete::delete(&config, &options, &Prompt, &mut stdout).await?;
        }
        Commands::GenerateDocs => {
            let markdown = clap_markdown::help_markdown::<Cli>();
            println!("{}", markdown);
        }
    }

    Ok(())
}
