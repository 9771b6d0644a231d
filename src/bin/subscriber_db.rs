use clap::{Parser, Subcommand};

use vm_subscriber::config::AppConfig;
use vm_subscriber::infrastructure::persistence::{schema, DbPool};
use vm_subscriber::utils::logging;

/// Subscriber database management CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for database management
#[derive(Subcommand)]
enum Commands {
    /// Create any missing tables
    Create,
    /// Drop and recreate the derived tables
    Reset {
        /// Also drop the stored genesis document
        #[arg(long)]
        with_genesis: bool,
    },
    /// Show row counts per table
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let db_pool = DbPool::new(&config.database).await?;
    let conn = db_pool.get_connection();

    match cli.command {
        Commands::Create => {
            schema::create_schema(conn).await?;
        }
        Commands::Reset { with_genesis } => {
            if with_genesis {
                schema::reset_for_startup(conn).await?;
            } else {
                schema::create_schema(conn).await?;
                schema::reset_derived_tables(conn).await?;
            }
        }
        Commands::Status => {
            for (table, rows) in schema::table_counts(conn).await? {
                println!("{:<24} {:>12}", table, rows);
            }
        }
    }

    Ok(())
}
