//! Catalog Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use catalog_app::{
    database::{self, StoreKind},
    seed,
};

#[derive(Debug, Parser)]
#[command(name = "catalog-app", about = "Catalog CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(DbCommand),
}

#[derive(Debug, Args)]
struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate(DatabaseArgs),

    /// Insert the sample products into an empty catalog
    Seed(DatabaseArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Db(DbCommand {
            command: DbSubcommand::Migrate(args),
        }) => migrate(args).await,
        Commands::Db(DbCommand {
            command: DbSubcommand::Seed(args),
        }) => seed(args).await,
    }
}

async fn migrate(args: DatabaseArgs) -> Result<(), String> {
    if StoreKind::from_url(&args.database_url).map_err(|error| error.to_string())?
        != StoreKind::Postgres
    {
        return Err("migrations only apply to postgres:// databases".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}

async fn seed(args: DatabaseArgs) -> Result<(), String> {
    let repository = database::open_products_repository(&args.database_url)
        .await
        .map_err(|error| format!("failed to open product storage: {error}"))?;

    let seeded = seed::seed_products(repository.as_ref())
        .await
        .map_err(|error| format!("failed to seed products: {error}"))?;

    println!("seeded_products: {seeded}");

    Ok(())
}
