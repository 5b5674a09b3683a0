//! PetPlate
//!
//! An MCP server for companion animal nutrition tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use petplate::mcp::PetPlateService;
use petplate::{build_info, config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stderr only; stdout carries the MCP stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let db_path = config::database_path();
    info!(path = %db_path.display(), "Opening database");

    let database = db::Database::open(&db_path)?;
    info!(version = database.schema_version()?, "Database schema ready");

    let service = PetPlateService::new(db_path, database);

    info!("Starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
