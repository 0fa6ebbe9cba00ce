use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{error, info};

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database at {}", database_url);

    let db: DatabaseConnection = match Database::connect(database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Could not connect to '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    let pending = Migrator::get_pending_migrations(&db).await?.len();
    info!("Applying {} pending migration(s)", pending);

    if let Err(e) = Migrator::up(&db, None).await {
        error!("Migration failed: {}", e);
        return Err(e.into());
    }

    info!("Database schema is up to date");
    Ok(())
}
