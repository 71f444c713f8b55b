use std::sync::Arc;

use tracing::error;

use crate::application::{ContactImportUseCase, ContactImporter};
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::db::contacts::ContactRepository;
use crate::interfaces::http::{start_server, HttpState};

pub fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let config = ConfigService::new().load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    actix_web::rt::System::new().block_on(async move {
        let repository = ContactRepository::init(
            &config.database.url,
            config.database.max_connections,
        )
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to open contact database");
            std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
        })?;
        let repository = Arc::new(repository);

        let importer = Arc::new(ContactImporter::new(config.import.clone()));
        let import_use_case = Arc::new(ContactImportUseCase::new(importer, repository.clone()));

        start_server(
            HttpState {
                import_use_case,
                repository,
                max_upload_bytes: config.server.max_upload_bytes,
            },
            &config.server,
        )?
        .await
    })
}
