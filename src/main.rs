use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use catalog_worker::{
    endpoint, AppState, Config, FileKv, HistoryLog, ImgurHost, KeyValueStore, ProductStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    let kv: Arc<dyn KeyValueStore> = match FileKv::new(&config.data_dir) {
        Ok(kv) => Arc::new(kv),
        Err(e) => {
            tracing::error!(dir = %config.data_dir.display(), error = %e, "cannot open data directory");
            return ExitCode::FAILURE;
        }
    };

    if config.admin_token.is_none() {
        tracing::warn!("CATALOG_ADMIN_TOKEN unset: privileged operations are open");
    }
    if config.imgur_client_id.is_empty() {
        tracing::warn!("IMGUR_CLIENT_ID unset: image uploads will be rejected upstream");
    }

    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(
        ProductStore::new(kv.clone()),
        HistoryLog::new(kv),
        Arc::new(ImgurHost::new(config.imgur_client_id.clone())),
        config,
    ));

    if let Err(e) = endpoint::serve(state, &listen_addr).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
