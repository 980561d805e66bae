use crate::app_state::AppEvent;
use crate::catalog::{CatalogResponse, CatalogService};
use log::warn;
use tokio::sync::mpsc;

/// Run one ingestion and report its outcome to the UI. The actor awaits
/// this inline, so at most one fetch is ever in flight. The UI consumes the
/// same status/payload contract a web front end would get from the read
/// endpoint.
pub async fn run_refresh(tx: &mpsc::UnboundedSender<AppEvent>) {
    let _ = tx.send(AppEvent::Loading);

    let (status, payload) = match CatalogService::from_env() {
        Ok(service) => service.get_catalog().await,
        Err(e) => (
            e.status_code(),
            CatalogResponse::Error {
                error: e.to_string(),
            },
        ),
    };

    match payload {
        CatalogResponse::Data { data } => {
            let _ = tx.send(AppEvent::Message(format!("✓ Loaded {} scents", data.len())));
            let _ = tx.send(AppEvent::Scents(data));
        }
        CatalogResponse::Error { error } => {
            warn!("refresh failed [{}]: {}", status, error);
            let _ = tx.send(AppEvent::Error(error));
        }
    }
}
