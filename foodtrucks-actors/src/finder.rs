use crate::actor::{Actor, Context};
use crate::FinderMsg;
use anyhow::Result;
use foodtrucks_core::actions;
use foodtrucks_core::{Geocoder, NearbyFailure, TruckSource};
use std::sync::Arc;

/// Runs dataset fetches and nearby lookups for the view.
///
/// Every request runs in its own task, so two lookups may be in flight at
/// once. Nothing orders their replies: whichever finishes last is applied
/// last.
pub struct FinderActor {
    source: Arc<dyn TruckSource>,
    geocoder: Arc<dyn Geocoder>,
}

impl FinderActor {
    pub fn new(source: Arc<dyn TruckSource>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { source, geocoder }
    }
}

#[async_trait::async_trait]
impl Actor for FinderActor {
    type Msg = FinderMsg;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            FinderMsg::LoadDataset { reply } => {
                let source = self.source.clone();
                tokio::spawn(async move {
                    let job = tokio::spawn(async move { actions::load_dataset(source.as_ref()).await });
                    let outcome = job
                        .await
                        .unwrap_or_else(|e| Err(format!("dataset task failed: {e}")));
                    if reply.send(outcome).is_err() {
                        tracing::debug!("finder.load.reply_dropped");
                    }
                });
            }
            FinderMsg::FindNearby {
                zip_code,
                candidates,
                radius_km,
                reply,
            } => {
                let geocoder = self.geocoder.clone();
                tokio::spawn(async move {
                    let job = tokio::spawn(async move {
                        actions::locate_nearby(geocoder.as_ref(), &zip_code, &candidates, radius_km)
                            .await
                    });
                    let outcome = job.await.unwrap_or_else(|e| {
                        tracing::error!(error = %e, "finder.nearby.task_failed");
                        Err(NearbyFailure::Compute)
                    });
                    if reply.send(outcome).is_err() {
                        tracing::debug!("finder.nearby.reply_dropped");
                    }
                });
            }
        }
        Ok(())
    }
}
