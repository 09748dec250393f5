use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::upsert::UpsertOutcome;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

// Catalog events published by the services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BrandCreated(Uuid),
    BrandUpdated(Uuid),
    StrainCreated(Uuid),
    StrainUpdated(Uuid),
    ProductUpserted {
        product_id: Uuid,
        dutchie_product_id: Option<String>,
        outcome: UpsertOutcome,
    },
    VariantUpserted {
        variant_id: Uuid,
        product_id: Option<Uuid>,
        outcome: UpsertOutcome,
    },
    LowStockDetected {
        variant_id: Uuid,
        dutchie_sku: Option<String>,
        dutchie_location_id: Option<String>,
        quantity_available: Decimal,
        low_stock_threshold: i32,
    },
}

impl Event {
    /// Short name used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Event::BrandCreated(_) => "brand_created",
            Event::BrandUpdated(_) => "brand_updated",
            Event::StrainCreated(_) => "strain_created",
            Event::StrainUpdated(_) => "strain_updated",
            Event::ProductUpserted { .. } => "product_upserted",
            Event::VariantUpserted { .. } => "variant_upserted",
            Event::LowStockDetected { .. } => "low_stock_detected",
        }
    }
}

// Drains the channel, logging each event, until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) -> u64 {
    info!("Starting event processing loop");
    let mut processed = 0;

    while let Some(event) = rx.recv().await {
        counter!("mint_cannabis.events.processed", 1, "kind" => event.kind());
        processed += 1;

        match event {
            Event::LowStockDetected {
                variant_id,
                dutchie_sku,
                dutchie_location_id,
                quantity_available,
                low_stock_threshold,
            } => {
                warn!(
                    %variant_id,
                    sku = dutchie_sku.as_deref().unwrap_or(""),
                    location = dutchie_location_id.as_deref().unwrap_or(""),
                    %quantity_available,
                    low_stock_threshold,
                    "Variant is low on stock"
                );
            }
            Event::ProductUpserted {
                product_id,
                dutchie_product_id,
                outcome,
            } => {
                info!(
                    %product_id,
                    dutchie_product_id = dutchie_product_id.as_deref().unwrap_or(""),
                    %outcome,
                    "Product synced"
                );
            }
            Event::VariantUpserted {
                variant_id,
                product_id,
                outcome,
            } => {
                info!(%variant_id, product_id = ?product_id, %outcome, "Variant synced");
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    warn!("Event processing loop has ended");
    processed
}
