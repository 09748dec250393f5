// Find-or-create resolver shared by every catalog entity
pub mod upsert;

// Master data
pub mod brands;
pub mod strains;

// Products and variants
pub mod products;

// Dutchie inventory records
pub mod catalog_sync;

// Service factory for dependency injection
pub mod factory;

use tracing::error;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

pub use brands::BrandService;
pub use catalog_sync::{CatalogSync, InventoryItem, SyncOutcome};
pub use factory::{ServiceContainer, ServiceFactory};
pub use products::ProductService;
pub use strains::StrainService;
pub use upsert::{
    upsert, BrandName, DutchieProductId, SkuLocation, StrainName, UpsertOutcome, Upserted,
};

pub(crate) async fn publish(sender: &EventSender, event: Event) -> Result<(), ServiceError> {
    let kind = event.kind();
    sender.send(event).await.map_err(|e| {
        error!(event = kind, error = %e, "Failed to publish event");
        ServiceError::EventError(e)
    })
}
