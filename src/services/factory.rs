use std::sync::Arc;

use crate::{
    config::SyncConfig,
    db::DbPool,
    events::EventSender,
    repositories::VariantDefaults,
    services::{
        brands::BrandService, catalog_sync::CatalogSync, products::ProductService,
        strains::StrainService,
    },
};

/// Factory for creating service instances with shared dependencies
pub struct ServiceFactory {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    sync: SyncConfig,
}

impl ServiceFactory {
    /// Creates a new service factory with the given dependencies
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, sync: SyncConfig) -> Self {
        Self {
            db_pool,
            event_sender,
            sync,
        }
    }

    pub fn brand_service(&self) -> BrandService {
        BrandService::new(self.db_pool.clone(), self.event_sender.clone())
    }

    pub fn strain_service(&self) -> StrainService {
        StrainService::new(self.db_pool.clone(), self.event_sender.clone())
    }

    /// Product service using the configured variant stock defaults
    pub fn product_service(&self) -> ProductService {
        ProductService::with_variant_defaults(
            self.db_pool.clone(),
            self.event_sender.clone(),
            VariantDefaults::from(&self.sync),
        )
    }

    pub fn catalog_sync(&self) -> CatalogSync {
        CatalogSync::new(self.db_pool.clone(), self.event_sender.clone(), &self.sync)
    }

    /// Gets a reference to the database pool
    pub fn db_pool(&self) -> &Arc<DbPool> {
        &self.db_pool
    }

    /// Gets a reference to the event sender
    pub fn event_sender(&self) -> &EventSender {
        &self.event_sender
    }
}

/// Service container holding all service instances
#[derive(Clone)]
pub struct ServiceContainer {
    pub brands: Arc<BrandService>,
    pub strains: Arc<StrainService>,
    pub products: Arc<ProductService>,
    pub sync: Arc<CatalogSync>,
}

impl ServiceContainer {
    /// Creates a new service container with all services initialized
    pub fn new(factory: &ServiceFactory) -> Self {
        Self {
            brands: Arc::new(factory.brand_service()),
            strains: Arc::new(factory.strain_service()),
            products: Arc::new(factory.product_service()),
            sync: Arc::new(factory.catalog_sync()),
        }
    }
}
