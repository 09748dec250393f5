//! Mint Cannabis catalog library
//!
//! Cannabis brands, strains, potency-aware products and variants persisted with sea-orm,
//! plus find-or-create helpers keyed on Dutchie identifiers.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod events;
pub mod repositories;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::errors::ServiceError;
use crate::events::Event;
use crate::services::{ServiceContainer, ServiceFactory};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: ServiceContainer,
}

impl AppState {
    /// Connects, optionally migrates, and wires every service to one event channel.
    ///
    /// The returned receiver should be handed to [`events::process_events`].
    pub async fn initialize(
        config: config::AppConfig,
    ) -> Result<(Self, mpsc::Receiver<Event>), ServiceError> {
        let pool = db::establish_connection_from_app_config(&config).await?;
        db::check_connection(&pool).await?;
        if config.auto_migrate {
            db::run_migrations(&pool).await?;
        }
        Ok(Self::with_connection(config, pool))
    }

    /// Wires services around an existing connection
    pub fn with_connection(
        config: config::AppConfig,
        db: DatabaseConnection,
    ) -> (Self, mpsc::Receiver<Event>) {
        let db = Arc::new(db);
        let (event_sender, event_rx) = events::channel(config.event_channel_capacity);
        let factory = ServiceFactory::new(db.clone(), event_sender.clone(), config.sync.clone());
        let services = ServiceContainer::new(&factory);

        (
            Self {
                db,
                config,
                event_sender,
                services,
            },
            event_rx,
        )
    }
}
