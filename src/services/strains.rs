use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sea_orm::ConnectionTrait;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{with_transaction, DbPool},
    dto::StrainChanges,
    entities::{ProductModel, StrainModel},
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{ProductRepository, StrainRepository},
    services::{
        publish,
        upsert::{upsert, StrainName, Upserted},
    },
};

/// Recounts the active products linked to a strain and stores the result.
pub(crate) async fn refresh_strain_product_count<C: ConnectionTrait>(
    db: &C,
    strain_id: Uuid,
) -> Result<i32, ServiceError> {
    let count = ProductRepository::new(db)
        .count_active_by_strain(strain_id)
        .await?;
    let count = i32::try_from(count).map_err(|_| {
        ServiceError::InternalError(format!("product count overflow for strain {}", strain_id))
    })?;
    StrainRepository::new(db)
        .set_product_count(strain_id, count)
        .await?;
    Ok(count)
}

/// Ancestors of `start` breadth-first, each visited once. `start` itself is not included.
async fn ancestors<C: ConnectionTrait>(
    repo: &StrainRepository<'_, C>,
    start: &StrainModel,
) -> Result<Vec<StrainModel>, ServiceError> {
    let mut seen: HashSet<Uuid> = HashSet::from([start.id]);
    let mut frontier: Vec<Uuid> = start
        .parent_ids()
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    let mut lineage = Vec::new();

    while !frontier.is_empty() {
        let mut loaded: HashMap<Uuid, StrainModel> = repo
            .find_by_ids(frontier.clone())
            .await?
            .into_iter()
            .map(|strain| (strain.id, strain))
            .collect();

        let mut next = Vec::new();
        for id in frontier {
            // Dangling links are skipped
            let Some(strain) = loaded.remove(&id) else {
                continue;
            };
            next.extend(strain.parent_ids().into_iter().filter(|p| seen.insert(*p)));
            lineage.push(strain);
        }
        frontier = next;
    }

    Ok(lineage)
}

/// Service for managing strains and their lineage
#[derive(Clone)]
pub struct StrainService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl StrainService {
    /// Creates a new strain service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a strain. An exact duplicate name fails with `ConstraintViolation`.
    #[instrument(skip(self))]
    pub async fn create_strain(&self, changes: StrainChanges) -> Result<StrainModel, ServiceError> {
        changes.validate()?;
        if changes.name.is_none() {
            return Err(ServiceError::ValidationError(
                "strain name is required".to_string(),
            ));
        }

        let strain = StrainRepository::new(&*self.db_pool)
            .insert(changes)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create strain");
                e
            })?;

        publish(&self.event_sender, Event::StrainCreated(strain.id)).await?;
        info!(strain_id = %strain.id, name = %strain.name, "Strain created successfully");

        Ok(strain)
    }

    #[instrument(skip(self))]
    pub async fn update_strain(
        &self,
        id: Uuid,
        changes: StrainChanges,
    ) -> Result<StrainModel, ServiceError> {
        changes.validate()?;
        let repo = StrainRepository::new(&*self.db_pool);
        let strain = require(&repo, id).await?;
        let strain = repo.save_changes(strain, changes).await?;

        publish(&self.event_sender, Event::StrainUpdated(strain.id)).await?;
        info!(strain_id = %strain.id, "Strain updated successfully");

        Ok(strain)
    }

    #[instrument(skip(self))]
    pub async fn get_strain(&self, id: Uuid) -> Result<Option<StrainModel>, ServiceError> {
        StrainRepository::new(&*self.db_pool).find_by_id(id).await
    }

    /// Case-insensitive lookup by name
    #[instrument(skip(self))]
    pub async fn find_strain_by_name(
        &self,
        name: &str,
    ) -> Result<Option<StrainModel>, ServiceError> {
        StrainRepository::new(&*self.db_pool)
            .find_by_name_ci(name)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_strains(&self, active_only: bool) -> Result<Vec<StrainModel>, ServiceError> {
        StrainRepository::new(&*self.db_pool)
            .find_all(active_only)
            .await
    }

    #[instrument(skip(self))]
    pub async fn activate_strain(&self, id: Uuid) -> Result<StrainModel, ServiceError> {
        self.set_active(id, true).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate_strain(&self, id: Uuid) -> Result<StrainModel, ServiceError> {
        self.set_active(id, false).await
    }

    /// Finds a strain by name ignoring case and applies `changes`, or creates it.
    #[instrument(skip(self, changes))]
    pub async fn find_or_create_strain_by_name(
        &self,
        name: &str,
        changes: StrainChanges,
    ) -> Result<Upserted<StrainModel>, ServiceError> {
        changes.validate()?;
        let key = StrainName::new(name);

        let upserted = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let repo = StrainRepository::new(txn);
                upsert(&repo, &key, changes).await
            })
        })
        .await?;

        let event = if upserted.created() {
            Event::StrainCreated(upserted.record.id)
        } else {
            Event::StrainUpdated(upserted.record.id)
        };
        publish(&self.event_sender, event).await?;
        info!(strain_id = %upserted.record.id, outcome = %upserted.outcome, "Strain resolved by name");

        Ok(upserted)
    }

    /// Replaces both parent links.
    ///
    /// Parents must exist, and neither may be the strain itself or one of its descendants.
    #[instrument(skip(self))]
    pub async fn set_parents(
        &self,
        id: Uuid,
        parent_1: Option<Uuid>,
        parent_2: Option<Uuid>,
    ) -> Result<StrainModel, ServiceError> {
        let strain = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let repo = StrainRepository::new(txn);
                let strain = require(&repo, id).await?;

                for parent_id in parent_1.into_iter().chain(parent_2) {
                    if parent_id == id {
                        return Err(ServiceError::LineageCycle(id));
                    }
                    let parent = require(&repo, parent_id).await?;
                    if ancestors(&repo, &parent).await?.iter().any(|a| a.id == id) {
                        return Err(ServiceError::LineageCycle(id));
                    }
                }

                repo.set_parents(strain, parent_1, parent_2).await
            })
        })
        .await
        .map_err(|e| {
            if let ServiceError::LineageCycle(_) = e {
                warn!(strain_id = %id, "Rejected parent links that would form a cycle");
            }
            e
        })?;

        publish(&self.event_sender, Event::StrainUpdated(strain.id)).await?;
        info!(strain_id = %strain.id, "Strain lineage updated");

        Ok(strain)
    }

    /// Ancestors breadth-first: parents, then grandparents, each strain once
    #[instrument(skip(self))]
    pub async fn lineage(&self, id: Uuid) -> Result<Vec<StrainModel>, ServiceError> {
        let repo = StrainRepository::new(&*self.db_pool);
        let strain = require(&repo, id).await?;
        ancestors(&repo, &strain).await
    }

    /// Products linked to the strain, ordered by name
    #[instrument(skip(self))]
    pub async fn strain_products(&self, id: Uuid) -> Result<Vec<ProductModel>, ServiceError> {
        require(&StrainRepository::new(&*self.db_pool), id).await?;
        ProductRepository::new(&*self.db_pool)
            .find_by_strain(id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn recompute_strain_product_count(&self, id: Uuid) -> Result<i32, ServiceError> {
        require(&StrainRepository::new(&*self.db_pool), id).await?;
        refresh_strain_product_count(&*self.db_pool, id).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<StrainModel, ServiceError> {
        let repo = StrainRepository::new(&*self.db_pool);
        let strain = require(&repo, id).await?;
        let strain = repo.set_active(strain, active).await?;

        publish(&self.event_sender, Event::StrainUpdated(strain.id)).await?;
        info!(strain_id = %strain.id, active, "Strain active flag changed");

        Ok(strain)
    }
}

async fn require<C: ConnectionTrait>(
    repo: &StrainRepository<'_, C>,
    id: Uuid,
) -> Result<StrainModel, ServiceError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Strain with ID {} not found", id)))
}
