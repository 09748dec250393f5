//! Find-or-create by natural key.
//!
//! [`upsert`] looks a record up by its natural key through an [`UpsertRepository`],
//! applies a partial update when it exists and creates it otherwise.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::repositories::UpsertRepository;

/// A business identifier used to correlate an external record with a stored one.
pub trait NaturalKey: fmt::Display {
    /// Entity label used in logs and metrics
    const ENTITY: &'static str;

    /// Components of the key as (field, value) pairs.
    fn parts(&self) -> Vec<(&'static str, &str)>;

    /// Rejects keys with an empty or whitespace-only component.
    fn validate(&self) -> Result<(), ServiceError> {
        for (field, value) in self.parts() {
            if value.trim().is_empty() {
                return Err(ServiceError::InvalidKey(format!(
                    "{} key field `{}` is empty",
                    Self::ENTITY,
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Brand name; matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrandName(pub String);

/// Strain name; matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrainName(pub String);

/// External Dutchie product id; matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutchieProductId(pub String);

/// External SKU at an external location; both parts matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkuLocation {
    pub sku: String,
    pub location_id: String,
}

impl BrandName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StrainName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DutchieProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SkuLocation {
    pub fn new(sku: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            location_id: location_id.into(),
        }
    }
}

impl fmt::Display for BrandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StrainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DutchieProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SkuLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.sku, self.location_id)
    }
}

impl NaturalKey for BrandName {
    const ENTITY: &'static str = "brand";

    fn parts(&self) -> Vec<(&'static str, &str)> {
        vec![("name", &self.0)]
    }
}

impl NaturalKey for StrainName {
    const ENTITY: &'static str = "strain";

    fn parts(&self) -> Vec<(&'static str, &str)> {
        vec![("name", &self.0)]
    }
}

impl NaturalKey for DutchieProductId {
    const ENTITY: &'static str = "product";

    fn parts(&self) -> Vec<(&'static str, &str)> {
        vec![("dutchie_product_id", &self.0)]
    }
}

impl NaturalKey for SkuLocation {
    const ENTITY: &'static str = "product_variant";

    fn parts(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("dutchie_sku", &self.sku),
            ("dutchie_location_id", &self.location_id),
        ]
    }
}

/// Fails with [`ServiceError::InvalidKey`] when a payload sets key field `field` to
/// something other than the key's own value.
pub(crate) fn ensure_key_field(
    entity: &str,
    field: &str,
    expected: &str,
    given: Option<&str>,
) -> Result<(), ServiceError> {
    match given {
        Some(value) if value != expected => Err(ServiceError::InvalidKey(format!(
            "{} payload sets `{}` to `{}` but the key is `{}`",
            entity, field, value, expected
        ))),
        _ => Ok(()),
    }
}

/// Whether an upsert matched an existing record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Record returned by [`upsert`] along with what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upserted<T> {
    pub record: T,
    pub outcome: UpsertOutcome,
}

impl<T> Upserted<T> {
    pub fn created(&self) -> bool {
        self.outcome == UpsertOutcome::Created
    }

    pub fn into_record(self) -> T {
        self.record
    }
}

/// Finds the record matching `key` and applies `changes`, or creates one.
///
/// Empty key components fail with [`ServiceError::InvalidKey`] before the store is touched,
/// as do payloads whose key fields disagree with `key`.
/// When several records match, the repository's first match wins.
pub async fn upsert<R>(
    repo: &R,
    key: &R::Key,
    changes: R::Changes,
) -> Result<Upserted<R::Record>, ServiceError>
where
    R: UpsertRepository,
{
    upsert_with_previous(repo, key, changes)
        .await
        .map(|(upserted, _)| upserted)
}

/// Same as [`upsert`], also returning the matched record as it was before the update.
#[instrument(skip_all, fields(entity = <R::Key as NaturalKey>::ENTITY, key = %key))]
pub async fn upsert_with_previous<R>(
    repo: &R,
    key: &R::Key,
    changes: R::Changes,
) -> Result<(Upserted<R::Record>, Option<R::Record>), ServiceError>
where
    R: UpsertRepository,
{
    let entity = <R::Key as NaturalKey>::ENTITY;
    key.validate()
        .and_then(|_| repo.check_key_fields(key, &changes))
        .map_err(|e| {
            counter!("mint_cannabis.upsert.invalid_key", 1, "entity" => entity);
            e
        })?;

    let (record, outcome, previous) = match repo.find_by_key(key).await? {
        Some(existing) => {
            let previous = existing.clone();
            let record = repo.update(existing, changes).await?;
            (record, UpsertOutcome::Updated, Some(previous))
        }
        None => (repo.create(key, changes).await?, UpsertOutcome::Created, None),
    };

    let outcome_label: &'static str = outcome.into();
    counter!("mint_cannabis.upsert.total", 1, "entity" => entity, "outcome" => outcome_label);
    debug!(%outcome, "Upsert resolved");

    Ok((Upserted { record, outcome }, previous))
}
