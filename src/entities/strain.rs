use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary classification of a strain.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrainType {
    #[sea_orm(string_value = "indica")]
    Indica,
    #[sea_orm(string_value = "sativa")]
    Sativa,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
    #[sea_orm(string_value = "hybrid_indica")]
    HybridIndica,
    #[sea_orm(string_value = "hybrid_sativa")]
    HybridSativa,
    #[sea_orm(string_value = "cbd")]
    Cbd,
    #[sea_orm(string_value = "high_cbd")]
    HighCbd,
}

impl Default for StrainType {
    fn default() -> Self {
        Self::Hybrid
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Terpene {
    #[sea_orm(string_value = "myrcene")]
    Myrcene,
    #[sea_orm(string_value = "limonene")]
    Limonene,
    #[sea_orm(string_value = "caryophyllene")]
    Caryophyllene,
    #[sea_orm(string_value = "pinene")]
    Pinene,
    #[sea_orm(string_value = "linalool")]
    Linalool,
    #[sea_orm(string_value = "humulene")]
    Humulene,
    #[sea_orm(string_value = "terpinolene")]
    Terpinolene,
    #[sea_orm(string_value = "ocimene")]
    Ocimene,
}

/// Cannabis strain master data: genetics, effects and typical potency.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cannabis_strains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,
    /// Lowercased `name`, kept in step by `before_save`
    #[sea_orm(indexed)]
    pub name_key: String,
    pub active: bool,
    pub strain_type: StrainType,

    /// Lineage links into this same table. Cycles are rejected by `StrainService::set_parents`.
    pub parent_strain_1_id: Option<Uuid>,
    pub parent_strain_2_id: Option<Uuid>,
    pub genetics: Option<String>,
    pub breeder: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub effects: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub medical_uses: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub flavors: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub aromas: Option<String>,

    pub typical_thc_min: Option<f64>,
    pub typical_thc_max: Option<f64>,
    pub typical_cbd_min: Option<f64>,
    pub typical_cbd_max: Option<f64>,

    pub dominant_terpene: Option<Terpene>,
    /// JSON object of terpene name to percentage
    #[sea_orm(column_type = "Text", nullable)]
    pub terpene_profile: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub product_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Parent ids in declaration order, skipping unset links.
    pub fn parent_ids(&self) -> Vec<Uuid> {
        self.parent_strain_1_id
            .into_iter()
            .chain(self.parent_strain_2_id)
            .collect()
    }

    /// Parsed `terpene_profile`; `None` when the column is empty.
    pub fn terpene_profile_map(
        &self,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>, serde_json::Error> {
        self.terpene_profile
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_template::Entity")]
    Products,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentStrain1Id",
        to = "Column::Id"
    )]
    ParentStrain1,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentStrain2Id",
        to = "Column::Id"
    )]
    ParentStrain2,
}

impl Related<super::product_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
            if let ActiveValue::NotSet = active_model.active {
                active_model.active = Set(true);
            }
            if let ActiveValue::NotSet = active_model.strain_type {
                active_model.strain_type = Set(StrainType::default());
            }
            if let ActiveValue::NotSet = active_model.product_count {
                active_model.product_count = Set(0);
            }
            active_model.created_at = Set(now);
        }

        if let ActiveValue::Set(ref name) = active_model.name {
            active_model.name_key = Set(super::fold_name(name));
        }
        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strain(profile: Option<&str>) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Blue Dream".into(),
            name_key: "blue dream".into(),
            active: true,
            strain_type: StrainType::HybridSativa,
            parent_strain_1_id: None,
            parent_strain_2_id: Some(Uuid::nil()),
            genetics: None,
            breeder: None,
            effects: None,
            medical_uses: None,
            flavors: None,
            aromas: None,
            typical_thc_min: Some(17.0),
            typical_thc_max: Some(24.0),
            typical_cbd_min: None,
            typical_cbd_max: None,
            dominant_terpene: Some(Terpene::Myrcene),
            terpene_profile: profile.map(str::to_string),
            description: None,
            notes: None,
            product_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parent_ids_skips_unset_links() {
        assert_eq!(strain(None).parent_ids(), vec![Uuid::nil()]);
    }

    #[test]
    fn terpene_profile_parses_json_object() {
        let model = strain(Some(r#"{"myrcene": 0.8, "pinene": 0.2}"#));
        let profile = model.terpene_profile_map().unwrap().unwrap();
        assert_eq!(profile.get("myrcene").and_then(|v| v.as_f64()), Some(0.8));
        assert!(strain(None).terpene_profile_map().unwrap().is_none());
        assert!(strain(Some("not json")).terpene_profile_map().is_err());
    }

    #[test]
    fn strain_type_uses_snake_case_names() {
        assert_eq!(StrainType::HybridIndica.to_string(), "hybrid_indica");
        assert_eq!("high_cbd".parse::<StrainType>().unwrap(), StrainType::HighCbd);
    }
}
