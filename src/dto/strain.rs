use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::validate_not_blank;
use crate::entities::strain::{ActiveModel, StrainType, Terpene};

/// Partial update for a strain. Lineage is changed through `StrainService::set_parents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct StrainChanges {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    pub active: Option<bool>,
    pub strain_type: Option<StrainType>,
    pub genetics: Option<String>,
    pub breeder: Option<String>,

    pub effects: Option<String>,
    pub medical_uses: Option<String>,
    pub flavors: Option<String>,
    pub aromas: Option<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub typical_thc_min: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub typical_thc_max: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub typical_cbd_min: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub typical_cbd_max: Option<f64>,

    pub dominant_terpene: Option<Terpene>,
    /// Terpene name to percentage
    pub terpene_profile: Option<Map<String, Value>>,

    pub description: Option<String>,
    pub notes: Option<String>,
}

impl StrainChanges {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn apply(self, model: &mut ActiveModel) -> Result<(), serde_json::Error> {
        if let Some(profile) = &self.terpene_profile {
            model.terpene_profile = Set(Some(serde_json::to_string(profile)?));
        }

        let changes = self;
        set_present!(changes => model:
            name,
            active,
            strain_type,
            genetics,
            breeder,
            effects,
            medical_uses,
            flavors,
            aromas,
            typical_thc_min,
            typical_thc_max,
            typical_cbd_min,
            typical_cbd_max,
            dominant_terpene,
            description,
            notes,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;
    use serde_json::json;

    #[test]
    fn terpene_profile_is_stored_as_json_text() {
        let mut profile = Map::new();
        profile.insert("myrcene".into(), json!(0.8));

        let mut model = <ActiveModel as Default>::default();
        StrainChanges {
            terpene_profile: Some(profile),
            strain_type: Some(StrainType::Indica),
            ..Default::default()
        }
        .apply(&mut model)
        .unwrap();

        assert_eq!(
            model.terpene_profile,
            ActiveValue::Set(Some(r#"{"myrcene":0.8}"#.to_string()))
        );
        assert_eq!(model.strain_type, ActiveValue::Set(StrainType::Indica));
        assert!(matches!(model.name, ActiveValue::NotSet));
    }

    #[test]
    fn potency_ranges_are_percentages() {
        let changes = StrainChanges {
            typical_thc_max: Some(140.0),
            ..StrainChanges::named("Blue Dream")
        };
        assert!(changes.validate().is_err());
    }
}
