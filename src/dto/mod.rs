//! Typed partial-update payloads.
//!
//! Every field is optional; `None` leaves the stored value untouched.

use validator::ValidationError;

/// Copies each present field of a payload onto an active model.
///
/// Works for both required and nullable columns: `T` converts into `T` and into `Option<T>`.
macro_rules! set_present {
    ($changes:ident => $model:ident: $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $changes.$field {
                $model.$field = ::sea_orm::ActiveValue::Set(value.into());
            }
        )+
    };
}

pub mod brand;
pub mod product;
pub mod strain;
pub mod variant;

pub use brand::BrandChanges;
pub use product::ProductChanges;
pub use strain::StrainChanges;
pub use variant::VariantChanges;

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must contain non-whitespace characters".into());
        return Err(err);
    }
    Ok(())
}

/// Serializes a list of strings into the text form stored in JSON columns.
pub(crate) fn json_list(values: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(values)
}
