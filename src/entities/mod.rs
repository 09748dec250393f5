pub mod brand;
pub mod product_template;
pub mod product_variant;
pub mod strain;

pub use brand::{Entity as Brand, Model as BrandModel};
pub use product_template::{Entity as Product, Model as ProductModel};
pub use product_variant::{Entity as ProductVariant, Model as ProductVariantModel};
pub use strain::{Entity as Strain, Model as StrainModel};

/// Case-folded form of a brand or strain name, stored as `name_key` and used for lookups.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}
