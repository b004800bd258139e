//! `gearbook-catalog`: accessory types, brands and models.
//!
//! Each catalog is a zero-sized marker implementing [`gearbook_core::Resource`];
//! the generic client and manager do the rest.

pub mod accessory_type;
pub mod brand;
pub mod model;
pub mod named;

pub use accessory_type::{AccessoryType, AccessoryTypeFields, AccessoryTypes};
pub use brand::Brands;
pub use model::Models;
pub use named::{NameFields, NamedRecord};
