pub mod category;
pub mod common;
pub mod legacy_category;
pub mod subcategory;
pub mod tab;
pub mod todo;

pub use category::*;
pub use common::*;
pub use legacy_category::*;
pub use subcategory::*;
pub use tab::*;
pub use todo::*;
