pub mod images;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use images::*;
pub use memory::*;
pub use postgres::*;
pub use traits::*;
