pub mod category_handlers;
pub mod error;
pub mod extract;
pub mod form;
pub mod handlers;
pub mod legacy_category_handlers;
pub mod routes;
pub mod subcategory_handlers;
pub mod tab_handlers;
pub mod todo_handlers;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{AppContext, AppState};
pub use routes::*;
