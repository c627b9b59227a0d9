use crate::model::{
    Category, Id, LegacyCategory, NewCategory, NewLegacyCategory, NewSubcategory, NewTab,
    NewTodo, Subcategory, Tab, Todo,
};
use anyhow::Result;

/// Failures handlers need to tell apart from ordinary database errors.
///
/// Carried inside `anyhow::Error`; recover it with [`StoreError::from_anyhow`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A whole-record replace matched no row: the row was deleted, or (for
    /// versioned tables) someone else wrote it since it was read.
    #[error("{entity} {id} was modified or removed by another request")]
    Conflict { entity: &'static str, id: Id },
}

impl StoreError {
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&StoreError> {
        err.downcast_ref::<StoreError>()
    }

    pub fn is_conflict(err: &anyhow::Error) -> bool {
        matches!(Self::from_anyhow(err), Some(StoreError::Conflict { .. }))
    }
}

#[async_trait::async_trait]
pub trait TabStore: Send + Sync {
    async fn get_tab(&self, id: Id) -> Result<Option<Tab>>;
    async fn list_tabs(&self) -> Result<Vec<Tab>>;
    /// First tab whose url matches exactly
    async fn find_tab_by_url(&self, url: &str) -> Result<Option<Tab>>;
    /// First tab whose name matches exactly
    async fn find_tab_by_name(&self, name: &str) -> Result<Option<Tab>>;
    async fn insert_tab(&self, tab: NewTab) -> Result<Tab>;
    /// Writes every field of `tab`; `None` when the row no longer exists
    async fn update_tab(&self, tab: Tab) -> Result<Option<Tab>>;
    async fn delete_tab(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    async fn get_category(&self, id: Id) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    /// Categories whose parent tab name matches exactly (case-sensitive)
    async fn find_categories_by_tab(&self, tab_name: &str) -> Result<Vec<Category>>;
    async fn insert_category(&self, category: NewCategory) -> Result<Category>;
    async fn update_category(&self, category: Category) -> Result<Option<Category>>;
    async fn delete_category(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait SubcategoryStore: Send + Sync {
    async fn get_subcategory(&self, id: Id) -> Result<Option<Subcategory>>;
    async fn list_subcategories(&self) -> Result<Vec<Subcategory>>;
    /// Subcategories whose parent category name matches exactly (case-sensitive)
    async fn find_subcategories_by_category(&self, category: &str) -> Result<Vec<Subcategory>>;
    async fn insert_subcategory(&self, subcategory: NewSubcategory) -> Result<Subcategory>;
    async fn update_subcategory(&self, subcategory: Subcategory) -> Result<Option<Subcategory>>;
    async fn delete_subcategory(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait TodoStore: Send + Sync {
    async fn get_todo(&self, id: Id) -> Result<Option<Todo>>;
    async fn list_todos(&self) -> Result<Vec<Todo>>;
    async fn todo_exists(&self, id: Id) -> Result<bool>;
    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo>;
    /// Overwrites the stored record; fails with [`StoreError::Conflict`] when no row matched
    async fn replace_todo(&self, todo: Todo) -> Result<()>;
    async fn delete_todo(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait LegacyCategoryStore: Send + Sync {
    async fn get_legacy_category(&self, id: Id) -> Result<Option<LegacyCategory>>;
    async fn list_legacy_categories(&self) -> Result<Vec<LegacyCategory>>;
    /// Case-insensitive name lookup
    async fn find_legacy_category_by_name(&self, name: &str) -> Result<Option<LegacyCategory>>;
    async fn legacy_category_exists(&self, id: Id) -> Result<bool>;
    async fn insert_legacy_category(&self, category: NewLegacyCategory) -> Result<LegacyCategory>;
    /// Overwrites the record if its `row_version` is unchanged since it was read,
    /// returning the stored row with the bumped version. Fails with
    /// [`StoreError::Conflict`] otherwise.
    async fn replace_legacy_category(&self, category: LegacyCategory) -> Result<LegacyCategory>;
    async fn delete_legacy_category(&self, id: Id) -> Result<bool>;
}

pub trait Store:
    TabStore + CategoryStore + SubcategoryStore + TodoStore + LegacyCategoryStore + Send + Sync
{
}
