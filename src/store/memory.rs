use anyhow::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::model::{
    Category, Id, LegacyCategory, NewCategory, NewLegacyCategory, NewSubcategory, NewTab,
    NewTodo, Subcategory, Tab, Todo,
};
use crate::store::traits::{
    CategoryStore, LegacyCategoryStore, Store, StoreError, SubcategoryStore, TabStore, TodoStore,
};

/// One table: rows keyed by id plus the next value of its id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn get(&self, id: Id) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| predicate(row)).cloned().collect()
    }

    fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.rows.values().find(|row| predicate(row)).cloned()
    }

    fn insert_with(&mut self, build: impl FnOnce(Id) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    /// Replaces an existing row; `None` if there is nothing to replace.
    fn replace(&mut self, id: Id, row: T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = row.clone();
        Some(row)
    }

    fn remove(&mut self, id: Id) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug)]
struct Tables {
    tabs: Table<Tab>,
    categories: Table<Category>,
    subcategories: Table<Subcategory>,
    todos: Table<Todo>,
    legacy_categories: Table<LegacyCategory>,
}

/// Process-local store with the same semantics as [`crate::store::PostgresStore`].
///
/// Used by the test suites and by `database.backend = "memory"`.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                tabs: Table::new(),
                categories: Table::new(),
                subcategories: Table::new(),
                todos: Table::new(),
                legacy_categories: Table::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TabStore for MemoryStore {
    async fn get_tab(&self, id: Id) -> Result<Option<Tab>> {
        Ok(self.tables.read().tabs.get(id))
    }

    async fn list_tabs(&self) -> Result<Vec<Tab>> {
        Ok(self.tables.read().tabs.all())
    }

    async fn find_tab_by_url(&self, url: &str) -> Result<Option<Tab>> {
        Ok(self.tables.read().tabs.find(|tab| tab.url == url))
    }

    async fn find_tab_by_name(&self, name: &str) -> Result<Option<Tab>> {
        Ok(self.tables.read().tabs.find(|tab| tab.name == name))
    }

    async fn insert_tab(&self, tab: NewTab) -> Result<Tab> {
        Ok(self.tables.write().tabs.insert_with(|id| tab.into_tab(id)))
    }

    async fn update_tab(&self, tab: Tab) -> Result<Option<Tab>> {
        Ok(self.tables.write().tabs.replace(tab.id, tab))
    }

    async fn delete_tab(&self, id: Id) -> Result<bool> {
        Ok(self.tables.write().tabs.remove(id))
    }
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn get_category(&self, id: Id) -> Result<Option<Category>> {
        Ok(self.tables.read().categories.get(id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.tables.read().categories.all())
    }

    async fn find_categories_by_tab(&self, tab_name: &str) -> Result<Vec<Category>> {
        Ok(self
            .tables
            .read()
            .categories
            .filter(|category| category.tabs == tab_name))
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category> {
        Ok(self
            .tables
            .write()
            .categories
            .insert_with(|id| category.into_category(id)))
    }

    async fn update_category(&self, category: Category) -> Result<Option<Category>> {
        Ok(self.tables.write().categories.replace(category.id, category))
    }

    async fn delete_category(&self, id: Id) -> Result<bool> {
        Ok(self.tables.write().categories.remove(id))
    }
}

#[async_trait::async_trait]
impl SubcategoryStore for MemoryStore {
    async fn get_subcategory(&self, id: Id) -> Result<Option<Subcategory>> {
        Ok(self.tables.read().subcategories.get(id))
    }

    async fn list_subcategories(&self) -> Result<Vec<Subcategory>> {
        Ok(self.tables.read().subcategories.all())
    }

    async fn find_subcategories_by_category(&self, category: &str) -> Result<Vec<Subcategory>> {
        Ok(self
            .tables
            .read()
            .subcategories
            .filter(|subcategory| subcategory.category == category))
    }

    async fn insert_subcategory(&self, subcategory: NewSubcategory) -> Result<Subcategory> {
        Ok(self
            .tables
            .write()
            .subcategories
            .insert_with(|id| subcategory.into_subcategory(id)))
    }

    async fn update_subcategory(&self, subcategory: Subcategory) -> Result<Option<Subcategory>> {
        Ok(self
            .tables
            .write()
            .subcategories
            .replace(subcategory.id, subcategory))
    }

    async fn delete_subcategory(&self, id: Id) -> Result<bool> {
        Ok(self.tables.write().subcategories.remove(id))
    }
}

#[async_trait::async_trait]
impl TodoStore for MemoryStore {
    async fn get_todo(&self, id: Id) -> Result<Option<Todo>> {
        Ok(self.tables.read().todos.get(id))
    }

    async fn list_todos(&self) -> Result<Vec<Todo>> {
        Ok(self.tables.read().todos.all())
    }

    async fn todo_exists(&self, id: Id) -> Result<bool> {
        Ok(self.tables.read().todos.rows.contains_key(&id))
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo> {
        Ok(self.tables.write().todos.insert_with(|id| todo.into_todo(id)))
    }

    async fn replace_todo(&self, todo: Todo) -> Result<()> {
        let id = todo.id;
        match self.tables.write().todos.replace(id, todo) {
            Some(_) => Ok(()),
            None => Err(StoreError::Conflict { entity: "todo", id }.into()),
        }
    }

    async fn delete_todo(&self, id: Id) -> Result<bool> {
        Ok(self.tables.write().todos.remove(id))
    }
}

#[async_trait::async_trait]
impl LegacyCategoryStore for MemoryStore {
    async fn get_legacy_category(&self, id: Id) -> Result<Option<LegacyCategory>> {
        Ok(self.tables.read().legacy_categories.get(id))
    }

    async fn list_legacy_categories(&self) -> Result<Vec<LegacyCategory>> {
        Ok(self.tables.read().legacy_categories.all())
    }

    async fn find_legacy_category_by_name(&self, name: &str) -> Result<Option<LegacyCategory>> {
        let name = name.to_lowercase();
        Ok(self
            .tables
            .read()
            .legacy_categories
            .find(|category| category.name.to_lowercase() == name))
    }

    async fn legacy_category_exists(&self, id: Id) -> Result<bool> {
        Ok(self.tables.read().legacy_categories.rows.contains_key(&id))
    }

    async fn insert_legacy_category(&self, category: NewLegacyCategory) -> Result<LegacyCategory> {
        Ok(self
            .tables
            .write()
            .legacy_categories
            .insert_with(|id| category.into_legacy_category(id)))
    }

    async fn replace_legacy_category(&self, category: LegacyCategory) -> Result<LegacyCategory> {
        let id = category.id;
        let mut tables = self.tables.write();
        let current_version = tables.legacy_categories.rows.get(&id).map(|c| c.row_version);

        if current_version != Some(category.row_version) {
            return Err(StoreError::Conflict {
                entity: "category",
                id,
            }
            .into());
        }

        let stored = LegacyCategory {
            row_version: category.row_version + 1,
            ..category
        };
        tables.legacy_categories.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_legacy_category(&self, id: Id) -> Result<bool> {
        Ok(self.tables.write().legacy_categories.remove(id))
    }
}

impl Store for MemoryStore {}
