use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::model::{
    Category, Id, LegacyCategory, NewCategory, NewLegacyCategory, NewSubcategory, NewTab,
    NewTodo, Subcategory, Tab, Todo,
};
use crate::store::traits::{
    CategoryStore, LegacyCategoryStore, Store, StoreError, SubcategoryStore, TabStore, TodoStore,
};

const TAB_COLUMNS: &str = "id, name, description, url";
const CATEGORY_COLUMNS: &str = "id, title, description, url, start_date, end_date, tabs, image_path";
const SUBCATEGORY_COLUMNS: &str =
    "id, heading, title, description, start_date, end_date, category, image_path";
const TODO_COLUMNS: &str = "id, name, description";
const LEGACY_CATEGORY_COLUMNS: &str = "id, name, description, url, row_version";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded migrations in `./migrations`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        log::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl TabStore for PostgresStore {
    async fn get_tab(&self, id: Id) -> Result<Option<Tab>> {
        sqlx::query_as::<_, Tab>(&format!("SELECT {TAB_COLUMNS} FROM tabs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch tab")
    }

    async fn list_tabs(&self) -> Result<Vec<Tab>> {
        sqlx::query_as::<_, Tab>(&format!("SELECT {TAB_COLUMNS} FROM tabs"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tabs")
    }

    async fn find_tab_by_url(&self, url: &str) -> Result<Option<Tab>> {
        sqlx::query_as::<_, Tab>(&format!(
            "SELECT {TAB_COLUMNS} FROM tabs WHERE url = $1 ORDER BY id LIMIT 1"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch tab by url")
    }

    async fn find_tab_by_name(&self, name: &str) -> Result<Option<Tab>> {
        sqlx::query_as::<_, Tab>(&format!(
            "SELECT {TAB_COLUMNS} FROM tabs WHERE name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch tab by name")
    }

    async fn insert_tab(&self, tab: NewTab) -> Result<Tab> {
        sqlx::query_as::<_, Tab>(&format!(
            "INSERT INTO tabs (name, description, url) VALUES ($1, $2, $3) RETURNING {TAB_COLUMNS}"
        ))
        .bind(tab.name)
        .bind(tab.description)
        .bind(tab.url)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert tab")
    }

    async fn update_tab(&self, tab: Tab) -> Result<Option<Tab>> {
        sqlx::query_as::<_, Tab>(&format!(
            r#"
            UPDATE tabs SET name = $2, description = $3, url = $4
            WHERE id = $1
            RETURNING {TAB_COLUMNS}
            "#
        ))
        .bind(tab.id)
        .bind(tab.name)
        .bind(tab.description)
        .bind(tab.url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update tab")
    }

    async fn delete_tab(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tabs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tab")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl CategoryStore for PostgresStore {
    async fn get_category(&self, id: Id) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!("SELECT {CATEGORY_COLUMNS} FROM category"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")
    }

    async fn find_categories_by_tab(&self, tab_name: &str) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE tabs = $1"
        ))
        .bind(tab_name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories for tab")
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO category (title, description, url, start_date, end_date, tabs, image_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.title)
        .bind(category.description)
        .bind(category.url)
        .bind(category.start_date)
        .bind(category.end_date)
        .bind(category.tabs)
        .bind(category.image_path)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert category")
    }

    async fn update_category(&self, category: Category) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE category SET
                title = $2,
                description = $3,
                url = $4,
                start_date = $5,
                end_date = $6,
                tabs = $7,
                image_path = $8
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.id)
        .bind(category.title)
        .bind(category.description)
        .bind(category.url)
        .bind(category.start_date)
        .bind(category.end_date)
        .bind(category.tabs)
        .bind(category.image_path)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update category")
    }

    async fn delete_category(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl SubcategoryStore for PostgresStore {
    async fn get_subcategory(&self, id: Id) -> Result<Option<Subcategory>> {
        sqlx::query_as::<_, Subcategory>(&format!(
            "SELECT {SUBCATEGORY_COLUMNS} FROM subcategory WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch subcategory")
    }

    async fn list_subcategories(&self) -> Result<Vec<Subcategory>> {
        sqlx::query_as::<_, Subcategory>(&format!("SELECT {SUBCATEGORY_COLUMNS} FROM subcategory"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list subcategories")
    }

    async fn find_subcategories_by_category(&self, category: &str) -> Result<Vec<Subcategory>> {
        sqlx::query_as::<_, Subcategory>(&format!(
            "SELECT {SUBCATEGORY_COLUMNS} FROM subcategory WHERE category = $1"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list subcategories for category")
    }

    async fn insert_subcategory(&self, subcategory: NewSubcategory) -> Result<Subcategory> {
        sqlx::query_as::<_, Subcategory>(&format!(
            r#"
            INSERT INTO subcategory (heading, title, description, start_date, end_date, category, image_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SUBCATEGORY_COLUMNS}
            "#
        ))
        .bind(subcategory.heading)
        .bind(subcategory.title)
        .bind(subcategory.description)
        .bind(subcategory.start_date)
        .bind(subcategory.end_date)
        .bind(subcategory.category)
        .bind(subcategory.image_path)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert subcategory")
    }

    async fn update_subcategory(&self, subcategory: Subcategory) -> Result<Option<Subcategory>> {
        sqlx::query_as::<_, Subcategory>(&format!(
            r#"
            UPDATE subcategory SET
                heading = $2,
                title = $3,
                description = $4,
                start_date = $5,
                end_date = $6,
                category = $7,
                image_path = $8
            WHERE id = $1
            RETURNING {SUBCATEGORY_COLUMNS}
            "#
        ))
        .bind(subcategory.id)
        .bind(subcategory.heading)
        .bind(subcategory.title)
        .bind(subcategory.description)
        .bind(subcategory.start_date)
        .bind(subcategory.end_date)
        .bind(subcategory.category)
        .bind(subcategory.image_path)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update subcategory")
    }

    async fn delete_subcategory(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subcategory WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete subcategory")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TodoStore for PostgresStore {
    async fn get_todo(&self, id: Id) -> Result<Option<Todo>> {
        sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch todo")
    }

    async fn list_todos(&self) -> Result<Vec<Todo>> {
        sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list todos")
    }

    async fn todo_exists(&self, id: Id) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM todos WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check todo existence")
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo> {
        sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (name, description) VALUES ($1, $2) RETURNING {TODO_COLUMNS}"
        ))
        .bind(todo.name)
        .bind(todo.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert todo")
    }

    async fn replace_todo(&self, todo: Todo) -> Result<()> {
        let result = sqlx::query("UPDATE todos SET name = $2, description = $3 WHERE id = $1")
            .bind(todo.id)
            .bind(todo.name)
            .bind(todo.description)
            .execute(&self.pool)
            .await
            .context("Failed to update todo")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict {
                entity: "todo",
                id: todo.id,
            }
            .into());
        }

        Ok(())
    }

    async fn delete_todo(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete todo")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl LegacyCategoryStore for PostgresStore {
    async fn get_legacy_category(&self, id: Id) -> Result<Option<LegacyCategory>> {
        sqlx::query_as::<_, LegacyCategory>(&format!(
            "SELECT {LEGACY_CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")
    }

    async fn list_legacy_categories(&self) -> Result<Vec<LegacyCategory>> {
        sqlx::query_as::<_, LegacyCategory>(&format!(
            "SELECT {LEGACY_CATEGORY_COLUMNS} FROM categories"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")
    }

    async fn find_legacy_category_by_name(&self, name: &str) -> Result<Option<LegacyCategory>> {
        sqlx::query_as::<_, LegacyCategory>(&format!(
            "SELECT {LEGACY_CATEGORY_COLUMNS} FROM categories WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category by name")
    }

    async fn legacy_category_exists(&self, id: Id) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check category existence")
    }

    async fn insert_legacy_category(&self, category: NewLegacyCategory) -> Result<LegacyCategory> {
        sqlx::query_as::<_, LegacyCategory>(&format!(
            r#"
            INSERT INTO categories (name, description, url)
            VALUES ($1, $2, $3)
            RETURNING {LEGACY_CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.name)
        .bind(category.description)
        .bind(category.url)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert category")
    }

    async fn replace_legacy_category(&self, category: LegacyCategory) -> Result<LegacyCategory> {
        let id = category.id;
        let stored = sqlx::query_as::<_, LegacyCategory>(&format!(
            r#"
            UPDATE categories SET
                name = $2,
                description = $3,
                url = $4,
                row_version = row_version + 1
            WHERE id = $1 AND row_version = $5
            RETURNING {LEGACY_CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.id)
        .bind(category.name)
        .bind(category.description)
        .bind(category.url)
        .bind(category.row_version)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update category")?;

        stored.ok_or_else(|| {
            StoreError::Conflict {
                entity: "category",
                id,
            }
            .into()
        })
    }

    async fn delete_legacy_category(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
