use crate::db::models::{Coffee, NewCoffee, NewPug, Pug, PugUpdate};
use crate::db::schema::{SQLITE_DROP, SQLITE_INIT};
use crate::error::CafeError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

const COFFEE_COLUMNS: &str = "id, name, ingredients, created_at, updated_at";
const PUG_COLUMNS: &str = "id, name, age, favorite_coffee_id, created_at, updated_at";

#[derive(Clone)]
pub struct CafeStorage {
    pool: SqlitePool,
}

impl CafeStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CafeError> {
        self.execute_script(SQLITE_INIT).await
    }

    /// Drop both tables and recreate them empty.
    pub async fn reset(&self) -> Result<(), CafeError> {
        self.execute_script(SQLITE_DROP).await?;
        self.init_schema().await
    }

    async fn execute_script(&self, script: &str) -> Result<(), CafeError> {
        // sqlx::query runs one statement at a time
        for stmt in script.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn list_coffees(&self) -> Result<Vec<Coffee>, CafeError> {
        let rows = sqlx::query(&format!("SELECT {COFFEE_COLUMNS} FROM coffees ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_coffee).collect()
    }

    pub async fn find_coffee_by_id(&self, id: i64) -> Result<Option<Coffee>, CafeError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_coffee(&mut conn, id).await
    }

    pub async fn find_coffee_by_name(&self, name: &str) -> Result<Option<Coffee>, CafeError> {
        sqlx::query(&format!("SELECT {COFFEE_COLUMNS} FROM coffees WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_coffee)
            .transpose()
    }

    /// Coffees whose ingredient list has an element exactly equal to `ingredient`.
    pub async fn find_coffees_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<Coffee>, CafeError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {COFFEE_COLUMNS} FROM coffees
               WHERE EXISTS (
                   SELECT 1 FROM json_each(coffees.ingredients)
                   WHERE json_each.value = ?
               )
               ORDER BY id"#
        ))
        .bind(ingredient)
        .fetch_all(&self.pool)
        .await?;
        debug!(ingredient, matches = rows.len(), "coffee ingredient lookup");
        rows.into_iter().map(Self::row_to_coffee).collect()
    }

    pub async fn create_coffee(&self, coffee: NewCoffee) -> Result<Coffee, CafeError> {
        let ingredients_json = serde_json::to_string(&coffee.ingredients)?;
        let now = Utc::now().to_rfc3339();
        let mut conn = self.pool.acquire().await?;
        let id = sqlx::query(
            "INSERT INTO coffees (name, ingredients, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(coffee.name)
        .bind(ingredients_json)
        .bind(&now)
        .bind(&now)
        .execute(&mut *conn)
        .await
        .map_err(CafeError::from_db)?
        .last_insert_rowid();

        Self::fetch_coffee(&mut conn, id)
            .await?
            .ok_or_else(|| CafeError::coffee_not_found(id))
    }

    pub async fn list_pugs(&self) -> Result<Vec<Pug>, CafeError> {
        let rows = sqlx::query(&format!("SELECT {PUG_COLUMNS} FROM pugs ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_pug).collect()
    }

    pub async fn find_pug_by_id(&self, id: i64) -> Result<Option<Pug>, CafeError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_pug(&mut conn, id).await
    }

    pub async fn find_pug_by_name(&self, name: &str) -> Result<Option<Pug>, CafeError> {
        sqlx::query(&format!(
            "SELECT {PUG_COLUMNS} FROM pugs WHERE name = ? ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .map(Self::row_to_pug)
        .transpose()
    }

    /// Pugs whose favorite coffee is named `coffee_name`.
    pub async fn find_pugs_by_coffee(&self, coffee_name: &str) -> Result<Vec<Pug>, CafeError> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.name, p.age, p.favorite_coffee_id, p.created_at, p.updated_at
               FROM pugs p
               JOIN coffees c ON c.id = p.favorite_coffee_id
               WHERE c.name = ?
               ORDER BY p.id"#,
        )
        .bind(coffee_name)
        .fetch_all(&self.pool)
        .await?;
        debug!(coffee_name, matches = rows.len(), "pug favorite coffee lookup");
        rows.into_iter().map(Self::row_to_pug).collect()
    }

    pub async fn create_pug(&self, pug: NewPug) -> Result<Pug, CafeError> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.pool.acquire().await?;
        let id = sqlx::query(
            r#"INSERT INTO pugs (name, age, favorite_coffee_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(pug.name)
        .bind(pug.age)
        .bind(pug.favorite_coffee_id)
        .bind(&now)
        .bind(&now)
        .execute(&mut *conn)
        .await
        .map_err(CafeError::from_db)?
        .last_insert_rowid();

        Self::fetch_pug(&mut conn, id)
            .await?
            .ok_or_else(|| CafeError::pug_not_found(id))
    }

    /// Apply a partial update in a single statement and return the stored row.
    ///
    /// Absent fields keep their column value; the CASE flags carry whether
    /// `age` and `favorite_coffee_id` were sent at all.
    pub async fn update_pug(&self, id: i64, update: PugUpdate) -> Result<Pug, CafeError> {
        let PugUpdate {
            name,
            age,
            favorite_coffee_id,
        } = update;

        sqlx::query(&format!(
            r#"UPDATE pugs SET
                name = COALESCE(?, name),
                age = CASE WHEN ? THEN ? ELSE age END,
                favorite_coffee_id = CASE WHEN ? THEN ? ELSE favorite_coffee_id END,
                updated_at = ?
              WHERE id = ?
              RETURNING {PUG_COLUMNS}"#
        ))
        .bind(name)
        .bind(age.is_some())
        .bind(age.flatten())
        .bind(favorite_coffee_id.is_some())
        .bind(favorite_coffee_id.flatten())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CafeError::from_db)?
        .map(Self::row_to_pug)
        .transpose()?
        .ok_or_else(|| CafeError::pug_not_found(id))
    }

    pub async fn delete_pug(&self, id: i64) -> Result<(), CafeError> {
        let result = sqlx::query("DELETE FROM pugs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CafeError::pug_not_found(id));
        }
        Ok(())
    }

    /// Point a pug at a coffee, or detach it with `None`.
    pub async fn set_favorite_coffee(
        &self,
        pug_id: i64,
        coffee_id: Option<i64>,
    ) -> Result<Pug, CafeError> {
        self.update_pug(pug_id, PugUpdate::favorite_coffee(coffee_id)).await
    }

    pub async fn favorite_coffee(&self, pug_id: i64) -> Result<Option<Coffee>, CafeError> {
        let mut conn = self.pool.acquire().await?;
        let pug = Self::fetch_pug(&mut conn, pug_id)
            .await?
            .ok_or_else(|| CafeError::pug_not_found(pug_id))?;
        match pug.favorite_coffee_id {
            Some(coffee_id) => Self::fetch_coffee(&mut conn, coffee_id).await,
            None => Ok(None),
        }
    }

    async fn fetch_coffee(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Coffee>, CafeError> {
        sqlx::query(&format!("SELECT {COFFEE_COLUMNS} FROM coffees WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await?
            .map(Self::row_to_coffee)
            .transpose()
    }

    async fn fetch_pug(conn: &mut SqliteConnection, id: i64) -> Result<Option<Pug>, CafeError> {
        sqlx::query(&format!("SELECT {PUG_COLUMNS} FROM pugs WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await?
            .map(Self::row_to_pug)
            .transpose()
    }

    fn row_to_coffee(row: SqliteRow) -> Result<Coffee, CafeError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let ingredients_json: String = row.try_get("ingredients")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let ingredients: Vec<String> = serde_json::from_str(&ingredients_json)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Coffee {
            id,
            name,
            ingredients,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_pug(row: SqliteRow) -> Result<Pug, CafeError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let age: Option<i64> = row.try_get("age")?;
        let favorite_coffee_id: Option<i64> = row.try_get("favorite_coffee_id")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Pug {
            id,
            name,
            age,
            favorite_coffee_id,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CafeError> {
    let parsed =
        DateTime::parse_from_rfc3339(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(parsed.with_timezone(&Utc))
}
