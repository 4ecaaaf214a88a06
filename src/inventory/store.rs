//! SQLite-backed inventory store
//!
//! A single connection sits behind a mutex; every call hops onto tokio's
//! blocking pool. Multi-statement operations (force delete, bulk deletes,
//! item updates) run inside one transaction.
//!
//! `status` and `daysUntilExpiry` are written alongside each item but are
//! re-derived from the store clock on every read, so callers never see a
//! stale label.

use crate::error::{Error, Result};
use crate::expiry::{classify, Clock, ExpiryThresholds};
use crate::inventory::schema;
use crate::inventory::types::*;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

const ITEM_SELECT: &str = "
    SELECT i.id AS id, i.name AS name, i.volume AS volume,
           i.volume_unit AS volume_unit, i.expiry_date AS expiry_date,
           i.notes AS notes, i.category_id AS category_id,
           i.date_added AS date_added, c.name AS category_name
    FROM food_items i
    JOIN categories c ON c.id = i.category_id";

/// Time and thresholds captured once per store call
#[derive(Debug, Clone, Copy)]
struct Derive {
    now: DateTime<Utc>,
    thresholds: ExpiryThresholds,
}

/// Inventory persistence
pub struct InventoryStore {
    conn: Arc<Mutex<Connection>>,
    thresholds: ExpiryThresholds,
    clock: Arc<dyn Clock>,
}

impl InventoryStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path, thresholds: ExpiryThresholds, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = schema::open_connection(path)?;
        Ok(Self::from_connection(conn, thresholds, clock))
    }

    /// Open a private in-memory database
    pub fn open_in_memory(thresholds: ExpiryThresholds, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = schema::open_in_memory()?;
        Ok(Self::from_connection(conn, thresholds, clock))
    }

    fn from_connection(
        conn: Connection,
        thresholds: ExpiryThresholds,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            thresholds,
            clock,
        }
    }

    /// Thresholds used for every derived field
    pub fn thresholds(&self) -> ExpiryThresholds {
        self.thresholds
    }

    /// Current time according to the store clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn with_conn<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, Derive) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let derive = Derive {
            now: self.clock.now(),
            thresholds: self.thresholds,
        };

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| Error::Internal("Database lock poisoned".to_string()))?;
            work(&mut guard, derive)
        })
        .await
        .map_err(|e| Error::Internal(format!("Database task failed: {}", e)))?
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories, ordered by name
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.with_conn(|conn, _| {
            let mut stmt = conn
                .prepare("SELECT id, name FROM categories ORDER BY name COLLATE NOCASE, id")?;
            let rows = stmt.query_map([], category_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// All categories with the number of items each owns, ordered by name
    pub async fn list_category_summaries(&self) -> Result<Vec<CategorySummary>> {
        self.with_conn(|conn, _| {
            let mut stmt = conn.prepare(
                "SELECT c.id AS id, c.name AS name, COUNT(i.id) AS item_count
                 FROM categories c
                 LEFT JOIN food_items i ON i.category_id = c.id
                 GROUP BY c.id, c.name
                 ORDER BY c.name COLLATE NOCASE, c.id",
            )?;
            let rows = stmt.query_map([], summary_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.with_conn(move |conn, _| {
            find_category(conn, id)?.ok_or_else(|| Error::NotFound("Category not found".to_string()))
        })
        .await
    }

    /// Create a category; the name must be unique
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim().to_string();
        self.with_conn(move |conn, _| {
            conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
                .map_err(|e| unique_as_conflict(e, "Category already exists"))?;
            let id = conn.last_insert_rowid();
            tracing::debug!(id, name = %name, "Category created");
            Ok(Category { id, name })
        })
        .await
    }

    /// Rename a category
    pub async fn update_category(&self, id: i64, name: &str) -> Result<Category> {
        let name = name.trim().to_string();
        self.with_conn(move |conn, _| {
            let changed = conn
                .execute(
                    "UPDATE categories SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )
                .map_err(|e| unique_as_conflict(e, "Category name already exists"))?;
            if changed == 0 {
                return Err(Error::NotFound("Category not found".to_string()));
            }
            tracing::debug!(id, name = %name, "Category renamed");
            Ok(Category { id, name })
        })
        .await
    }

    /// Delete an empty category.
    ///
    /// Fails with [`Error::CategoryInUse`] and leaves everything untouched
    /// when the category still owns items.
    pub async fn delete_category(&self, id: i64) -> Result<Category> {
        self.with_conn(move |conn, _| {
            let tx = conn.transaction()?;
            let category = find_category(&tx, id)?
                .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;

            let item_count = count_items_in(&tx, id)?;
            if item_count > 0 {
                return Err(Error::CategoryInUse {
                    category_id: id,
                    item_count,
                });
            }

            tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            tx.commit()?;
            tracing::debug!(id, "Category deleted");
            Ok(category)
        })
        .await
    }

    /// Delete a category, moving its items elsewhere first.
    ///
    /// Items go to `move_to` when given, otherwise to the alphabetically
    /// first other category.
    pub async fn force_delete_category(
        &self,
        id: i64,
        move_to: Option<i64>,
    ) -> Result<ForceDeleteOutcome> {
        self.with_conn(move |conn, _| {
            let tx = conn.transaction()?;
            let category = find_category(&tx, id)?
                .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;

            let item_count = count_items_in(&tx, id)?;
            if item_count == 0 {
                tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
                tx.commit()?;
                tracing::debug!(id, "Empty category force-deleted");
                return Ok(ForceDeleteOutcome {
                    category,
                    items_moved: 0,
                    moved_to_category_id: None,
                });
            }

            let target = match move_to {
                Some(target) if target == id => {
                    return Err(Error::BadRequest(
                        "Cannot move items into the category being deleted".to_string(),
                    ));
                }
                Some(target) => {
                    find_category(&tx, target)?
                        .ok_or_else(|| Error::NotFound("Target category not found".to_string()))?
                        .id
                }
                None => tx
                    .query_row(
                        "SELECT id FROM categories WHERE id != ?1
                         ORDER BY name COLLATE NOCASE, id LIMIT 1",
                        params![id],
                        |r| r.get::<_, i64>(0),
                    )
                    .optional()?
                    .ok_or(Error::NoReassignmentTarget)?,
            };

            let moved = tx.execute(
                "UPDATE food_items SET category_id = ?1 WHERE category_id = ?2",
                params![target, id],
            )?;
            tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            tx.commit()?;

            tracing::debug!(id, target, moved, "Category force-deleted");
            Ok(ForceDeleteOutcome {
                category,
                items_moved: moved as i64,
                moved_to_category_id: Some(target),
            })
        })
        .await
    }

    /// Delete several categories; deletes what it can and reports the rest
    pub async fn bulk_delete_categories(&self, ids: &[i64]) -> Result<CategoryBulkDeleteOutcome> {
        let ids = dedup_ids(ids);
        self.with_conn(move |conn, _| {
            let tx = conn.transaction()?;
            let mut outcome = CategoryBulkDeleteOutcome::default();

            for id in ids {
                let Some(category) = find_category(&tx, id)? else {
                    outcome.not_found_ids.push(id);
                    continue;
                };

                let item_count = count_items_in(&tx, id)?;
                if item_count > 0 {
                    outcome.blocked.push(CategorySummary {
                        id,
                        name: category.name,
                        item_count,
                    });
                    continue;
                }

                tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
                outcome.deleted_ids.push(id);
            }

            tx.commit()?;
            tracing::debug!(
                deleted = outcome.deleted_ids.len(),
                not_found = outcome.not_found_ids.len(),
                blocked = outcome.blocked.len(),
                "Bulk category delete"
            );
            Ok(outcome)
        })
        .await
    }

    // =========================================================================
    // Food items
    // =========================================================================

    /// All items, soonest expiry first
    pub async fn list_items(&self) -> Result<Vec<FoodItem>> {
        self.with_conn(|conn, derive| {
            let sql = format!("{} ORDER BY i.expiry_date, i.id", ITEM_SELECT);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| item_from_row(row, derive))?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// Get an item by ID
    pub async fn get_item(&self, id: i64) -> Result<FoodItem> {
        self.with_conn(move |conn, derive| {
            find_item(conn, id, derive)?
                .ok_or_else(|| Error::NotFound("Food item not found".to_string()))
        })
        .await
    }

    /// Insert a validated item
    pub async fn create_item(&self, item: NewFoodItem) -> Result<FoodItem> {
        self.with_conn(move |conn, derive| {
            let tx = conn.transaction()?;
            ensure_category_exists(&tx, item.category_id)?;

            let derived = classify(item.expiry_date, derive.now, &derive.thresholds);
            tx.execute(
                "INSERT INTO food_items
                    (name, volume, volume_unit, expiry_date, notes, category_id,
                     status, days_until_expiry, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    item.name,
                    item.volume,
                    item.volume_unit,
                    item.expiry_date,
                    item.notes,
                    item.category_id,
                    derived.status.as_str(),
                    derived.days_until_expiry,
                    derive.now,
                ],
            )?;
            let id = tx.last_insert_rowid();
            let created = find_item(&tx, id, derive)?
                .ok_or_else(|| Error::Internal("Inserted item vanished".to_string()))?;
            tx.commit()?;

            tracing::debug!(id, name = %created.name, status = %created.status, "Food item created");
            Ok(created)
        })
        .await
    }

    /// Apply a partial update and recompute derived fields
    pub async fn update_item(&self, id: i64, patch: FoodItemPatch) -> Result<FoodItem> {
        self.with_conn(move |conn, derive| {
            let tx = conn.transaction()?;
            let current = find_item(&tx, id, derive)?
                .ok_or_else(|| Error::NotFound("Food item not found".to_string()))?;

            if let Some(category_id) = patch.category_id {
                ensure_category_exists(&tx, category_id)?;
            }

            let name = patch.name.unwrap_or(current.name);
            let volume = patch.volume.unwrap_or(current.volume);
            let volume_unit = patch.volume_unit.unwrap_or(current.volume_unit);
            let expiry_date = patch.expiry_date.unwrap_or(current.expiry_date);
            let notes = patch.notes.unwrap_or(current.notes);
            let category_id = patch.category_id.unwrap_or(current.category_id);
            let derived = classify(expiry_date, derive.now, &derive.thresholds);

            tx.execute(
                "UPDATE food_items
                 SET name = ?1, volume = ?2, volume_unit = ?3, expiry_date = ?4,
                     notes = ?5, category_id = ?6, status = ?7, days_until_expiry = ?8
                 WHERE id = ?9",
                params![
                    name,
                    volume,
                    volume_unit,
                    expiry_date,
                    notes,
                    category_id,
                    derived.status.as_str(),
                    derived.days_until_expiry,
                    id,
                ],
            )?;
            let updated = find_item(&tx, id, derive)?
                .ok_or_else(|| Error::Internal("Updated item vanished".to_string()))?;
            tx.commit()?;

            tracing::debug!(id, status = %updated.status, "Food item updated");
            Ok(updated)
        })
        .await
    }

    /// Delete an item, returning it
    pub async fn delete_item(&self, id: i64) -> Result<FoodItem> {
        self.with_conn(move |conn, derive| {
            let tx = conn.transaction()?;
            let item = find_item(&tx, id, derive)?
                .ok_or_else(|| Error::NotFound("Food item not found".to_string()))?;
            tx.execute("DELETE FROM food_items WHERE id = ?1", params![id])?;
            tx.commit()?;
            tracing::debug!(id, "Food item deleted");
            Ok(item)
        })
        .await
    }

    /// Delete several items, reporting which ids did not exist
    pub async fn bulk_delete_items(&self, ids: &[i64]) -> Result<ItemBulkDeleteOutcome> {
        let ids = dedup_ids(ids);
        self.with_conn(move |conn, _| {
            let tx = conn.transaction()?;
            let mut outcome = ItemBulkDeleteOutcome::default();
            {
                let mut stmt = tx.prepare("DELETE FROM food_items WHERE id = ?1")?;
                for id in ids {
                    if stmt.execute(params![id])? > 0 {
                        outcome.deleted_ids.push(id);
                    } else {
                        outcome.not_found_ids.push(id);
                    }
                }
            }
            tx.commit()?;
            tracing::debug!(
                deleted = outcome.deleted_ids.len(),
                not_found = outcome.not_found_ids.len(),
                "Bulk item delete"
            );
            Ok(outcome)
        })
        .await
    }

    /// Items with at most `days` days left (expired ones included)
    pub async fn expiring_items(&self, days: i64) -> Result<ExpiringReport> {
        let thresholds = self.thresholds;
        let all = self.list_items().await?;
        let total_items = all.len();

        let mut items: Vec<FoodItem> = all
            .into_iter()
            .filter(|item| item.days_until_expiry <= days)
            .collect();
        items.sort_by_key(|item| item.days_until_expiry);

        let summary = ExpiringSummary {
            total_items,
            expiring_items: items.len(),
            expired_items: items.iter().filter(|i| i.days_until_expiry < 0).count(),
            urgent_items: items
                .iter()
                .filter(|i| (0..=thresholds.urgent_days).contains(&i.days_until_expiry))
                .count(),
            soon_items: items
                .iter()
                .filter(|i| {
                    i.days_until_expiry > thresholds.urgent_days
                        && i.days_until_expiry <= thresholds.soon_days
                })
                .count(),
        };

        Ok(ExpiringReport { items, summary })
    }

    /// Rewrite stored `status`/`days_until_expiry` to match the clock.
    ///
    /// Returns the number of rows whose stored values changed.
    pub async fn refresh_derived(&self) -> Result<usize> {
        self.with_conn(|conn, derive| {
            let tx = conn.transaction()?;
            let stale: Vec<(i64, DateTime<Utc>, String, i64)> = {
                let mut stmt = tx.prepare(
                    "SELECT id, expiry_date, status, days_until_expiry FROM food_items",
                )?;
                let rows = stmt.query_map([], |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, DateTime<Utc>>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, i64>(3)?,
                    ))
                })?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            };

            let mut changed = 0;
            {
                let mut update = tx.prepare(
                    "UPDATE food_items SET status = ?1, days_until_expiry = ?2 WHERE id = ?3",
                )?;
                for (id, expiry, status, days) in stale {
                    let derived = classify(expiry, derive.now, &derive.thresholds);
                    if derived.status.as_str() != status || derived.days_until_expiry != days {
                        update.execute(params![
                            derived.status.as_str(),
                            derived.days_until_expiry,
                            id
                        ])?;
                        changed += 1;
                    }
                }
            }
            tx.commit()?;

            if changed > 0 {
                tracing::info!(changed, "Refreshed derived expiry fields");
            }
            Ok(changed)
        })
        .await
    }

    /// True when neither categories nor items exist
    pub async fn is_empty(&self) -> Result<bool> {
        self.with_conn(|conn, _| {
            let count: i64 = conn.query_row(
                "SELECT (SELECT COUNT(*) FROM categories) + (SELECT COUNT(*) FROM food_items)",
                [],
                |r| r.get(0),
            )?;
            Ok(count == 0)
        })
        .await
    }
}

// =============================================================================
// Row mapping and helpers
// =============================================================================

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<CategorySummary> {
    Ok(CategorySummary {
        id: row.get("id")?,
        name: row.get("name")?,
        item_count: row.get("item_count")?,
    })
}

fn item_from_row(row: &Row, derive: Derive) -> rusqlite::Result<FoodItem> {
    let expiry_date: DateTime<Utc> = row.get("expiry_date")?;
    let derived = classify(expiry_date, derive.now, &derive.thresholds);
    let category_id: i64 = row.get("category_id")?;

    Ok(FoodItem {
        id: row.get("id")?,
        name: row.get("name")?,
        volume: row.get("volume")?,
        volume_unit: row.get("volume_unit")?,
        expiry_date,
        notes: row.get("notes")?,
        category_id,
        status: derived.status,
        days_until_expiry: derived.days_until_expiry,
        date_added: row.get("date_added")?,
        category: Category {
            id: category_id,
            name: row.get("category_name")?,
        },
    })
}

fn find_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            category_from_row,
        )
        .optional()?)
}

fn find_item(conn: &Connection, id: i64, derive: Derive) -> Result<Option<FoodItem>> {
    let sql = format!("{} WHERE i.id = ?1", ITEM_SELECT);
    Ok(conn
        .query_row(&sql, params![id], |row| item_from_row(row, derive))
        .optional()?)
}

fn count_items_in(conn: &Connection, category_id: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM food_items WHERE category_id = ?1",
        params![category_id],
        |r| r.get(0),
    )?)
}

fn ensure_category_exists(conn: &Connection, category_id: i64) -> Result<()> {
    match find_category(conn, category_id)? {
        Some(_) => Ok(()),
        None => Err(Error::Validation(vec![
            "Category does not exist".to_string()
        ])),
    }
}

fn unique_as_conflict(err: rusqlite::Error, message: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::Conflict(message.to_string())
        }
        _ => Error::Database(err),
    }
}

/// Drop repeated ids, keeping first-seen order
fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
