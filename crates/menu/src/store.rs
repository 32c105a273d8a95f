use crate::error::MenuResult;
use crate::types::*;
use common::DatabaseError;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

type DbPool = Pool<SqliteConnectionManager>;

const ITEM_COLUMNS: &str = "id, label, url, type, script, parent_id, position, enabled, options";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Результат попытки поменять пункт местами с соседом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Пункта с таким id нет
    NotFound,
    /// Пункт уже первый (или последний) среди соседей
    AtEdge,
    Swapped { with: MenuItemId },
}

/// SQLite хранилище пунктов меню с пулом соединений
pub struct MenuStore {
    pool: Arc<DbPool>,
}

impl MenuStore {
    /// Открыть (или создать) базу и подготовить схему
    pub async fn new<P: AsRef<Path>>(path: P, pool_size: u32) -> MenuResult<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        {
            let conn = pool.get()?;
            Self::init_schema(&conn)?;
        }

        debug!("Menu store opened at {}", path.as_ref().display());
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn init_schema(conn: &Connection) -> MenuResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS menu_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                url TEXT,
                type TEXT NOT NULL DEFAULT 'link',
                script TEXT,
                parent_id INTEGER,
                position INTEGER NOT NULL DEFAULT 0,
                enabled INTEGER NOT NULL DEFAULT 0,
                options TEXT
            );

            -- Обход дерева идет по группам соседей
            CREATE INDEX IF NOT EXISTS idx_menu_items_parent_position
                ON menu_items(parent_id, position);
            "#,
        )?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(label = %record.label))]
    pub async fn insert(&self, record: &MenuItemFields) -> MenuResult<MenuItemId> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO menu_items (label, url, type, script, parent_id, position, enabled, options)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.label,
                record.url,
                record.item_type,
                record.script,
                record.parent_id,
                record.position,
                record.enabled,
                record.options,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted menu item {}", id);
        Ok(id)
    }

    pub async fn get(&self, id: MenuItemId) -> MenuResult<Option<MenuItem>> {
        let conn = self.pool.get()?;

        let item = conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM menu_items WHERE id = ?1"),
                params![id],
                Self::parse_item_row,
            )
            .optional()?;

        Ok(item)
    }

    pub async fn exists(&self, id: MenuItemId) -> MenuResult<bool> {
        let conn = self.pool.get()?;

        let found = conn
            .query_row(
                "SELECT 1 FROM menu_items WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;

        Ok(found.is_some())
    }

    /// Все пункты: сначала по родителю (NULL первым), затем по позиции и id
    pub async fn list_all(&self) -> MenuResult<Vec<MenuItem>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items ORDER BY parent_id, position ASC, id ASC"
        ))?;
        let items = stmt
            .query_map(params![], Self::parse_item_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Полная перезапись строки. Возвращает false, если строки нет.
    #[instrument(skip(self, record))]
    pub async fn update(&self, id: MenuItemId, record: &MenuItemFields) -> MenuResult<bool> {
        let conn = self.pool.get()?;

        let changed = conn.execute(
            "UPDATE menu_items
             SET label = ?1, url = ?2, type = ?3, script = ?4, parent_id = ?5,
                 position = ?6, enabled = ?7, options = ?8
             WHERE id = ?9",
            params![
                record.label,
                record.url,
                record.item_type,
                record.script,
                record.parent_id,
                record.position,
                record.enabled,
                record.options,
                id,
            ],
        )?;

        Ok(changed > 0)
    }

    /// Удаление без каскада: дети остаются со ссылкой на удаленного родителя
    pub async fn delete(&self, id: MenuItemId) -> MenuResult<bool> {
        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM menu_items WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub async fn set_enabled(&self, id: MenuItemId, enabled: bool) -> MenuResult<bool> {
        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE menu_items SET enabled = ?1 WHERE id = ?2",
            params![enabled, id],
        )?;
        Ok(changed > 0)
    }

    /// Цепочка предков начиная с родителя `id`.
    ///
    /// Останавливается на отсутствующем родителе или на повторе (цикл в данных).
    pub async fn ancestors(&self, id: MenuItemId) -> MenuResult<Vec<MenuItemId>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT parent_id FROM menu_items WHERE id = ?1")?;

        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = id;

        loop {
            let parent: Option<Option<MenuItemId>> = stmt
                .query_row(params![current], |row| row.get(0))
                .optional()?;

            match parent.flatten() {
                Some(parent_id) if seen.insert(parent_id) => {
                    chain.push(parent_id);
                    current = parent_id;
                }
                Some(parent_id) => {
                    // Повтор: цепочка уже содержит этого предка
                    chain.push(parent_id);
                    break;
                }
                None => break,
            }
        }

        Ok(chain)
    }

    /// Поменять позиции с ближайшим соседом в одной IMMEDIATE транзакции
    #[instrument(skip(self))]
    pub async fn swap_with_neighbor(
        &self,
        id: MenuItemId,
        direction: Direction,
    ) -> MenuResult<MoveOutcome> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<(Option<MenuItemId>, i64)> = tx
            .query_row(
                "SELECT parent_id, position FROM menu_items WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((parent_id, position)) = current else {
            return Ok(MoveOutcome::NotFound);
        };

        let neighbor_sql = match direction {
            Direction::Up => {
                "SELECT id, position FROM menu_items
                 WHERE parent_id IS ?1 AND position < ?2
                 ORDER BY position DESC, id DESC LIMIT 1"
            }
            Direction::Down => {
                "SELECT id, position FROM menu_items
                 WHERE parent_id IS ?1 AND position > ?2
                 ORDER BY position ASC, id ASC LIMIT 1"
            }
        };

        let neighbor: Option<(MenuItemId, i64)> = tx
            .query_row(neighbor_sql, params![parent_id, position], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;

        let Some((neighbor_id, neighbor_position)) = neighbor else {
            return Ok(MoveOutcome::AtEdge);
        };

        tx.execute(
            "UPDATE menu_items SET position = ?1 WHERE id = ?2",
            params![neighbor_position, id],
        )?;
        tx.execute(
            "UPDATE menu_items SET position = ?1 WHERE id = ?2",
            params![position, neighbor_id],
        )?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(
            "Swapped positions of {} ({}) and {} ({})",
            id, position, neighbor_id, neighbor_position
        );
        Ok(MoveOutcome::Swapped { with: neighbor_id })
    }

    fn parse_item_row(row: &Row) -> rusqlite::Result<MenuItem> {
        Ok(MenuItem {
            id: row.get(0)?,
            label: row.get(1)?,
            url: row.get(2)?,
            item_type: row.get(3)?,
            script: row.get(4)?,
            parent_id: row.get(5)?,
            position: row.get(6)?,
            enabled: row.get::<_, i64>(7)? != 0,
            options: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store() -> (MenuStore, TempDir) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let store = MenuStore::new(temp_dir.path().join("menu.db"), 2)
            .await
            .expect("failed to open store");
        (store, temp_dir)
    }

    fn fields(label: &str, parent_id: Option<MenuItemId>, position: i64) -> MenuItemFields {
        MenuItemInput {
            label: label.to_string(),
            parent_id,
            position: Some(position),
            ..Default::default()
        }
        .normalize()
        .expect("valid input")
    }

    #[tokio::test]
    async fn test_swap_skips_equal_positions() {
        let (store, _dir) = open_store().await;
        let a = store.insert(&fields("A", None, 1)).await.unwrap();
        let b = store.insert(&fields("B", None, 1)).await.unwrap();

        // Равные позиции не считаются "строго меньше"
        let outcome = store.swap_with_neighbor(b, Direction::Up).await.unwrap();
        assert_eq!(outcome, MoveOutcome::AtEdge);
        assert_eq!(store.get(a).await.unwrap().unwrap().position, 1);
    }

    #[tokio::test]
    async fn test_swap_missing_item() {
        let (store, _dir) = open_store().await;
        let outcome = store.swap_with_neighbor(42, Direction::Down).await.unwrap();
        assert_eq!(outcome, MoveOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_ancestors_stop_on_cycle() {
        let (store, dir) = open_store().await;
        let a = store.insert(&fields("A", None, 0)).await.unwrap();
        let b = store.insert(&fields("B", Some(a), 0)).await.unwrap();

        // Цикл можно создать только в обход MenuTree
        let raw = Connection::open(dir.path().join("menu.db")).unwrap();
        raw.execute(
            "UPDATE menu_items SET parent_id = ?1 WHERE id = ?2",
            params![b, a],
        )
        .unwrap();

        let chain = store.ancestors(b).await.unwrap();
        assert_eq!(chain, vec![a, b]);
    }
}
