use crate::error::{MenuError, MenuResult};
use crate::store::{MenuStore, MoveOutcome};
use crate::tree::MenuForest;
use crate::types::*;
use common::ValidationError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Упорядоченный лес пунктов меню поверх SQLite хранилища.
///
/// Операции над отсутствующим `id` возвращают [`MenuError::NotFound`].
pub struct MenuTree {
    store: Arc<MenuStore>,
}

impl MenuTree {
    pub async fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> MenuResult<Self> {
        let store = Arc::new(MenuStore::new(db_path, pool_size).await?);
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: Arc<MenuStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(label = %input.label))]
    pub async fn add(&self, input: MenuItemInput) -> MenuResult<MenuItemId> {
        let fields = input.normalize()?;

        if let Some(parent_id) = fields.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let id = self.store.insert(&fields).await?;
        info!(id, parent_id = ?fields.parent_id, "Menu item added");
        Ok(id)
    }

    /// Полная перезапись пункта: все поля берутся из `input`
    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: MenuItemId, input: MenuItemInput) -> MenuResult<()> {
        let fields = input.normalize()?;

        if !self.store.exists(id).await? {
            return Err(MenuError::NotFound(id));
        }
        if let Some(parent_id) = fields.parent_id {
            self.ensure_valid_parent(id, parent_id).await?;
        }

        if !self.store.update(id, &fields).await? {
            return Err(MenuError::NotFound(id));
        }

        info!(id, "Menu item updated");
        Ok(())
    }

    /// Удалить пункт. Дети не удаляются и не переносятся.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MenuItemId) -> MenuResult<()> {
        if !self.store.delete(id).await? {
            return Err(MenuError::NotFound(id));
        }
        info!(id, "Menu item deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, id: MenuItemId, enabled: bool) -> MenuResult<()> {
        if !self.store.set_enabled(id, enabled).await? {
            return Err(MenuError::NotFound(id));
        }
        info!(id, enabled, "Menu item visibility changed");
        Ok(())
    }

    /// Поменять пункт местами с ближайшим соседом.
    ///
    /// `Ok(false)` - пункт уже крайний, ничего не изменено.
    #[instrument(skip(self))]
    pub async fn move_item(&self, id: MenuItemId, direction: Direction) -> MenuResult<bool> {
        match self.store.swap_with_neighbor(id, direction).await? {
            MoveOutcome::NotFound => Err(MenuError::NotFound(id)),
            MoveOutcome::AtEdge => {
                debug!(id, %direction, "Menu item already at the edge of its siblings");
                Ok(false)
            }
            MoveOutcome::Swapped { with } => {
                info!(id, with, %direction, "Menu item moved");
                Ok(true)
            }
        }
    }

    pub async fn get(&self, id: MenuItemId) -> MenuResult<Option<MenuItem>> {
        self.store.get(id).await
    }

    pub async fn list(&self) -> MenuResult<Vec<MenuItem>> {
        self.store.list_all().await
    }

    pub async fn load_forest(&self) -> MenuResult<MenuForest> {
        let items = self.store.list_all().await?;
        debug!(items_count = items.len() as u64, "Menu forest loaded");
        Ok(MenuForest::new(items))
    }

    /// Пункты под `root` в прямом порядке вместе с глубиной
    pub async fn render_tree(&self, root: Option<MenuItemId>) -> MenuResult<Vec<(MenuItem, usize)>> {
        let forest = self.load_forest().await?;
        Ok(forest
            .walk(root)
            .map(|entry| (entry.item.clone(), entry.depth))
            .collect())
    }

    pub async fn parent_options(&self, exclude: Option<MenuItemId>) -> MenuResult<Vec<ParentOption>> {
        Ok(self.load_forest().await?.parent_options(exclude))
    }

    async fn ensure_parent_exists(&self, parent_id: MenuItemId) -> MenuResult<()> {
        if self.store.exists(parent_id).await? {
            Ok(())
        } else {
            Err(ValidationError::UnknownParent { parent_id }.into())
        }
    }

    /// Родитель должен существовать и не быть самим пунктом или его потомком
    async fn ensure_valid_parent(&self, id: MenuItemId, parent_id: MenuItemId) -> MenuResult<()> {
        if parent_id == id {
            return Err(ValidationError::CyclicParent { id, parent_id }.into());
        }
        self.ensure_parent_exists(parent_id).await?;

        if self.store.ancestors(parent_id).await?.contains(&id) {
            return Err(ValidationError::CyclicParent { id, parent_id }.into());
        }
        Ok(())
    }
}
