#![allow(clippy::uninlined_format_args)]

use std::path::Path;

pub mod error;
pub mod render;
pub mod service;
pub mod store;
pub mod tree;
pub mod types;

pub use error::{MenuError, MenuResult};
pub use service::MenuTree;
pub use store::{MenuStore, MoveOutcome};
pub use tree::{MenuForest, PreOrder};
pub use types::*;

/// Открыть дерево меню
///
/// # Параметры
/// - `db_path` - путь к файлу базы данных SQLite
/// - `pool_size` - размер пула соединений
///
/// # Пример
/// ```no_run
/// use menu::{create_menu_tree, Direction, MenuItemInput};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let tree = create_menu_tree("menu.db", 4).await?;
///
///     let clients = tree.add(MenuItemInput::new("Clients").url("clients").enabled(true)).await?;
///     tree.add(MenuItemInput::new("Devices").url("devices").position(1)).await?;
///     tree.move_item(clients, Direction::Down).await?;
///
///     for entry in tree.load_forest().await?.walk(None) {
///         println!("{}{}", "  ".repeat(entry.depth), entry.item.label);
///     }
///     Ok(())
/// }
/// ```
pub async fn create_menu_tree<P: AsRef<Path>>(db_path: P, pool_size: u32) -> MenuResult<MenuTree> {
    MenuTree::new(db_path, pool_size).await
}

/// Открыть дерево меню с пулом по умолчанию
pub async fn create_default_menu_tree<P: AsRef<Path>>(db_path: P) -> MenuResult<MenuTree> {
    create_menu_tree(db_path, 4).await
}
