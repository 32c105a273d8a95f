use common::ValidationError;
use serde::{Deserialize, Serialize};

pub type MenuItemId = i64;

/// Тип пункта меню, если он не указан явно
pub const DEFAULT_ITEM_TYPE: &str = "link";

/// Строка таблицы `menu_items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub label: String,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    pub script: Option<String>,
    /// `None` - пункт верхнего уровня
    pub parent_id: Option<MenuItemId>,
    pub position: i64,
    pub enabled: bool,
    pub options: Option<String>,
}

/// Входные данные для `add` и `edit`.
///
/// `edit` перезаписывает все поля: незаданные значения получают те же
/// умолчания, что и при добавлении (например, `item_type` снова станет `"link"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub label: String,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub script: Option<String>,
    pub parent_id: Option<MenuItemId>,
    pub position: Option<i64>,
    pub enabled: bool,
    pub options: Option<String>,
}

impl MenuItemInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn parent(mut self, parent_id: MenuItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Проверить обязательные поля и применить умолчания
    pub fn normalize(self) -> Result<MenuItemFields, ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::missing("label"));
        }

        Ok(MenuItemFields {
            label: self.label,
            url: self.url.map(normalize_url),
            item_type: self
                .item_type
                .unwrap_or_else(|| DEFAULT_ITEM_TYPE.to_string()),
            script: self.script,
            parent_id: self.parent_id.filter(|id| *id != 0),
            position: self.position.unwrap_or(0),
            enabled: self.enabled,
            options: self.options.filter(|o| !o.is_empty()),
        })
    }
}

/// Непустой адрес без ведущего `/` получает его
pub fn normalize_url(url: String) -> String {
    if url.is_empty() || url.starts_with('/') {
        url
    } else {
        format!("/{url}")
    }
}

/// Нормализованный набор колонок, готовый к записи
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemFields {
    pub label: String,
    pub url: Option<String>,
    pub item_type: String,
    pub script: Option<String>,
    pub parent_id: Option<MenuItemId>,
    pub position: i64,
    pub enabled: bool,
    pub options: Option<String>,
}

impl MenuItemFields {
    pub fn into_item(self, id: MenuItemId) -> MenuItem {
        MenuItem {
            id,
            label: self.label,
            url: self.url,
            item_type: self.item_type,
            script: self.script,
            parent_id: self.parent_id,
            position: self.position,
            enabled: self.enabled,
            options: self.options,
        }
    }
}

/// Направление перемещения среди соседей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Элемент обхода дерева: пункт и его глубина (дети корня - 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry<'a> {
    pub item: &'a MenuItem,
    pub depth: usize,
}

/// Вариант для выпадающего списка выбора родителя
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentOption {
    pub id: MenuItemId,
    pub label: String,
    pub depth: usize,
}
