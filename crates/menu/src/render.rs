//! HTML фрагменты страницы администрирования меню и навигационной панели

use crate::types::{MenuItem, MenuItemId, ParentOption, TreeEntry};
use html_escape::{encode_double_quoted_attribute, encode_text};

const INDENT: &str = "&mdash; ";

/// Итог действия администратора, показывается строкой статуса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Added,
    Updated,
    Deleted,
    Enabled,
    Disabled,
    Moved,
    NotMoved,
}

pub fn status_message(action: MenuAction) -> &'static str {
    match action {
        MenuAction::Added => "Menu item added.",
        MenuAction::Updated => "Menu item updated.",
        MenuAction::Deleted => "Menu item deleted.",
        MenuAction::Enabled => "Menu item enabled.",
        MenuAction::Disabled => "Menu item disabled.",
        MenuAction::Moved => "Menu item moved.",
        MenuAction::NotMoved => "Menu item is already at the edge of its group.",
    }
}

/// Таблица администратора: строка на пункт, отступ по глубине
pub fn admin_table<'a>(entries: impl IntoIterator<Item = TreeEntry<'a>>) -> String {
    let mut html = String::from(
        "<table class=\"table\">\n<thead><tr><th>Label</th><th>URL</th><th>Type</th>\
         <th>Enabled</th><th>Options</th><th>Actions</th></tr></thead>\n<tbody>\n",
    );

    for entry in entries {
        let item = entry.item;
        let id = item.id;
        html.push_str(&format!(
            "<tr><td>{}{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>",
            INDENT.repeat(entry.depth),
            encode_text(&item.label),
            encode_text(item.url.as_deref().unwrap_or("")),
            encode_text(&item.item_type),
            if item.enabled { "Yes" } else { "No" },
            encode_text(item.options.as_deref().unwrap_or("")),
        ));
        html.push_str(&action_link("moveup", id, "btn-secondary", "&uarr;"));
        html.push_str(&action_link("movedown", id, "btn-secondary", "&darr;"));
        html.push_str(&action_link("editform", id, "btn-primary", "Edit"));
        html.push_str(&action_link("delete", id, "btn-danger", "Delete"));
        if item.enabled {
            html.push_str(&action_link("disable", id, "btn-warning", "Disable"));
        } else {
            html.push_str(&action_link("enable", id, "btn-success", "Enable"));
        }
        html.push_str("</td></tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn action_link(action: &str, id: MenuItemId, class: &str, text: &str) -> String {
    format!("<a href=\"?action={action}&amp;id={id}\" class=\"btn btn-sm {class}\">{text}</a> ")
}

/// `<select name="parent_id">`, первым идет пустой вариант "без родителя"
pub fn parent_select(options: &[ParentOption], selected: Option<MenuItemId>) -> String {
    let mut html = String::from("<select name=\"parent_id\">\n<option value=\"\">(top level)</option>\n");

    for option in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}{}</option>\n",
            encode_double_quoted_attribute(&option.id.to_string()),
            if selected == Some(option.id) { " selected" } else { "" },
            INDENT.repeat(option.depth),
            encode_text(&option.label),
        ));
    }

    html.push_str("</select>\n");
    html
}

/// Адрес ссылки навигации: `link` ведет на `url`, `script` на `script`,
/// остальные типы и пустые значения на `#`
pub fn nav_href(item: &MenuItem) -> &str {
    let target = match item.item_type.as_str() {
        "link" => item.url.as_deref(),
        "script" => item.script.as_deref(),
        _ => None,
    };
    target.filter(|t| !t.is_empty()).unwrap_or("#")
}

/// Вложенный `<ul>` навигационной панели.
///
/// Ожидает прямой обход (обычно [`crate::MenuForest::walk_enabled`]); пункт с
/// детьми становится выпадающим списком с адресом `#`.
pub fn navigation<'a>(entries: impl IntoIterator<Item = TreeEntry<'a>>) -> String {
    let mut html = String::from("<ul class=\"navbar-nav\">\n");
    let mut open = 0usize;
    let mut entries = entries.into_iter().peekable();

    while let Some(entry) = entries.next() {
        while open > entry.depth {
            html.push_str("</ul>\n</li>\n");
            open -= 1;
        }

        let item = entry.item;
        let has_children = entries.peek().is_some_and(|next| next.depth > entry.depth);
        if has_children {
            html.push_str(&format!(
                "<li class=\"nav-item dropdown\"><a class=\"nav-link dropdown-toggle\" href=\"#\" \
                 id=\"dropdown{}\" role=\"button\" data-bs-toggle=\"dropdown\">{}</a>\n\
                 <ul class=\"dropdown-menu\">\n",
                item.id,
                encode_text(&item.label),
            ));
            open += 1;
        } else {
            html.push_str(&format!(
                "<li class=\"nav-item\"><a class=\"nav-link\" href=\"{}\">{}</a></li>\n",
                encode_double_quoted_attribute(nav_href(item)),
                encode_text(&item.label),
            ));
        }
    }

    for _ in 0..open {
        html.push_str("</ul>\n</li>\n");
    }
    html.push_str("</ul>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MenuForest;
    use crate::types::DEFAULT_ITEM_TYPE;

    fn item(id: MenuItemId, label: &str, parent_id: Option<MenuItemId>, enabled: bool) -> MenuItem {
        MenuItem {
            id,
            label: label.to_string(),
            url: Some(format!("/{id}")),
            item_type: DEFAULT_ITEM_TYPE.to_string(),
            script: None,
            parent_id,
            position: 0,
            enabled,
            options: None,
        }
    }

    #[test]
    fn test_admin_table_indents_and_escapes() {
        let forest = MenuForest::new(vec![
            item(1, "Clients & <Devices>", None, true),
            item(2, "Networks", Some(1), false),
        ]);

        let html = admin_table(forest.walk(None));
        assert!(html.contains("<td>Clients &amp; &lt;Devices&gt;</td>"));
        assert!(html.contains("<td>&mdash; Networks</td>"));
        assert!(html.contains("?action=disable&amp;id=1"));
        assert!(html.contains("?action=enable&amp;id=2"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
    }

    #[test]
    fn test_parent_select_marks_selected() {
        let options = vec![
            ParentOption { id: 1, label: "Top".to_string(), depth: 0 },
            ParentOption { id: 4, label: "Nested \"x\"".to_string(), depth: 1 },
        ];

        let html = parent_select(&options, Some(4));
        assert!(html.starts_with("<select name=\"parent_id\">"));
        assert!(html.contains("<option value=\"1\">Top</option>"));
        assert!(html.contains("<option value=\"4\" selected>&mdash; Nested \"x\"</option>"));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(MenuAction::Added), "Menu item added.");
        assert_ne!(
            status_message(MenuAction::Moved),
            status_message(MenuAction::NotMoved)
        );
    }

    #[test]
    fn test_nav_href_follows_type() {
        let mut link = item(1, "Clients", None, true);
        assert_eq!(nav_href(&link), "/1");
        link.url = Some(String::new());
        assert_eq!(nav_href(&link), "#");

        let mut script = item(2, "Report", None, true);
        script.item_type = "script".to_string();
        assert_eq!(nav_href(&script), "#");
        script.script = Some("modules/report.php".to_string());
        assert_eq!(nav_href(&script), "modules/report.php");

        let mut other = item(3, "Divider", None, true);
        other.item_type = "separator".to_string();
        assert_eq!(nav_href(&other), "#");
    }

    #[test]
    fn test_navigation_nests_dropdowns() {
        let forest = MenuForest::new(vec![
            item(1, "Network", None, true),
            item(2, "VLANs", Some(1), true),
            item(3, "Billing", None, true),
        ]);

        let html = navigation(forest.walk_enabled(None));
        assert_eq!(
            html,
            "<ul class=\"navbar-nav\">\n\
             <li class=\"nav-item dropdown\"><a class=\"nav-link dropdown-toggle\" href=\"#\" \
             id=\"dropdown1\" role=\"button\" data-bs-toggle=\"dropdown\">Network</a>\n\
             <ul class=\"dropdown-menu\">\n\
             <li class=\"nav-item\"><a class=\"nav-link\" href=\"/2\">VLANs</a></li>\n\
             </ul>\n</li>\n\
             <li class=\"nav-item\"><a class=\"nav-link\" href=\"/3\">Billing</a></li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_navigation_hides_disabled_subtree() {
        let forest = MenuForest::new(vec![
            item(1, "Hidden", None, false),
            item(2, "Under hidden", Some(1), true),
            item(3, "Visible", None, true),
        ]);

        let html = navigation(forest.walk_enabled(None));
        assert!(!html.contains("Hidden"));
        assert!(!html.contains("Under hidden"));
        assert!(html.contains("href=\"/3\">Visible</a>"));
        assert!(!html.contains("dropdown-menu"));
    }

    #[test]
    fn test_navigation_closes_deep_lists() {
        let forest = MenuForest::new(vec![
            item(1, "A", None, true),
            item(2, "B", Some(1), true),
            item(3, "C", Some(2), true),
        ]);

        let html = navigation(forest.walk_enabled(None));
        assert_eq!(html.matches("<ul").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li").count(), html.matches("</li>").count());
    }
}
