use crate::types::{MenuItem, MenuItemId, ParentOption, TreeEntry};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Снимок всех пунктов меню в виде упорядоченного леса
#[derive(Debug, Clone, Default)]
pub struct MenuForest {
    items: Vec<MenuItem>,
    index: HashMap<MenuItemId, usize>,
    // Индексы в `items`, уже в порядке (position, id)
    children: HashMap<Option<MenuItemId>, Vec<usize>>,
}

impl MenuForest {
    pub fn new(mut items: Vec<MenuItem>) -> Self {
        items.sort_by_key(|item| (item.position, item.id));

        let mut index = HashMap::with_capacity(items.len());
        let mut children: HashMap<Option<MenuItemId>, Vec<usize>> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            index.insert(item.id, i);
            children.entry(item.parent_id).or_default().push(i);
        }

        Self {
            items,
            index,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ленивый обход в прямом порядке, начиная с детей `root`.
    ///
    /// Каждый пункт выдается не более одного раза, поэтому обход конечен
    /// даже если `parent_id` образуют цикл.
    pub fn walk(&self, root: Option<MenuItemId>) -> PreOrder<'_> {
        self.pre_order(root, false)
    }

    /// Обход только включенных пунктов: выключенный пункт скрывает все свое поддерево
    pub fn walk_enabled(&self, root: Option<MenuItemId>) -> PreOrder<'_> {
        self.pre_order(root, true)
    }

    fn pre_order(&self, root: Option<MenuItemId>, enabled_only: bool) -> PreOrder<'_> {
        let mut walk = PreOrder {
            forest: self,
            stack: Vec::new(),
            visited: HashSet::new(),
            enabled_only,
        };
        if let Some(root_id) = root {
            walk.visited.insert(root_id);
        }
        walk.push_children(root, 0);
        walk
    }

    pub fn descendants(&self, id: MenuItemId) -> HashSet<MenuItemId> {
        self.walk(Some(id)).map(|entry| entry.item.id).collect()
    }

    /// Плоский список для выбора родителя.
    ///
    /// `exclude` пропускается вместе со всем своим поддеревом: пункт не может
    /// стать потомком самого себя.
    pub fn parent_options(&self, exclude: Option<MenuItemId>) -> Vec<ParentOption> {
        let mut options = Vec::new();
        let mut skipping_below: Option<usize> = None;

        for entry in self.walk(None) {
            if let Some(depth) = skipping_below {
                if entry.depth > depth {
                    continue;
                }
                skipping_below = None;
            }
            if Some(entry.item.id) == exclude {
                skipping_below = Some(entry.depth);
                continue;
            }
            options.push(ParentOption {
                id: entry.item.id,
                label: entry.item.label.clone(),
                depth: entry.depth,
            });
        }

        options
    }

    /// Пункты, родителя которых больше нет
    pub fn orphans(&self) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.parent_id, Some(p) if !self.index.contains_key(&p)))
            .collect()
    }
}

/// Итератор прямого обхода (см. [`MenuForest::walk`])
pub struct PreOrder<'a> {
    forest: &'a MenuForest,
    stack: Vec<(usize, usize)>,
    visited: HashSet<MenuItemId>,
    enabled_only: bool,
}

impl<'a> PreOrder<'a> {
    fn push_children(&mut self, parent_id: Option<MenuItemId>, depth: usize) {
        if let Some(kids) = self.forest.children.get(&parent_id) {
            self.stack.extend(kids.iter().rev().map(|&i| (i, depth)));
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = TreeEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((i, depth)) = self.stack.pop() {
            let item = &self.forest.items[i];
            if !self.visited.insert(item.id) {
                warn!(id = item.id, "Menu tree contains a parent cycle, skipping revisit");
                continue;
            }
            if self.enabled_only && !item.enabled {
                continue;
            }
            self.push_children(Some(item.id), depth + 1);
            return Some(TreeEntry { item, depth });
        }
        None
    }
}
