use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use common::{OperationTimer, SlmsConfig};
use menu::render::{self, MenuAction};
use menu::{create_menu_tree, Direction, MenuError, MenuItemId, MenuItemInput, MenuTree};

#[derive(Debug, Args)]
pub struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

/// Поля пункта меню. `edit` перезаписывает все поля, незаданные получают умолчания.
#[derive(Debug, Clone, Args)]
pub struct ItemArgs {
    #[arg(long)]
    label: String,
    #[arg(long)]
    url: Option<String>,
    #[arg(long = "type")]
    item_type: Option<String>,
    #[arg(long)]
    script: Option<String>,
    /// id родителя (0 или не указан - верхний уровень)
    #[arg(long)]
    parent: Option<MenuItemId>,
    #[arg(long)]
    position: Option<i64>,
    #[arg(long)]
    enabled: bool,
    #[arg(long)]
    options: Option<String>,
}

impl From<ItemArgs> for MenuItemInput {
    fn from(args: ItemArgs) -> Self {
        MenuItemInput {
            label: args.label,
            url: args.url,
            item_type: args.item_type,
            script: args.script,
            parent_id: args.parent,
            position: args.position,
            enabled: args.enabled,
            options: args.options,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum MenuSubcommand {
    /// Добавить пункт меню
    #[command(name = "add")]
    Add(ItemArgs),
    /// Перезаписать пункт меню
    #[command(name = "edit")]
    Edit {
        id: MenuItemId,
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Удалить пункт (дети остаются без родителя)
    #[command(name = "delete")]
    Delete { id: MenuItemId },
    #[command(name = "enable")]
    Enable { id: MenuItemId },
    #[command(name = "disable")]
    Disable { id: MenuItemId },
    /// Поменять местами с предыдущим соседом
    #[command(name = "move-up")]
    MoveUp { id: MenuItemId },
    /// Поменять местами со следующим соседом
    #[command(name = "move-down")]
    MoveDown { id: MenuItemId },
    /// Показать дерево
    #[command(name = "list")]
    List {
        /// Показать только поддерево этого пункта
        #[arg(long)]
        parent: Option<MenuItemId>,
        #[arg(long)]
        json: bool,
    },
    /// Показать пункт по id
    #[command(name = "show")]
    Show { id: MenuItemId },
    /// Варианты выбора родителя
    #[command(name = "parents")]
    Parents {
        #[arg(long)]
        exclude: Option<MenuItemId>,
    },
    /// HTML таблица и список выбора родителя
    #[command(name = "html")]
    Html {
        #[arg(long)]
        exclude: Option<MenuItemId>,
        #[arg(long)]
        selected: Option<MenuItemId>,
    },
    /// Навигационная панель: только включенные пункты
    #[command(name = "nav")]
    Nav,
}

impl MenuSubcommand {
    fn name(&self) -> &'static str {
        match self {
            MenuSubcommand::Add(_) => "menu.add",
            MenuSubcommand::Edit { .. } => "menu.edit",
            MenuSubcommand::Delete { .. } => "menu.delete",
            MenuSubcommand::Enable { .. } => "menu.enable",
            MenuSubcommand::Disable { .. } => "menu.disable",
            MenuSubcommand::MoveUp { .. } => "menu.move_up",
            MenuSubcommand::MoveDown { .. } => "menu.move_down",
            MenuSubcommand::List { .. } => "menu.list",
            MenuSubcommand::Show { .. } => "menu.show",
            MenuSubcommand::Parents { .. } => "menu.parents",
            MenuSubcommand::Html { .. } => "menu.html",
            MenuSubcommand::Nav => "menu.nav",
        }
    }

    /// id пункта, над которым работает команда
    fn target_id(&self) -> Option<MenuItemId> {
        match self {
            MenuSubcommand::Edit { id, .. }
            | MenuSubcommand::Delete { id }
            | MenuSubcommand::Enable { id }
            | MenuSubcommand::Disable { id }
            | MenuSubcommand::MoveUp { id }
            | MenuSubcommand::MoveDown { id }
            | MenuSubcommand::Show { id } => Some(*id),
            _ => None,
        }
    }
}

impl MenuCommand {
    pub async fn execute(self, config: &SlmsConfig) -> Result<()> {
        let tree = create_menu_tree(config.database_path(), config.database.pool_size).await?;

        let mut timer = OperationTimer::new(self.command.name());
        if let Some(id) = self.command.target_id() {
            timer.add_field("item_id", id);
        }
        let result = handle(&tree, self.command).await;
        timer.finish_with_result(&result);
        result
    }
}

fn success(action: MenuAction) {
    println!("{} {}", "✓".green(), render::status_message(action));
}

async fn handle(tree: &MenuTree, cmd: MenuSubcommand) -> Result<()> {
    match cmd {
        MenuSubcommand::Add(item) => {
            let id = tree.add(item.into()).await?;
            success(MenuAction::Added);
            println!("  id: {}", id);
        }
        MenuSubcommand::Edit { id, item } => {
            tree.edit(id, item.into()).await?;
            success(MenuAction::Updated);
        }
        MenuSubcommand::Delete { id } => {
            tree.delete(id).await?;
            success(MenuAction::Deleted);
        }
        MenuSubcommand::Enable { id } => {
            tree.set_enabled(id, true).await?;
            success(MenuAction::Enabled);
        }
        MenuSubcommand::Disable { id } => {
            tree.set_enabled(id, false).await?;
            success(MenuAction::Disabled);
        }
        MenuSubcommand::MoveUp { id } => report_move(tree.move_item(id, Direction::Up).await?),
        MenuSubcommand::MoveDown { id } => {
            report_move(tree.move_item(id, Direction::Down).await?)
        }
        MenuSubcommand::List { parent, json } => {
            let forest = tree.load_forest().await?;
            if json {
                let entries: Vec<_> = forest.walk(parent).collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            println!(
                "{} {}",
                "☰".cyan(),
                format!("Menu items: {}", forest.len()).bold()
            );
            if forest.is_empty() {
                println!("  (empty)");
            }
            for entry in forest.walk(parent) {
                let item = entry.item;
                println!(
                    "{}{} [id={} pos={}] {} {}",
                    "  ".repeat(entry.depth),
                    item.label.bold(),
                    item.id,
                    item.position,
                    item.url.as_deref().unwrap_or("-"),
                    if item.enabled { "on".green() } else { "off".red() },
                );
            }

            let orphans = forest.orphans();
            if parent.is_none() && !orphans.is_empty() {
                println!(
                    "{} {} orphaned item(s) hidden (parent deleted)",
                    "ℹ".blue(),
                    orphans.len()
                );
            }
        }
        MenuSubcommand::Show { id } => {
            let item = tree.get(id).await?.ok_or(MenuError::NotFound(id))?;
            println!("{} {}", "☐".cyan(), item.label.bold());
            println!("  id: {}", item.id);
            println!("  url: {}", item.url.as_deref().unwrap_or("-"));
            println!("  type: {}", item.item_type);
            println!("  script: {}", item.script.as_deref().unwrap_or("-"));
            println!(
                "  parent: {}",
                item.parent_id.map_or("-".to_string(), |p| p.to_string())
            );
            println!("  position: {}", item.position);
            println!("  enabled: {}", item.enabled);
            println!("  options: {}", item.options.as_deref().unwrap_or("-"));
        }
        MenuSubcommand::Parents { exclude } => {
            for option in tree.parent_options(exclude).await? {
                println!("{}{} ({})", "  ".repeat(option.depth), option.label, option.id);
            }
        }
        MenuSubcommand::Html { exclude, selected } => {
            let forest = tree.load_forest().await?;
            print!("{}", render::admin_table(forest.walk(None)));
            print!(
                "{}",
                render::parent_select(&forest.parent_options(exclude), selected)
            );
        }
        MenuSubcommand::Nav => {
            let forest = tree.load_forest().await?;
            print!("{}", render::navigation(forest.walk_enabled(None)));
        }
    }
    Ok(())
}

fn report_move(moved: bool) {
    if moved {
        success(MenuAction::Moved);
    } else {
        println!("{} {}", "ℹ".blue(), render::status_message(MenuAction::NotMoved));
    }
}
