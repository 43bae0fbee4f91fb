//! Menu schema and the menu hierarchy rule.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::list::PageQuery;

/// A menu record.
///
/// `type` is one of the [`MenuKind`] codes. `is_hide` and `status` use
/// `1`/`2` for yes/no and enabled/disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Menu {
    pub record_id: String,
    #[validate(length(min = 1, message = "menu code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "menu name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: i32,
    pub sequence: i32,
    pub icon: String,
    pub path: String,
    pub method: String,
    pub level_code: String,
    pub parent_id: String,
    #[validate(range(min = 1, max = 2, message = "is_hide must be 1 or 2"))]
    pub is_hide: i32,
    #[validate(range(min = 1, max = 2, message = "status must be 1 or 2"))]
    pub status: i32,
    pub creator: String,
    pub created: i64,
    pub updated: i64,
}

impl Menu {
    pub fn menu_kind(&self) -> Option<MenuKind> {
        MenuKind::from_code(self.kind)
    }
}

/// Level of a menu in the navigation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    System,
    Module,
    Function,
    Resource,
}

impl MenuKind {
    pub fn code(&self) -> i32 {
        match self {
            MenuKind::System => 10,
            MenuKind::Module => 20,
            MenuKind::Function => 30,
            MenuKind::Resource => 40,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(MenuKind::System),
            20 => Some(MenuKind::Module),
            30 => Some(MenuKind::Function),
            40 => Some(MenuKind::Resource),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuKind::System => "system",
            MenuKind::Module => "module",
            MenuKind::Function => "function",
            MenuKind::Resource => "resource",
        }
    }

    /// Checks where a menu of this kind may be placed.
    ///
    /// Systems are roots. Modules and functions hang under a system or a
    /// module. Resources hang under a function.
    pub fn check_parent(&self, parent: Option<MenuKind>) -> Result<(), &'static str> {
        match (self, parent) {
            (MenuKind::System, None) => Ok(()),
            (MenuKind::System, Some(_)) => Err("a system menu cannot have a parent menu"),
            (_, None) => Err("a parent menu is required"),
            (MenuKind::Module, Some(MenuKind::System | MenuKind::Module)) => Ok(()),
            (MenuKind::Module, Some(_)) => Err("a module depends on a system or a module"),
            (MenuKind::Function, Some(MenuKind::System | MenuKind::Module)) => Ok(()),
            (MenuKind::Function, Some(_)) => Err("a function depends on a system or a module"),
            (MenuKind::Resource, Some(MenuKind::Function)) => Ok(()),
            (MenuKind::Resource, Some(_)) => Err("a resource depends on a function"),
        }
    }
}

/// Node of a menu tree as returned by tree queries and `GET /current/menutree`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuTreeNode {
    pub record_id: String,
    pub code: String,
    pub name: String,
    pub icon: String,
    pub path: String,
    pub router: String,
    pub level_code: String,
    pub parent_id: String,
    pub parent_path: String,
    #[serde(rename = "type")]
    pub kind: i32,
    pub sequence: i32,
    pub children: Vec<MenuTreeNode>,
}

/// Query parameters of `GET /menus`.
///
/// `type` selects the reply form: `page` for a paged list, `tree` for a tree.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuQuery {
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub status: Option<i32>,
    pub is_menu: Option<i32>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl MenuQuery {
    pub fn page(page: PageQuery) -> Self {
        Self {
            mode: Some("page".to_string()),
            page,
            ..Default::default()
        }
    }

    /// Tree of navigable menus (resources excluded).
    pub fn tree() -> Self {
        Self {
            mode: Some("tree".to_string()),
            is_menu: Some(1),
            ..Default::default()
        }
    }
}
