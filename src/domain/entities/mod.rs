//! Wire schemas exchanged with the administration backend.
//!
//! Every struct defaults its fields (`#[serde(default)]`) so that sparse
//! payloads and empty 2xx bodies decode. A 401 yields `Default::default()`.
//!
//! # Entity Types
//!
//! - [`Menu`], [`MenuTreeNode`] - Navigation menus and their tree form
//! - [`Role`] - Roles with their menu grants
//! - [`User`] - Console users
//! - [`Resource`] - API resources guarded by roles
//! - [`CurrentUser`], [`CaptchaId`], [`LoginForm`] - Login and session data
//! - [`ListResult`], [`Pagination`], [`StatusResult`], [`RecordId`] - Response envelopes

pub mod list;
pub mod login;
pub mod menu;
pub mod resource;
pub mod role;
pub mod user;

pub use list::{ListResult, PageQuery, Pagination, RecordId, StatusResult};
pub use login::{CaptchaId, CurrentUser, LoginForm, PasswordForm, hash_password};
pub use menu::{Menu, MenuKind, MenuQuery, MenuTreeNode};
pub use resource::{Resource, ResourceQuery};
pub use role::{Role, RoleMenu, RoleQuery};
pub use user::{User, UserQuery};

/// Enabled state value shared by menus, roles and users.
pub const STATUS_ENABLED: i32 = 1;
/// Disabled state value shared by menus, roles and users.
pub const STATUS_DISABLED: i32 = 2;
