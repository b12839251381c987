//! Role and permission domain entities.

pub mod assignment;
pub mod grant;
pub mod model;

pub use assignment::{RolePermission, UserRole};
pub use grant::RoleGrant;
pub use model::{Permission, Role};
