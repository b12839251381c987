//! Role-based access control: permission resolution and check predicates.

pub mod check;
pub mod resolver;

pub use check::{has_all_permissions, has_any_permission, has_permission};
pub use resolver::{PermissionResolver, ResolvedAccess};
