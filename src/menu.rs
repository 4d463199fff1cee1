//! Navigation menu projection.
//!
//! Hiding an entry only spares the user a dead link. The route guard is the
//! boundary; never treat a filtered menu as an authorization result.

use crate::catalog::PermissionCatalog;
use crate::types::{MenuSection, Role};

/// Keep the items `role` can open and drop sections left empty. Order is preserved.
pub fn filter_menu_by_role(
    sections: &[MenuSection],
    role: &Role,
    catalog: &PermissionCatalog,
) -> Vec<MenuSection> {
    sections
        .iter()
        .filter_map(|section| {
            let items: Vec<_> = section
                .items
                .iter()
                .filter(|item| catalog.can_access_route(role, &item.path))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| MenuSection {
                title: section.title.clone(),
                items,
            })
        })
        .collect()
}
