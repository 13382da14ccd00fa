//! Role-gated visibility: which panels a role sees and which entries it may read.

use crate::user::{Identity, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    NewEntry,
    History,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub panel: Panel,
    pub label: &'static str,
}

/// Menu entries shown to `role`, in display order.
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(3);

    if can_submit_entries(role) {
        items.push(MenuItem {
            panel: Panel::NewEntry,
            label: "New Entry",
        });
    }

    items.push(MenuItem {
        panel: Panel::History,
        label: "Work History",
    });

    match role {
        Role::Admin => items.push(MenuItem {
            panel: Panel::Admin,
            label: "Admin Panel",
        }),
        Role::Supervisor => items.push(MenuItem {
            panel: Panel::Admin,
            label: "Manage Locations",
        }),
        _ => {}
    }

    items
}

/// Panel opened right after sign-in.
pub fn default_panel(role: Role) -> Panel {
    match role {
        Role::Admin => Panel::Admin,
        Role::Supervisor | Role::Employee => Panel::NewEntry,
        _ => Panel::History,
    }
}

pub fn can_submit_entries(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Employee | Role::Supervisor)
}

pub fn can_delete_entries(role: Role) -> bool {
    role.is_admin()
}

pub fn can_manage_reference(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Supervisor)
}

pub fn can_manage_users(role: Role) -> bool {
    role.is_admin()
}

/// Which work entries an identity may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryScope {
    All,
    City(String),
    /// Non-admin without a city: sees nothing.
    Nothing,
}

impl EntryScope {
    pub fn permits(&self, city_id: &str) -> bool {
        match self {
            EntryScope::All => true,
            EntryScope::City(own) => own == city_id,
            EntryScope::Nothing => false,
        }
    }
}

pub fn entry_scope(identity: &Identity) -> EntryScope {
    if identity.is_admin() {
        return EntryScope::All;
    }
    match &identity.city_id {
        Some(city) if !city.is_empty() => EntryScope::City(city.clone()),
        _ => EntryScope::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role, city: Option<&str>) -> Identity {
        Identity {
            id: "u".into(),
            email: "u@fieldops.local".into(),
            full_name: "U".into(),
            role,
            city_id: city.map(String::from),
        }
    }

    fn panels(role: Role) -> Vec<Panel> {
        menu_for(role).into_iter().map(|m| m.panel).collect()
    }

    #[test]
    fn test_admin_menu() {
        assert_eq!(
            panels(Role::Admin),
            vec![Panel::NewEntry, Panel::History, Panel::Admin]
        );
        assert_eq!(menu_for(Role::Admin)[2].label, "Admin Panel");
    }

    #[test]
    fn test_supervisor_menu_labels_admin_panel_as_locations() {
        let menu = menu_for(Role::Supervisor);
        assert_eq!(menu.len(), 3);
        assert_eq!(menu[2].panel, Panel::Admin);
        assert_eq!(menu[2].label, "Manage Locations");
    }

    #[test]
    fn test_read_only_roles_only_see_history() {
        for role in [Role::Customer, Role::Engineer, Role::ExecutiveEngineer] {
            assert_eq!(panels(role), vec![Panel::History]);
            assert_eq!(default_panel(role), Panel::History);
        }
    }

    #[test]
    fn test_default_panels() {
        assert_eq!(default_panel(Role::Admin), Panel::Admin);
        assert_eq!(default_panel(Role::Supervisor), Panel::NewEntry);
        assert_eq!(default_panel(Role::Employee), Panel::NewEntry);
    }

    #[test]
    fn test_default_panel_is_always_in_menu() {
        for role in Role::ALL {
            assert!(panels(role).contains(&default_panel(role)));
        }
    }

    #[test]
    fn test_entry_scope() {
        assert_eq!(entry_scope(&identity(Role::Admin, None)), EntryScope::All);
        assert_eq!(
            entry_scope(&identity(Role::Admin, Some("c1"))),
            EntryScope::All
        );
        assert_eq!(
            entry_scope(&identity(Role::Engineer, Some("c1"))),
            EntryScope::City("c1".into())
        );
        assert_eq!(
            entry_scope(&identity(Role::Customer, None)),
            EntryScope::Nothing
        );
    }

    #[test]
    fn test_non_admin_never_permitted_other_city() {
        for role in Role::ALL.into_iter().filter(|r| !r.is_admin()) {
            let scope = entry_scope(&identity(role, Some("c1")));
            assert!(scope.permits("c1"));
            assert!(!scope.permits("c2"), "{role} could see another city");
        }
    }

    #[test]
    fn test_only_admin_deletes_entries_and_manages_users() {
        for role in Role::ALL {
            assert_eq!(can_delete_entries(role), role == Role::Admin);
            assert_eq!(can_manage_users(role), role == Role::Admin);
        }
        assert!(can_manage_reference(Role::Supervisor));
        assert!(!can_manage_reference(Role::Employee));
    }
}
