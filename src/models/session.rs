// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::auth::{Role, UserAccount};

/// The screens of the navigation shell, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Dashboard,
    Clients,
    Quotes,
    Contracts,
    Projects,
    Finance,
    Users,
}

impl Screen {
    pub const MENU: [Screen; 7] = [
        Screen::Dashboard,
        Screen::Clients,
        Screen::Quotes,
        Screen::Contracts,
        Screen::Projects,
        Screen::Finance,
        Screen::Users,
    ];

    pub fn requires_admin(self) -> bool {
        matches!(self, Screen::Users)
    }

    pub fn available_for(role: Role) -> Vec<Screen> {
        Self::MENU
            .into_iter()
            .filter(|screen| role == Role::Admin || !screen.requires_admin())
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: UserAccount,
    pub screens: Vec<Screen>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_screen_is_admin_only() {
        let user_screens = Screen::available_for(Role::User);
        assert!(!user_screens.contains(&Screen::Users));
        assert_eq!(user_screens.len(), 6);

        let admin_screens = Screen::available_for(Role::Admin);
        assert_eq!(admin_screens, Screen::MENU.to_vec());
    }
}
