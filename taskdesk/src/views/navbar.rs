//! Top navigation line.

use crate::models::Session;

/// Navigable sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Tasks,
    Profile,
}

impl Section {
    const ALL: [Self; 3] = [Self::Dashboard, Self::Tasks, Self::Profile];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tasks => "Tasks",
            Self::Profile => "Profile",
        }
    }
}

/// Navigation line for `session`, or `None` when nobody is logged in.
pub fn render_navbar(session: &Session, active: Option<Section>) -> Option<String> {
    if !session.is_authenticated {
        return None;
    }

    let mut items: Vec<String> = Section::ALL
        .iter()
        .map(|&section| {
            if Some(section) == active {
                format!("[{}]", section.label())
            } else {
                section.label().to_string()
            }
        })
        .collect();

    items.push(match session.user.as_ref() {
        Some(user) => format!("Logout ({})", user.display_name()),
        None => "Logout".to_string(),
    });

    Some(format!("TaskManager  {}", items.join(" | ")))
}
