use serde::{Deserialize, Serialize};

/// Static declaration of an interactive notification category: an identifier
/// plus the ordered actions shown on notifications delivered under it.
/// Registered once at startup; not involved in the permission state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCategory {
    pub identifier: String,
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub identifier: String,
    pub title: String,
    pub activation: ActivationMode,
}

/// Whether triggering the action brings the app to the foreground or runs it
/// in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationMode {
    Foreground,
    Background,
}

/// The demo yes/no category this project ships with.
pub fn demo_category() -> NotificationCategory {
    NotificationCategory {
        identifier: "test_category".to_string(),
        actions: vec![
            NotificationAction {
                identifier: "yes_action".to_string(),
                title: "Yes".to_string(),
                activation: ActivationMode::Background,
            },
            NotificationAction {
                identifier: "no_action".to_string(),
                title: "No".to_string(),
                activation: ActivationMode::Background,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_category_keeps_action_order() {
        let category = demo_category();
        assert_eq!(category.identifier, "test_category");
        let identifiers: Vec<&str> = category
            .actions
            .iter()
            .map(|action| action.identifier.as_str())
            .collect();
        assert_eq!(identifiers, ["yes_action", "no_action"]);
    }
}
