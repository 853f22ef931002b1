/// Ticks a notification stays visible. The app ticks every 75 ms.
pub const NOTIFICATION_TICKS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Info,
    Destructive,
}

/// Transient toast shown on top of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub(crate) ticks_left: u32,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Info)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Destructive)
    }

    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
            ticks_left: NOTIFICATION_TICKS,
        }
    }
}
