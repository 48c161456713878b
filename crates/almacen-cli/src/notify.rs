//! Terminal notifier - prints action outcomes as colored lines

use almacen::{Notification, NotificationLevel, Notifier};
use colored::Colorize;

#[derive(Debug, Default, Clone)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn render(notification: &Notification) -> String {
        match notification.level {
            NotificationLevel::Success => format!("{} {}", "✓".green(), notification.message),
            NotificationLevel::Error => format!("{} {}", "✗".red(), notification.message.red()),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("{}", Self::render(&notification)),
            NotificationLevel::Error => eprintln!("{}", Self::render(&notification)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_message() {
        colored::control::set_override(false);
        let line = TerminalNotifier::render(&Notification::error("Requested 60 kg"));
        assert_eq!(line, "✗ Requested 60 kg");
    }
}
