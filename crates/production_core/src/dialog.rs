pub const CANCEL_LABEL: &str = "Cancel";
pub const CONFIRM_LABEL: &str = "Confirm";
pub const PROCESSING_LABEL: &str = "Processing...";

/// Props of the modal gate in front of destructive actions. Owners rebuild it
/// from their own state each frame; it holds nothing of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmationDialog {
    pub open: bool,
    pub title: String,
    pub message: String,
    pub in_flight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogAction {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub cancel: DialogAction,
    pub confirm: DialogAction,
}

impl ConfirmationDialog {
    pub fn new(
        open: bool,
        title: impl Into<String>,
        message: impl Into<String>,
        in_flight: bool,
    ) -> Self {
        Self {
            open,
            title: title.into(),
            message: message.into(),
            in_flight,
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<DialogView<'_>> {
        if !self.open {
            return None;
        }
        Some(DialogView {
            title: &self.title,
            message: &self.message,
            cancel: DialogAction {
                label: CANCEL_LABEL,
                enabled: !self.in_flight,
            },
            confirm: DialogAction {
                label: if self.in_flight {
                    PROCESSING_LABEL
                } else {
                    CONFIRM_LABEL
                },
                enabled: !self.in_flight,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_dialog_renders_nothing() {
        assert!(ConfirmationDialog::closed().view().is_none());
        assert!(ConfirmationDialog::new(false, "t", "m", true).view().is_none());
    }

    #[test]
    fn idle_dialog_enables_both_actions() {
        let dialog = ConfirmationDialog::new(true, "Delete product", "Really?", false);
        let view = dialog.view().expect("open");
        assert_eq!(view.title, "Delete product");
        assert_eq!(view.message, "Really?");
        assert!(view.cancel.enabled);
        assert!(view.confirm.enabled);
        assert_eq!(view.confirm.label, CONFIRM_LABEL);
    }

    #[test]
    fn in_flight_dialog_disables_actions_and_shows_processing() {
        let dialog = ConfirmationDialog::new(true, "Undo", "Undo it?", true);
        let view = dialog.view().expect("open");
        assert!(!view.cancel.enabled);
        assert!(!view.confirm.enabled);
        assert_eq!(view.confirm.label, PROCESSING_LABEL);
    }
}
