/// Proof that the user went through the clear-all confirmation.
///
/// Only [`ClearGate::confirm`] can produce one, and
/// [`TaskStore::clear_all`](crate::store::TaskStore::clear_all) requires it.
#[derive(Debug)]
pub struct ClearConfirmation {
    _private: (),
}

/// Two-step guard in front of the destructive clear-all action.
///
/// The checkbox state never outlives one showing of the dialog.
#[derive(Debug, Default)]
pub struct ClearGate {
    visible: bool,
    acknowledged: bool,
}

impl ClearGate {
    pub fn open(&mut self) {
        self.visible = true;
        self.acknowledged = false;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.acknowledged = false;
    }

    pub fn toggle_acknowledged(&mut self) {
        if self.visible {
            self.acknowledged = !self.acknowledged;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Returns a confirmation and closes the dialog if the box is ticked;
    /// otherwise leaves the dialog as it is.
    pub fn confirm(&mut self) -> Option<ClearConfirmation> {
        if self.visible && self.acknowledged {
            self.dismiss();
            Some(ClearConfirmation { _private: () })
        } else {
            None
        }
    }
}
