// src/services/confirmation.rs
//
// Yes/no gate in front of destructive actions.

/// Asked before a delete goes out. Declining is not an error.
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// An answer the front end collected before dispatching the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preconfirmed(pub bool);

impl ConfirmationGate for Preconfirmed {
    fn confirm(&self, prompt: &str) -> bool {
        log::debug!("confirmation {:?} answered {}", prompt, self.0);
        self.0
    }
}
