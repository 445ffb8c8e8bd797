//! Modal stack for managing overlays
//!
//! One enum-based stack instead of a boolean flag per dialog. Only the top
//! modal receives input.

/// Represents a modal overlay displayed on top of the main screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Server manager (list, add, edit, delete)
    ServerManager,
    /// Viewer for the last downloaded map
    MapView,
    /// Help dialog showing all keyboard shortcuts
    Help,
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create a new empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert!(stack.top().is_some());

        stack.push(Modal::ServerManager);

        assert_eq!(stack.pop(), Some(Modal::ServerManager));
        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_top_is_last_pushed() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help);
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        stack.pop();
        assert_eq!(stack.top(), Some(&Modal::Help));
    }
}
