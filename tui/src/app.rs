//! Page navigation state machine.
//!
//! [`App`] tracks which page the user is on, the back stack, and any
//! pending destructive action awaiting confirmation. It performs no I/O
//! and holds no domain data — page controllers own that through their
//! stores.

use htm_vault_core::types::SortOrder;


// ---------------------------------------------------------------------------
// PageState
// ---------------------------------------------------------------------------

/// The page the user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// Device search, the landing page.
    Search,
    /// The add-device form.
    AddDevice,
    /// One device: record, work-order list, inline forms.
    Device {
        control_number: String,
        order: SortOrder,
    },
    /// One work order: record plus inline edit form.
    WorkOrder { work_order_id: String },
}

impl PageState {
    /// Short label for the header line.
    pub fn label(&self) -> &str {
        match self {
            PageState::Search => "search",
            PageState::AddDevice => "add device",
            PageState::Device { .. } => "device",
            PageState::WorkOrder { .. } => "work order",
        }
    }
}


// ---------------------------------------------------------------------------
// PendingAction
// ---------------------------------------------------------------------------

/// A destructive action that requires confirmation first.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    RetireDevice { control_number: String },
    ReactivateDevice { control_number: String },
    CloseWorkOrder { work_order_id: String },
}

impl PendingAction {
    /// Prompt text for the confirmation overlay.
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::RetireDevice { control_number } => {
                format!("Retire device {}?", control_number)
            }
            PendingAction::ReactivateDevice { control_number } => {
                format!("Return device {} to service?", control_number)
            }
            PendingAction::CloseWorkOrder { work_order_id } => {
                format!("Close work order {}?", work_order_id)
            }
        }
    }
}


// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Navigation state for the whole TUI session.
pub struct App {
    state: PageState,
    previous_states: Vec<PageState>,
    pending: Option<PendingAction>,
    quit: bool,
}


impl App {
    pub fn new() -> Self {
        App {
            state: PageState::Search,
            previous_states: Vec::new(),
            pending: None,
            quit: false,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Navigate to a new page, remembering the current one.
    pub fn navigate_to(&mut self, state: PageState) {
        self.pending = None;
        self.previous_states.push(self.state.clone());
        self.state = state;
    }

    /// Pop back to the previous page. Returns false when already at the
    /// bottom of the stack.
    pub fn back(&mut self) -> bool {
        self.pending = None;
        match self.previous_states.pop() {
            Some(prev) => {
                self.state = prev;
                true
            }
            None => false,
        }
    }

    /// Ask for confirmation of a destructive action.
    pub fn request_confirmation(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    /// The action currently awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Confirm the pending action, handing it back for execution.
    pub fn take_confirmed(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Drop the pending action without executing it.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}


impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
