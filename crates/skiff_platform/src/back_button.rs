//! Prioritized hardware back-button actions

use std::fmt;

/// Handle returned by [`BackButtonActions::register`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BackButtonHandle(u64);

struct Action {
    id: u64,
    priority: i32,
    run: Box<dyn Fn()>,
}

/// Stack of registered back-button actions
///
/// Only one action runs per press: the one with the highest priority, the
/// most recently registered among equals.
#[derive(Default)]
pub struct BackButtonActions {
    actions: Vec<Action>,
    next_id: u64,
}

impl BackButtonActions {
    /// Create an empty action stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action
    pub fn register<F>(&mut self, priority: i32, action: F) -> BackButtonHandle
    where
        F: Fn() + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.actions.push(Action {
            id,
            priority,
            run: Box::new(action),
        });
        BackButtonHandle(id)
    }

    /// Remove an action; returns false if it was already gone
    pub fn unregister(&mut self, handle: BackButtonHandle) -> bool {
        let before = self.actions.len();
        self.actions.retain(|a| a.id != handle.0);
        self.actions.len() != before
    }

    /// Run the winning action; returns false when nothing is registered
    pub fn run(&self) -> bool {
        let mut winner: Option<&Action> = None;
        for action in &self.actions {
            if winner.map_or(true, |w| action.priority >= w.priority) {
                winner = Some(action);
            }
        }

        match winner {
            Some(action) => {
                tracing::debug!("running back button action (priority {})", action.priority);
                (action.run)();
                true
            }
            None => false,
        }
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is registered
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for BackButtonActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackButtonActions")
            .field("actions", &self.actions.len())
            .finish()
    }
}
