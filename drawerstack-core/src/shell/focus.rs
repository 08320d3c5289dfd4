//! Keyboard focus trap for the top-most shell.

use serde::{Deserialize, Serialize};

/// Where keyboard focus sits inside a trapped shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "index")]
pub enum FocusTarget {
    /// The n-th focusable element of the hosted content.
    Element(usize),
    /// The shell container itself (content has nothing focusable).
    Container,
}

/// Focus state of one shell. Inert unless trapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTrap {
    target: Option<FocusTarget>,
    focusable_count: usize,
}

impl FocusTrap {
    pub fn is_trapped(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<FocusTarget> {
        self.target
    }

    /// Take focus, landing on the first focusable element or the container.
    ///
    /// Re-trapping an already trapped shell keeps its current target when it
    /// is still valid, so returning to a drawer does not reset the cursor.
    pub fn trap(&mut self, focusable_count: usize) {
        self.focusable_count = focusable_count;
        let keep = match self.target {
            Some(FocusTarget::Element(i)) => i < focusable_count,
            Some(FocusTarget::Container) => focusable_count == 0,
            None => false,
        };
        if !keep {
            self.target = Some(first_target(focusable_count));
        }
    }

    pub fn release(&mut self) {
        self.target = None;
    }

    /// Tab: next element, wrapping inside the trap.
    pub fn focus_next(&mut self) -> Option<FocusTarget> {
        self.step(1)
    }

    /// Shift-Tab: previous element, wrapping inside the trap.
    pub fn focus_prev(&mut self) -> Option<FocusTarget> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<FocusTarget> {
        let target = self.target?;
        let next = match target {
            FocusTarget::Container => first_target(self.focusable_count),
            FocusTarget::Element(_) if self.focusable_count == 0 => FocusTarget::Container,
            FocusTarget::Element(i) => {
                let n = self.focusable_count as isize;
                FocusTarget::Element(((i as isize + delta).rem_euclid(n)) as usize)
            }
        };
        self.target = Some(next);
        self.target
    }
}

fn first_target(focusable_count: usize) -> FocusTarget {
    if focusable_count > 0 {
        FocusTarget::Element(0)
    } else {
        FocusTarget::Container
    }
}
