//! # Error Types
//!
//! Domain-specific error types for telos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  telos-core errors (this file)                                      │
//! │  └── DraftError       - Wizard transitions / validation failure     │
//! │                                                                     │
//! │  telos-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Field-level validation messages are NOT errors in this hierarchy:  │
//! │  they travel as a ValidationErrors map (see the validation module)  │
//! │  so the wizard can show all of a step's problems at once.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::draft::DraftStep;
use crate::validation::ValidationErrors;

// =============================================================================
// Draft Error
// =============================================================================

/// Errors raised by the order wizard state machine.
///
/// None of these are fatal: a validation failure keeps the draft on its
/// current step, and an invalid transition is a caller bug surfaced as a
/// typed error rather than a panic.
#[derive(Debug, Error)]
pub enum DraftError {
    /// The current step's input did not validate.
    ///
    /// Carries the full field-keyed map (collect-all semantics); the same
    /// map stays available on the draft for inline display.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The requested transition is not legal from the current step.
    #[error("cannot {action} from step {from:?}")]
    InvalidTransition {
        from: DraftStep,
        action: &'static str,
    },

    /// A branch index that does not exist in the draft.
    #[error("no branch at index {index}")]
    UnknownBranch { index: usize },
}

/// Convenience type alias for results with DraftError.
pub type DraftResult<T> = Result<T, DraftError>;

// =============================================================================
// Unit Tests
// =============================================================================
