//! Declaration errors raised while verifying a state tree.

use thiserror::Error;

/// A structural problem in a declared state tree.
///
/// These are design-time errors: a tree that produces any of them must be
/// fixed before a machine can run it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("No states declared")]
    Empty,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("State '{referenced}' referenced by '{by}' is not declared")]
    UnknownState { referenced: String, by: String },

    #[error("No root state: every declared state has a parent")]
    NoRoot,

    #[error("Multiple root states: {roots:?}")]
    MultipleRoots { roots: Vec<String> },

    #[error("Parent links of state '{state}' form a cycle")]
    CyclicHierarchy { state: String },

    #[error("Composite state '{state}' has no initial child")]
    MissingInitialChild { state: String },

    #[error("Initial child '{initial}' is not a child of '{state}'")]
    ForeignInitialChild { state: String, initial: String },

    #[error("Composite state '{state}' has no children")]
    EmptyComposite { state: String },

    #[error("Leaf state '{state}' declares an initial child")]
    InitialOnLeaf { state: String },

    #[error("Final state '{state}' has child states")]
    FinalWithChildren { state: String },

    #[error("Final state '{state}' has outgoing transitions")]
    FinalWithTransitions { state: String },

    #[error("State '{state}' declares two transitions on '{event}' with priority {priority}")]
    DuplicateTransition {
        state: String,
        event: String,
        priority: i32,
    },

    #[error("Internal transition on '{event}' from '{state}' targets '{target}'")]
    InternalTargetMismatch {
        state: String,
        event: String,
        target: String,
    },

    #[error("Transition on '{event}' is stored on '{owner}' but declared from '{origin}'")]
    MisplacedTransition {
        owner: String,
        event: String,
        origin: String,
    },

    #[error("Hierarchy links of state '{state}' are inconsistent")]
    BrokenHierarchy { state: String },
}
