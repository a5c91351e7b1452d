//! Core logic for spotter: the plan editor state machine, the exercise
//! picker, dense-order re-sequencing, the trainer gate, and the
//! plan-staleness revalidation signal.

pub mod auth;
pub mod editor;
pub mod order;
pub mod picker;
pub mod revalidate;
pub mod store;
