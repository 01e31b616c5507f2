//! Domain layer: conversation and catalog models plus the stage state machine.

pub mod catalog;
pub mod conversation;
pub mod foundation;
