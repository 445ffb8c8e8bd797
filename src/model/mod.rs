//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DomainState` - business/data state (registry, layer tree, selection)
//! - `Selection` - the active server and chosen layer names
//! - `ModalStack` - modal overlay management

pub mod domain;
pub mod layer;
pub mod modal;
pub mod selection;
pub mod server;
