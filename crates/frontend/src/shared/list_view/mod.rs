//! Generic list view controller: filter, pagination and sort state, session
//! persistence, and role-aware fetching. Each list page supplies a
//! [`orchestrator::ListSource`] and its column declarations.

pub mod controller;
pub mod normalize;
pub mod orchestrator;
pub mod persistence;
pub mod state;
pub mod widgets;
