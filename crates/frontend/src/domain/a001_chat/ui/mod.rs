//! Chat page UI Module (MVVM Standard)
//!
//! Structure:
//! - model.rs: API functions for /api/chat and /api/image
//! - view_model.rs: ChatPageVm with RwSignals and the send flow
//! - view.rs: Main component ChatPage

mod model;
mod view;
mod view_model;

pub use view::ChatPage;
pub use view_model::ChatPageVm;
