//! This module acts as a central router for all component interactions.
//!
//! The main `handler.rs` file delegates here based on the component's custom_id
//! family (e.g. "userinfo").

pub mod ids;
pub mod userinfo_handler;
pub mod util;
