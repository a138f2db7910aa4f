//! Slash and prefix command entry points.

pub mod userinfo;
