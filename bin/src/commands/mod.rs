//! CLI command implementations.

pub(crate) mod browse;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod render;
pub(crate) mod render_all;
pub(crate) mod status;
