pub(crate) mod backend;
pub(crate) mod blend;
pub(crate) mod blit;
pub(crate) mod context;
pub(crate) mod cpu;
pub(crate) mod mask;
pub(crate) mod opts;
pub(crate) mod renderer;
pub(crate) mod state;
pub(crate) mod target;
