pub(crate) mod render;
pub(crate) mod terminal;
pub(crate) mod theme;
