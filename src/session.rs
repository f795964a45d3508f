pub(crate) mod classify;
pub(crate) mod layout;
pub(crate) mod state;
