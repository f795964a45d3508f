pub(crate) mod catalog;
pub(crate) mod definition;
pub(crate) mod step;
