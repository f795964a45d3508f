pub(crate) mod components;
pub(crate) mod series;
pub(crate) mod solver;
