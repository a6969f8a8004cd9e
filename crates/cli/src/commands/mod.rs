pub(crate) mod check;
pub(crate) mod formula;
pub(crate) mod preview;
pub(crate) mod store;
pub(crate) mod validate;
