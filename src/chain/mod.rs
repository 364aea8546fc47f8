//! Effect chains: instances, the nested chain tree, editor selection and shared storage.

/// Chain leaves.
pub mod instance;
/// Editor selection helpers.
pub mod selection;
/// Copy-on-write chain storage.
pub mod store;
/// Path- and id-addressed tree operations.
pub mod tree;
