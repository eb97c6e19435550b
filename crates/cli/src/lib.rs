//! Command implementations behind the `downloads-sorter` binary.
pub mod inspect;
pub mod sort;
pub mod watch;
