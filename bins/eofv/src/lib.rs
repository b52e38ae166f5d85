//! EOF container validation command line tools.

pub mod cmd;
pub mod dir_utils;
