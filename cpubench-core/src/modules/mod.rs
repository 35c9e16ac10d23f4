pub mod amazon;
pub mod catalog;
