pub mod computing;
pub mod money;
