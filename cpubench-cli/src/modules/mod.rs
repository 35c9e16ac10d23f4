pub mod browse;
pub mod compare;
pub mod favorites;
pub mod prices;
pub mod rank;
pub mod sources;
