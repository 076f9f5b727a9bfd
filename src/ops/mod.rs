pub mod aggregate;
pub mod check;
pub mod mutate;
pub mod normalize;
pub mod search;
pub mod stats;
