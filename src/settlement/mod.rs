pub mod balance;
pub mod engine;
pub mod greedy;
pub mod matrix;
pub mod plan;
pub mod simplify;
