pub mod extract;
pub mod flow;
pub mod merge;
pub mod pricing;

