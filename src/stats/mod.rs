pub mod counters;
pub mod delta;
pub mod kill;
pub mod reader;
