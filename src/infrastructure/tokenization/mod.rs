mod heuristic_counter;
mod tiktoken_counter;

pub use heuristic_counter::HeuristicCounter;
pub use tiktoken_counter::TiktokenCounter;
