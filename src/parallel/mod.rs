pub mod matrix;
pub mod pool;

pub use matrix::{round_robin, standings, write_matrix_csv, MatchupRow, Standing};
pub use pool::WorkerPool;
