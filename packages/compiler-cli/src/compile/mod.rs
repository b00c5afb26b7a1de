pub mod parallel;

pub use parallel::parallel_compile;
