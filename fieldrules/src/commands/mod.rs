pub mod check;
pub mod process;
