pub mod logger;
pub mod styles;

pub static CHECK: &str = "✔";
pub static MARK: &str = "✘";
