pub mod file;
pub mod inline;
pub mod stdin;
