pub mod github;
pub mod matrix;
