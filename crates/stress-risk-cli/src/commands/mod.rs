pub mod estimate;
pub mod value;
