pub mod cardinality;
pub mod value;
