pub mod aggregate;
pub mod assemble;
pub mod filter;
pub mod paginate;
pub mod sort;
