pub mod blob;
pub mod commit;
pub mod tree;
