pub mod charts;
pub mod info;
pub mod map;
pub mod panels;
pub mod tree;
