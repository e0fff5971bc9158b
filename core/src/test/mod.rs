pub mod common;

mod inclusion;
mod retarget;
