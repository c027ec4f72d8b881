pub mod api;
pub mod context;
pub mod guard;
pub mod role;
pub mod storage;
