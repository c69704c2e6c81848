pub mod config;
pub mod mine;
pub mod search;
pub mod status;

pub use mine::run_mine;
pub use search::{run_list, run_search};
pub use status::show_status;
