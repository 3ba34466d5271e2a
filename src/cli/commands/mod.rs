mod init;
mod search;

pub use init::cmd_init;
pub use search::cmd_search;
