pub mod analyze;
pub mod extract;
pub mod init;
pub mod print;

pub use analyze::execute_analyze;
pub use extract::execute_extract;
pub use init::execute_init;
pub use print::execute_print;
