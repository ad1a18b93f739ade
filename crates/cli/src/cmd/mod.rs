mod interpret;
mod listen;
mod litany;
mod prompt;
mod status;

pub use interpret::cmd_interpret;
pub use listen::cmd_listen;
pub use litany::cmd_litany;
pub use prompt::cmd_prompt;
pub use status::cmd_status;
