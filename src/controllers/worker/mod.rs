pub mod codec;
pub mod errors;
pub mod inline_worker;
pub mod messages;
pub mod ports;
pub mod scheduler;
pub mod stdio;
pub mod thread_worker;
pub(crate) mod worker_loop;
