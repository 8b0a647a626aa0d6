pub mod response_sink;
pub mod worker_port;
