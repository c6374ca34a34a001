mod backend_port;
mod following_port;

pub use backend_port::BackendPort;
pub use following_port::FollowingPort;
