mod bootstrap;
mod group;
mod parallel;
mod query;
mod sequential;

pub use bootstrap::BootstrapResolver;
pub use group::{GroupManager, ResolvedServer};
pub use query::ServerReply;
