pub mod block_filter;
pub mod cache;
pub mod events;
pub mod forwarding;
pub mod load_balancer;
pub mod resolver;
pub mod transport;

pub use block_filter::{BlockIndex, ClientGrouper, SuffixTrie};
pub use cache::ResponseCache;
pub use events::QueryEventEmitter;
pub use resolver::{
    BlockingResolver, CachingResolver, ResolverBuilder, ResolverChain, UpstreamResolver,
};
