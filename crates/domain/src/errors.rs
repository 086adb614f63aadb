use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid upstream endpoint: {0}")]
    InvalidUpstream(String),

    #[error("Group '{group}' references unknown denylist '{denylist}'")]
    UnknownDenylist { group: String, denylist: String },

    #[error("Duplicate upstream group: {0}")]
    DuplicateGroup(String),

    #[error("No upstream groups configured")]
    NoUpstreamGroups,

    #[error("Upstream group '{0}' has no servers")]
    NoUpstreamServers(String),

    #[error("No enabled resolvers in chain")]
    NoEnabledResolvers,

    #[error("Bootstrap resolution failed for '{host}': {reason}")]
    BootstrapFailed { host: String, reason: String },

    #[error("Query timeout after {0:?}")]
    QueryTimeout(Duration),

    #[error("All upstream servers failed")]
    AllUpstreamsFailed,

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Transport-level failures are retryable against another upstream group;
    /// DNS-level errors and cancellation are not.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout(_)
                | DomainError::AllUpstreamsFailed
                | DomainError::IoError(_)
        )
    }
}
