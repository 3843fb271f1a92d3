mod handle_dns_query;
mod outcome;
mod resolve_proxy;

pub use handle_dns_query::HandleDnsQueryUseCase;
pub use outcome::DnsOutcome;
pub use resolve_proxy::{ChainStage, ProxyChainState, RedirectTarget, ResolveProxyUseCase};
