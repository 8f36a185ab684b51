use crate::models::QueryTrace;

/// Sink for per-query retrieval diagnostics.
pub trait IQueryLogger: Send + Sync {
    fn log_query(&self, trace: QueryTrace);
}
