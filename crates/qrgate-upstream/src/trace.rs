//! Correlation identifiers attached to every upstream call.

use uuid::Uuid;

/// W3C trace identifiers for a single outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceIds {
    /// 128-bit trace id.
    pub trace_id: u128,
    /// 64-bit parent span id.
    pub span_id: u64,
}

impl TraceIds {
    /// Render as a `traceparent` header value with the sampled flag cleared.
    #[must_use]
    pub fn traceparent(&self) -> String {
        format!("00-{:032x}-{:016x}-00", self.trace_id, self.span_id)
    }
}

/// Source of the random values the upstreams expect from a native client.
pub trait TraceContextSource: Send + Sync {
    /// Fresh trace identifiers for one call.
    fn next_ids(&self) -> TraceIds;
    /// Fresh client session id, sent as `baggage: sdksid=<uuid>`.
    fn session_id(&self) -> Uuid;
    /// Fresh nonce for an authorization request.
    fn nonce(&self) -> String;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTraceContext;

impl TraceContextSource for RandomTraceContext {
    fn next_ids(&self) -> TraceIds {
        // All-zero ids are invalid in a traceparent.
        TraceIds {
            trace_id: Uuid::new_v4().as_u128(),
            span_id: rand::random::<u64>().max(1),
        }
    }

    fn session_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn nonce(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
