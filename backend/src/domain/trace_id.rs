//! Request correlation identifier.
//!
//! The trace middleware opens a scope per request; inside it, [`Error`]
//! construction and log statements pick the identifier up without it being
//! passed around. The scope is a Tokio task-local, so work moved onto
//! another task must be wrapped in [`TraceId::scope`] again.
//!
//! [`Error`]: crate::domain::Error

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one request.
///
/// ```
/// use employees::domain::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    pub(crate) fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier of the enclosing request, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_exposes_identifier_to_nested_code() {
        let outer = TraceId::random();

        let seen = TraceId::scope(outer, async {
            let inner = TraceId::random();
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (TraceId::current(), nested, inner)
        })
        .await;

        assert_eq!(seen.0, Some(outer));
        assert_eq!(seen.1, Some(seen.2));
    }

    #[tokio::test]
    async fn no_identifier_outside_a_request() {
        assert_eq!(TraceId::current(), None);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_scope() {
        let observed = TraceId::scope(TraceId::random(), async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins")
        })
        .await;

        assert_eq!(observed, None);
    }

    #[rstest]
    #[case("00000000-0000-0000-0000-000000000000")]
    #[case("6f1c1c8e-3c4f-4d0e-9a57-2f0f5a3f9b11")]
    fn header_text_parses_back(#[case] text: &str) {
        let id: TraceId = text.parse().expect("uuid text");
        assert_eq!(id.to_string(), text);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn non_uuid_text_is_rejected(#[case] text: &str) {
        assert!(text.parse::<TraceId>().is_err());
    }
}
