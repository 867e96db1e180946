use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::params::to_query;

/// Per-call inputs and attempt state of one logical remote operation.
///
/// A context is built fresh for every call and handed to
/// [`ApiClient::call`](crate::ApiClient::call) by mutable reference, so the
/// caller can read [`attempts`](Self::attempts) once the call returns.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub(crate) path_params: Vec<(String, String)>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) cancel: Option<CancellationToken>,
    attempts: usize,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a `{name}` placeholder in the endpoint path.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.path_params.retain(|(key, _)| *key != name);
        self.path_params.push((name, value.into()));
        self
    }

    /// Appends a single query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends every present field of a serializable filter object.
    pub fn filters<T: Serialize>(mut self, filters: &T) -> Self {
        self.query.extend(to_query(filters));
        self
    }

    /// JSON request body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Header override; replaces a default header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Aborts the in-flight attempt and any pending backoff when `token` fires.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of attempts issued so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub(crate) fn begin_attempt(&mut self) -> usize {
        let index = self.attempts;
        self.attempts += 1;
        index
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RequestContext;
    use crate::ListFilters;

    #[test]
    fn header_override_replaces_case_insensitively() {
        let ctx = RequestContext::new()
            .header("X-Trace", "a")
            .header("x-trace", "b");
        assert_eq!(ctx.headers, vec![("x-trace".to_owned(), "b".to_owned())]);
    }

    #[test]
    fn path_param_keeps_last_value() {
        let ctx = RequestContext::new()
            .path_param("roomId", "1")
            .path_param("roomId", "2");
        assert_eq!(ctx.path_params, vec![("roomId".to_owned(), "2".to_owned())]);
    }

    #[test]
    fn filters_extend_query() {
        let ctx = RequestContext::new()
            .query_param("lang", "en")
            .filters(&ListFilters::default().status("live"))
            .body(json!({"ok": true}));
        assert_eq!(ctx.query.len(), 2);
        assert_eq!(ctx.body, Some(json!({"ok": true})));
    }

    #[test]
    fn attempt_counter_starts_at_zero_and_increments() {
        let mut ctx = RequestContext::new();
        assert_eq!(ctx.attempts(), 0);
        assert_eq!(ctx.begin_attempt(), 0);
        assert_eq!(ctx.begin_attempt(), 1);
        assert_eq!(ctx.attempts(), 2);
    }
}
