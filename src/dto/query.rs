//! Purpose: Turn typed list options into URL query parameters.
//! Exports: `QueryParams`, `NoParams`, `QueryPairs`.
//! Role: Shared contract between GET-style list queries and the HTTP client.
//! Invariants: Unset options are omitted; pair order follows field declaration order.

pub trait QueryParams {
    fn to_query_params(&self) -> Vec<(&'static str, String)>;
}

/// Placeholder for endpoints without query parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoParams;

impl QueryParams for NoParams {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Accumulator used by `QueryParams` impls.
#[derive(Debug, Default)]
pub struct QueryPairs {
    pairs: Vec<(&'static str, String)>,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, name: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn push_joined(mut self, name: &'static str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.pairs.push((name, values.join(",")));
        }
        self
    }

    pub fn finish(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}
