//! Resource identity: path segments below the API base URL plus query parameters.

use std::fmt;

/// A resource location relative to the API base URL.
///
/// Two endpoints are the same resource when both their segments and their
/// query parameters are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// `GET /agents` -> `{ agents: [...], count }`
pub fn agents() -> Endpoint {
    Endpoint::new(["agents"])
}

/// `GET /agents/{id}` -> agent object
pub fn agent(agent_id: &str) -> Endpoint {
    Endpoint::new(["agents", agent_id])
}

/// `GET /tasks` -> `{ tasks: [...], count }`
pub fn tasks() -> Endpoint {
    Endpoint::new(["tasks"])
}

/// `GET /tasks/{id}` and `DELETE /tasks/{id}`
pub fn task(task_id: &str) -> Endpoint {
    Endpoint::new(["tasks", task_id])
}

/// `GET /agent/status`
pub fn agent_status() -> Endpoint {
    Endpoint::new(["agent", "status"])
}

/// `GET /memory`
pub fn memory() -> Endpoint {
    Endpoint::new(["memory"])
}

/// `POST /think`
pub fn think() -> Endpoint {
    Endpoint::new(["think"])
}

/// `POST /agent/reset`
pub fn agent_reset() -> Endpoint {
    Endpoint::new(["agent", "reset"])
}

/// `GET /memory/search?query=&limit=`
///
/// Returns `None` for a blank query; the server would search for nothing.
pub fn memory_search(query: &str, limit: u32) -> Option<Endpoint> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(
        Endpoint::new(["memory", "search"])
            .with_query("query", query)
            .with_query("limit", limit.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_query() {
        let endpoint = memory_search("  seo audit ", 10).unwrap();
        assert_eq!(endpoint.to_string(), "/memory/search?query=seo audit&limit=10");
    }

    #[test]
    fn test_blank_search_is_rejected() {
        assert!(memory_search("   ", 10).is_none());
    }

    #[test]
    fn test_identity_includes_query_parameters() {
        let a = memory_search("seo", 5).unwrap();
        let b = memory_search("seo", 10).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, memory_search("seo", 5).unwrap());
    }

    #[test]
    fn test_named_endpoints() {
        assert_eq!(agent_status().to_string(), "/agent/status");
        assert_eq!(task("task_1_20240101").segments(), ["tasks", "task_1_20240101"]);
    }
}
