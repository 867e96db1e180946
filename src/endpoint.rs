use std::fmt;

use reqwest::Url;

use crate::ApiError;

/// HTTP verbs used by the remote API.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical remote operation: name, method and path template.
///
/// Templates use `{name}` segments for path parameters, e.g.
/// `/rooms/{roomId}/events`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
}

impl Endpoint {
    pub const LIST_ROOMS: Endpoint = Endpoint::get("list rooms", "/rooms");
    pub const ROOM_DETAILS: Endpoint = Endpoint::get("room details", "/rooms/{roomId}");
    pub const ROOM_EVENTS: Endpoint = Endpoint::get("room events", "/rooms/{roomId}/events");
    pub const ANALYTICS: Endpoint = Endpoint::get("analytics", "/analytics");

    pub const fn new(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self { name, method, path }
    }

    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// Names of the placeholders in the path template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(placeholder)
    }

    /// Joins `base_url`, the substituted path and the encoded query string.
    ///
    /// Every placeholder must have a non-blank value in `path_params`.
    pub fn build_url(
        &self,
        base_url: &str,
        path_params: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<String, ApiError> {
        let mut url = Url::parse(base_url)
            .map_err(|err| ApiError::Validation(format!("invalid base URL '{base_url}': {err}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::Validation(format!("base URL '{base_url}' cannot carry a path"))
            })?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|segment| !segment.is_empty()) {
                match placeholder(segment) {
                    Some(name) => {
                        let value = path_params
                            .iter()
                            .find(|(key, _)| key == name)
                            .map(|(_, value)| value.as_str())
                            .filter(|value| !value.trim().is_empty())
                            .ok_or_else(|| {
                                ApiError::Validation(format!(
                                    "path parameter '{name}' is required for {}",
                                    self.name
                                ))
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
