use axum::http::Method;

use super::Role;

/// What a request must present to reach a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials needed
    Public,
    /// Any known identity
    Authenticated,
    /// An identity holding at least one of these roles
    AnyRole(&'static [Role]),
}

#[derive(Debug, Clone, Copy)]
enum PathPattern {
    Exact(&'static str),
    /// Matches the prefix itself and anything beneath it (`/x/**`)
    Under(&'static str),
}

impl PathPattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == *p,
            PathPattern::Under(p) => {
                path == *p || path.strip_prefix(p).map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }
}

struct AccessRule {
    method: Option<Method>,
    path: PathPattern,
    access: Access,
}

const READERS: &[Role] = &[Role::ReadOnly, Role::ReadWrite];
const WRITERS: &[Role] = &[Role::ReadWrite];

/// Evaluated top to bottom; the first match wins.
const RULES: &[AccessRule] = &[
    AccessRule { method: Some(Method::DELETE), path: PathPattern::Under("/v1/delete-person"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Under("/v3/api-docs"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Exact("/swagger-ui.html"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Under("/swagger-ui"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Exact("/"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Exact("/health"), access: Access::Public },
    AccessRule { method: None, path: PathPattern::Under("/v1/get-person"), access: Access::AnyRole(READERS) },
    AccessRule { method: None, path: PathPattern::Exact("/v1/post-person"), access: Access::AnyRole(WRITERS) },
];

/// Look up the requirement for a request. Unlisted routes need an
/// authenticated identity.
pub fn required_access(method: &Method, path: &str) -> Access {
    RULES
        .iter()
        .find(|rule| {
            rule.method.as_ref().map_or(true, |m| m == method) && rule.path.matches(path)
        })
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}
