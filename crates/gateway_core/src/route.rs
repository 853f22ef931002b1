use std::fmt;

/// Client-side routes. Anything that is not one of the five known paths maps to
/// `NotFound` and keeps the requested path for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Tools,
    Articulate,
    Processing,
    Complete,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "" | "/" => Route::Dashboard,
            "/tools" => Route::Tools,
            "/articulate" => Route::Articulate,
            "/processing" => Route::Processing,
            "/complete" => Route::Complete,
            other => Route::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Dashboard => "/",
            Route::Tools => "/tools",
            Route::Articulate => "/articulate",
            Route::Processing => "/processing",
            Route::Complete => "/complete",
            Route::NotFound(path) => path,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_round_trip() {
        for route in [
            Route::Dashboard,
            Route::Tools,
            Route::Articulate,
            Route::Processing,
            Route::Complete,
        ] {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn trailing_slash_and_unknown_paths() {
        assert_eq!(Route::parse("/tools/"), Route::Tools);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(
            Route::parse("/nope"),
            Route::NotFound("/nope".to_string())
        );
    }
}
