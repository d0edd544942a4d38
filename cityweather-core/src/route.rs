use std::borrow::Cow;

/// The two navigable views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Directory,
    /// `/weather/<place>`
    Weather { place: String },
}

impl Route {
    pub fn weather(place: impl Into<String>) -> Self {
        Route::Weather { place: place.into() }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Some(Route::Directory);
        }

        let encoded = trimmed.strip_prefix("/weather/")?.trim_end_matches('/');
        if encoded.is_empty() || encoded.contains('/') {
            return None;
        }

        let place = urlencoding::decode(encoded).ok()?;
        Some(Route::Weather {
            place: place.into_owned(),
        })
    }

    pub fn path(&self) -> Cow<'static, str> {
        match self {
            Route::Directory => Cow::Borrowed("/"),
            Route::Weather { place } => {
                Cow::Owned(format!("/weather/{}", urlencoding::encode(place)))
            }
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
