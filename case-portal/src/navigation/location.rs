use std::fmt;

/// A navigable location split into path, ordered query pairs and fragment.
///
/// Pairs read from a URL keep their original text and are written back
/// verbatim; only pairs set through `with_param` are re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    query: Vec<QueryPair>,
    pub fragment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryPair {
    key: String,
    value: String,
    raw: Option<String>,
}

impl QueryPair {
    fn parse(segment: &str) -> Option<Self> {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(segment) {
            Ok(mut pairs) if pairs.len() == 1 => {
                let (key, value) = pairs.remove(0);
                Some(Self {
                    key,
                    value,
                    raw: Some(segment.to_string()),
                })
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(segment, error = %e, "Dropping undecodable query pair");
                None
            }
        }
    }

    fn encoded(&self) -> Result<String, fmt::Error> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => serde_urlencoded::to_string([(&self.key, &self.value)]).map_err(|_| fmt::Error),
        }
    }
}

impl Location {
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (url, None),
        };
        let (path, raw_query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };

        let query = raw_query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter_map(QueryPair::parse)
            .collect();

        Self {
            path: path.to_string(),
            query,
            fragment,
        }
    }

    /// First value of `name`, if present.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|pair| pair.key == name)
            .map(|pair| pair.value.as_str())
    }

    /// Sets `name` in place when present, otherwise appends it.
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        let mut replaced = false;
        self.query.retain_mut(|pair| {
            if pair.key != name {
                return true;
            }
            if replaced {
                return false;
            }
            pair.value = value.to_string();
            pair.raw = None;
            replaced = true;
            true
        });
        if !replaced {
            self.query.push(QueryPair {
                key: name.to_string(),
                value: value.to_string(),
                raw: None,
            });
        }
        self
    }

    pub fn without_param(mut self, name: &str) -> Self {
        self.query.retain(|pair| pair.key != name);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, pair) in self.query.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            f.write_str(&pair.encoded()?)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
