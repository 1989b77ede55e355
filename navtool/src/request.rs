use std::str::FromStr;

use anyhow::Context;
use navtree::{Method, StaticRequest};

/// A `LEVEL=KEY` pair given with `--current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentOverride {
    pub level: usize,
    pub key: String,
}

impl FromStr for CurrentOverride {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, key) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected LEVEL=KEY, got {s:?}"))?;
        let level = level
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid level in {s:?}"))?;
        if level == 0 {
            bail!("levels start at 1, got {s:?}");
        }
        let key = key.trim();
        if key.is_empty() {
            bail!("missing key in {s:?}");
        }
        Ok(Self {
            level,
            key: key.to_string(),
        })
    }
}

/// Build the simulated request from the command line values.
pub fn build_request(
    path: &str,
    method: Option<&str>,
    query: Option<&str>,
) -> anyhow::Result<StaticRequest> {
    let method = match method {
        Some(m) => m.parse::<Method>()?,
        None => Method::Get,
    };
    let mut request = StaticRequest::new(method, path);
    if let Some(query) = query {
        request = request.with_query(query);
    }
    debug!("simulated request: {request:?}");
    Ok(request)
}
