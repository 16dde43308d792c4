//! Reachability checks reported by `status`.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// Probes give up after this long.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote services, by display name.
pub const TARGETS: &[(&str, &str)] = &[
  ("World Bank", "https://api.worldbank.org/v2/country/USA"),
  ("Census", "https://api.census.gov/data.json"),
  ("NCES Digest", "https://nces.ed.gov/programs/digest/"),
  ("NAEP", "https://www.nationsreportcard.gov/"),
  ("ECLS", "https://nces.ed.gov/ecls/"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
  pub name:      &'static str,
  pub url:       String,
  pub reachable: bool,
}

pub fn client() -> reqwest::Result<Client> {
  Client::builder().timeout(PROBE_TIMEOUT).build()
}

/// `HEAD url`; reachable when the server answers below 400.
pub async fn reachable(client: &Client, url: &str) -> bool {
  match client.head(url).send().await {
    Ok(resp) => resp.status().as_u16() < 400,
    Err(e) => {
      debug!(%url, error = %e, "probe failed");
      false
    }
  }
}

/// Probe every target in turn.
pub async fn probe_all(client: &Client, targets: &[(&'static str, &str)]) -> Vec<Probe> {
  let mut probes = Vec::with_capacity(targets.len());
  for &(name, url) in targets {
    probes.push(Probe {
      name,
      url: url.to_owned(),
      reachable: reachable(client, url).await,
    });
  }
  probes
}
