//! HTTP session for the destination service, optionally routed through a SOCKS proxy.

use std::time::Duration;

use serde_json::Value;

use crate::{config::Proxy, destination::error::DestinationError};

const PROBE_URL: &str = "https://check.torproject.org/api/ip";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of the startup connectivity check
#[derive(Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Direct,
    /// proxy answered, with the address the outside world sees
    Proxied { ip: Option<String> },
    /// proxy answered with an unexpected status
    Unverified { status: u16 },
    Failed { reason: String },
}

pub struct Session {
    pub agent: ureq::Agent,
    pub proxy: Option<Proxy>,
}

impl Session {
    pub fn new(proxy: Option<Proxy>) -> Result<Self, DestinationError> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(15))
            .timeout_read(Duration::from_secs(30))
            .timeout_write(Duration::from_secs(30));

        if let Some(proxy) = &proxy {
            let url = proxy.url();
            let socks = ureq::Proxy::new(&url).map_err(|e| DestinationError::Proxy {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            log::info!("Configured proxy: {url}");
            builder = builder.proxy(socks);
        }

        Ok(Self {
            agent: builder.build(),
            proxy,
        })
    }

    /// Checks that the proxy works. Never fails, problems are reported in the status.
    pub fn probe_connection(&self) -> ConnectionStatus {
        if self.proxy.is_none() {
            return ConnectionStatus::Direct;
        }

        match self.agent.get(PROBE_URL).timeout(PROBE_TIMEOUT).call() {
            Ok(response) => match response.into_json::<Value>() {
                Ok(body) => ConnectionStatus::Proxied {
                    ip: body.get("IP").and_then(Value::as_str).map(str::to_string),
                },
                Err(_) => ConnectionStatus::Proxied { ip: None },
            },
            Err(ureq::Error::Status(status, _)) => ConnectionStatus::Unverified { status },
            Err(e) => ConnectionStatus::Failed {
                reason: e.to_string(),
            },
        }
    }
}
