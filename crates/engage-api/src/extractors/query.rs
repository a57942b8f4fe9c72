//! Optional list filters taken from the query string

use serde::Deserialize;

/// `?channel=LINE`
#[derive(Debug, Default, Deserialize)]
pub struct ChannelFilter {
    #[serde(default)]
    pub channel: Option<String>,
}

impl ChannelFilter {
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// `?status=FAILED`
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilter {
    #[serde(default)]
    pub status: Option<String>,
}

impl DeliveryFilter {
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.trim().is_empty())
    }
}
