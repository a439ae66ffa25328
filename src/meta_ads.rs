//! Meta graph API read client.
//!
//! Pass-through integration: ad accounts and campaign listings are fetched
//! with a caller-supplied access token, campaign rows are enriched with their
//! most recent insights, and upstream errors are surfaced as-is. No caching,
//! no retry.

use std::fmt;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v18.0";

const CAMPAIGN_FIELDS: &str = "id,name,status,objective,daily_budget,lifetime_budget";
const INSIGHT_FIELDS: &str =
    "impressions,clicks,spend,cpm,cpc,ctr,conversions,cost_per_conversion";

#[derive(Debug)]
pub enum MetaAdsError {
    /// Error reported by the graph API (authentication, rate limit, ...);
    /// carries the upstream message.
    Upstream(String),
    /// Transport-level failure before a graph response was obtained.
    Request(String),
}

impl fmt::Display for MetaAdsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaAdsError::Upstream(msg) => write!(f, "{}", msg),
            MetaAdsError::Request(msg) => write!(f, "Graph API request failed: {}", msg),
        }
    }
}

impl std::error::Error for MetaAdsError {}

#[derive(Debug, Deserialize)]
struct GraphResponse<T> {
    data: Option<Vec<T>>,
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: String,
    pub name: Option<String>,
    pub account_status: Option<i64>,
    pub currency: Option<String>,
}

/// Insight figures as the graph API reports them: numeric fields arrive as
/// strings and are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInsights {
    pub impressions: Option<String>,
    pub clicks: Option<String>,
    pub spend: Option<String>,
    pub cpm: Option<String>,
    pub cpc: Option<String>,
    pub ctr: Option<String>,
    pub conversions: Option<String>,
    pub cost_per_conversion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub objective: Option<String>,
    pub daily_budget: Option<String>,
    pub lifetime_budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<CampaignInsights>,
}

pub struct MetaAdsClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetaAdsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, MetaAdsError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MetaAdsError::Request(e.to_string()))?;

        // The graph API reports failures in the JSON body, also on non-2xx
        // statuses, so the body is parsed before the status is considered.
        let parsed: GraphResponse<T> = resp
            .json()
            .await
            .map_err(|e| MetaAdsError::Request(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(MetaAdsError::Upstream(error.message));
        }

        Ok(parsed.data.unwrap_or_default())
    }

    /// GET /me/adaccounts - ad accounts visible to the token's user.
    pub async fn list_ad_accounts(
        &self,
        access_token: &str,
    ) -> Result<Vec<AdAccount>, MetaAdsError> {
        let url = format!(
            "{}/me/adaccounts?access_token={}&fields=id,name,account_status,currency",
            self.base_url, access_token
        );
        self.get_list(&url).await
    }

    /// GET /{account_id}/campaigns, each campaign enriched with its last-7-days
    /// insights. A failed insights fetch leaves the campaign bare.
    pub async fn list_campaigns(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<Vec<Campaign>, MetaAdsError> {
        let url = format!(
            "{}/{}/campaigns?access_token={}&fields={}&limit=50",
            self.base_url, account_id, access_token, CAMPAIGN_FIELDS
        );
        let campaigns: Vec<Campaign> = self.get_list(&url).await?;

        let enriched = join_all(campaigns.into_iter().map(|mut campaign| async move {
            match self.fetch_campaign_insights(access_token, &campaign.id).await {
                Ok(insights) => campaign.insights = insights,
                Err(e) => {
                    tracing::warn!("failed to fetch insights for campaign {}: {}", campaign.id, e);
                }
            }
            campaign
        }))
        .await;

        Ok(enriched)
    }

    async fn fetch_campaign_insights(
        &self,
        access_token: &str,
        campaign_id: &str,
    ) -> Result<Option<CampaignInsights>, MetaAdsError> {
        let url = format!(
            "{}/{}/insights?access_token={}&fields={}&date_preset=last_7d",
            self.base_url, campaign_id, access_token, INSIGHT_FIELDS
        );
        let mut rows: Vec<CampaignInsights> = self.get_list(&url).await?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }
}
