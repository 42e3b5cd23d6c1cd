// src/models/site.rs

//! Aggregate and read-only records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    AgendaItem, Article, CountdownEvent, DonationConfig, FooterData, GalleryItem, HeroData,
    ManagementMember,
};

/// Snapshot of everything the public pages render.
///
/// Only ever replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllSiteData {
    pub hero: HeroData,
    pub countdown: CountdownEvent,
    pub agenda: Vec<AgendaItem>,
    pub articles: Vec<Article>,
    pub gallery: Vec<GalleryItem>,
    pub board: Vec<ManagementMember>,
    pub donation: DonationConfig,
    pub footer: FooterData,
}

impl AllSiteData {
    /// Agenda items dated `today` or later, closest first, at most `limit`.
    ///
    /// Items with an unparseable date are skipped.
    pub fn upcoming_agenda(&self, today: NaiveDate, limit: usize) -> Vec<&AgendaItem> {
        let mut upcoming: Vec<(NaiveDate, &AgendaItem)> = self
            .agenda
            .iter()
            .filter_map(|item| item.fields.day().map(|day| (day, item)))
            .filter(|(day, _)| *day >= today)
            .collect();
        upcoming.sort_by_key(|(day, _)| *day);
        upcoming.into_iter().take(limit).map(|(_, item)| item).collect()
    }

    /// Look up an article by id.
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }
}

/// One entry of the admin activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogItem {
    #[serde(deserialize_with = "crate::models::id_string")]
    pub id: String,
    pub timestamp: String,

    /// create, update, delete, ...
    pub action: String,
    pub entity: String,

    #[serde(default, deserialize_with = "crate::models::id_string")]
    pub entity_id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub user: String,
}

/// Admin dashboard summary, derived server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub agenda_count: u64,
    pub article_count: u64,
    pub gallery_count: u64,
    pub board_count: u64,
    pub countdown: CountdownEvent,
    pub donation: DonationConfig,

    #[serde(default)]
    pub recent_activity: Vec<ActivityLogItem>,
}

/// Answer to a `login` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoginResult {
    pub success: bool,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
