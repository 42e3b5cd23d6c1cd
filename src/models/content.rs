// src/models/content.rs

//! Content entity records.
//!
//! Collection entities share the [`Record`] envelope: the data service
//! assigns the `id` on create, everything else lives in the flattened
//! `fields` body. Singletons (hero, countdown, donation, footer) carry no id
//! and are always replaced whole.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of a collection entity, as sent on create and update.
pub trait Content: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Adopt an image URL rewritten by the data service.
    ///
    /// Entities without an image field ignore it.
    fn replace_image(&mut self, _url: String) {}
}

/// A collection entity: server-assigned id plus its fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<T> {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    #[serde(flatten)]
    pub fields: T,
}

impl<T> Record<T> {
    pub fn new(id: impl Into<String>, fields: T) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Accept ids written by the spreadsheet as numbers.
pub(crate) fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// --- Agenda ---

/// Agenda category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgendaCategory {
    #[default]
    Kajian,
    Sholat,
    Kegiatan,
    Rapat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgendaFields {
    pub title: String,

    /// ISO date (`YYYY-MM-DD`)
    pub date: String,

    /// Free text, e.g. "18:30 WIB"
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: AgendaCategory,
}

impl AgendaFields {
    /// Parsed agenda date, if well-formed.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

impl Content for AgendaFields {}

pub type AgendaItem = Record<AgendaFields>;

// --- Article ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub title: String,

    /// Short summary for cards
    #[serde(default)]
    pub excerpt: String,

    /// Full article body (HTML)
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub date: String,

    /// Cover image URL (or an encoded upload on write)
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub category: String,
}

impl Content for ArticleFields {
    fn replace_image(&mut self, url: String) {
        self.image = url;
    }
}

pub type Article = Record<ArticleFields>;

// --- Gallery ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GalleryFields {
    pub image: String,

    /// Caption
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub date: String,
}

impl Content for GalleryFields {
    fn replace_image(&mut self, url: String) {
        self.image = url;
    }
}

pub type GalleryItem = Record<GalleryFields>;

// --- Board members ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemberFields {
    pub name: String,

    /// Position within the board
    #[serde(default)]
    pub title: String,

    /// Profile photo URL
    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Content for MemberFields {
    fn replace_image(&mut self, url: String) {
        self.image = url;
    }
}

pub type ManagementMember = Record<MemberFields>;

// --- Singletons ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountdownEvent {
    pub name: String,

    /// ISO datetime of the event
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the countdown is shown on the landing page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Time left until a countdown target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownEvent {
    /// Target as wall-clock time. Offsets are dropped, the site runs in one zone.
    pub fn target(&self) -> Option<NaiveDateTime> {
        let raw = self.date.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Time left until the target; all zero once it has passed.
    pub fn remaining(&self, now: NaiveDateTime) -> Option<TimeLeft> {
        let target = self.target()?;
        let secs = (target - now).num_seconds();
        if secs <= 0 {
            return Some(TimeLeft::default());
        }
        Some(TimeLeft {
            days: secs / 86_400,
            hours: (secs / 3_600) % 24,
            minutes: (secs / 60) % 60,
            seconds: secs % 60,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DonationConfig {
    pub bank_account_number: String,
    pub bank_account_name: String,
    pub bank_name: String,
    pub donation_collected: u64,
    pub donation_target: u64,

    /// QRIS image URL (or an encoded upload on write)
    #[serde(default)]
    pub qris_image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qris_drive_file_id: Option<String>,
}

impl DonationConfig {
    /// Collected amount as a percentage of the target, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.donation_target == 0 {
            return 0.0;
        }
        let pct = self.donation_collected as f64 / self.donation_target as f64 * 100.0;
        pct.min(100.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Youtube,
    Facebook,
    Tiktok,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub maps_url: String,

    #[serde(default)]
    pub socials: Vec<SocialLink>,
}
