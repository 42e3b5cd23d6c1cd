// src/api/client.rs

//! Typed client for every data service action.
//!
//! Payloads are decoded into the entity model at this boundary. A body that
//! parses as JSON but does not have the expected shape is reported as
//! [`AppError::Schema`] instead of leaking half-valid data into the stores.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::api::Transport;
use crate::error::{AppError, Result};
use crate::models::{
    ActivityLogItem, AgendaFields, AgendaItem, AllSiteData, Article, ArticleFields,
    CountdownEvent, DashboardData, DonationConfig, FooterData, GalleryFields, GalleryItem,
    HeroData, LoginResult, ManagementMember, MemberFields,
};

/// Answer to an `add*` action.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    /// Id assigned by the data service
    #[serde(deserialize_with = "crate::models::id_string")]
    pub id: String,

    /// Image URL after the service stored an upload
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Answer to an `update*` action.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Updated {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Answer to `saveDonation`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DonationSaved {
    #[serde(default)]
    pub qris_image_url: Option<String>,
}

/// Non-empty server-corrected URL, if any.
pub(crate) fn corrected(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

/// Typed facade over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn read<T: DeserializeOwned>(&self, action: &str, params: &[(&str, &str)]) -> Result<T> {
        let value = self.transport.get(action, params).await?;
        decode(action, value)
    }

    async fn write<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        action: &str,
        payload: &P,
    ) -> Result<T> {
        let fields = to_fields(action, payload)?;
        let value = self.transport.post(action, fields).await?;
        check_ack(action, &value)?;
        decode(action, value)
    }

    async fn write_unit<P: Serialize + ?Sized>(&self, action: &str, payload: &P) -> Result<()> {
        let fields = to_fields(action, payload)?;
        let value = self.transport.post(action, fields).await?;
        check_ack(action, &value)
    }

    // --- Landing page ---

    pub async fn fetch_all(&self) -> Result<AllSiteData> {
        self.read("getAll", &[]).await
    }

    // --- Individual getters ---

    pub async fn fetch_hero(&self) -> Result<HeroData> {
        self.read("getHero", &[]).await
    }

    pub async fn fetch_countdown(&self) -> Result<CountdownEvent> {
        self.read("getCountdown", &[]).await
    }

    pub async fn fetch_agenda(&self) -> Result<Vec<AgendaItem>> {
        self.read("getAgenda", &[]).await
    }

    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        self.read("getArticles", &[]).await
    }

    /// Single article, `None` when the service knows no such id.
    pub async fn fetch_article(&self, id: &str) -> Result<Option<Article>> {
        self.read("getArticle", &[("id", id)]).await
    }

    pub async fn fetch_gallery(&self) -> Result<Vec<GalleryItem>> {
        self.read("getGallery", &[]).await
    }

    pub async fn fetch_board(&self) -> Result<Vec<ManagementMember>> {
        self.read("getBoard", &[]).await
    }

    pub async fn fetch_donation(&self) -> Result<DonationConfig> {
        self.read("getDonation", &[]).await
    }

    pub async fn fetch_footer(&self) -> Result<FooterData> {
        self.read("getFooter", &[]).await
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardData> {
        self.read("getDashboard", &[]).await
    }

    pub async fn fetch_activity_log(&self, limit: usize) -> Result<Vec<ActivityLogItem>> {
        let limit = limit.to_string();
        self.read("getActivityLog", &[("limit", limit.as_str())]).await
    }

    // --- Auth ---

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        self.read("login", &[("username", username), ("password", password)])
            .await
    }

    // --- Singletons ---

    pub async fn save_hero(&self, data: &HeroData) -> Result<()> {
        self.write_unit("saveHero", data).await
    }

    pub async fn save_countdown(&self, data: &CountdownEvent) -> Result<()> {
        self.write_unit("saveCountdown", data).await
    }

    pub async fn save_donation(&self, data: &DonationConfig) -> Result<DonationSaved> {
        self.write("saveDonation", data).await
    }

    pub async fn save_footer(&self, data: &FooterData) -> Result<()> {
        self.write_unit("saveFooter", data).await
    }

    // --- Agenda ---

    pub async fn add_agenda(&self, item: &AgendaFields) -> Result<Created> {
        self.write("addAgenda", item).await
    }

    pub async fn update_agenda(&self, item: &AgendaItem) -> Result<Updated> {
        self.write("updateAgenda", item).await
    }

    pub async fn delete_agenda(&self, id: &str) -> Result<()> {
        self.write_unit("deleteAgenda", &json!({ "id": id })).await
    }

    // --- Articles ---

    pub async fn add_article(&self, item: &ArticleFields) -> Result<Created> {
        self.write("addArticle", item).await
    }

    pub async fn update_article(&self, item: &Article) -> Result<Updated> {
        self.write("updateArticle", item).await
    }

    pub async fn delete_article(&self, id: &str) -> Result<()> {
        self.write_unit("deleteArticle", &json!({ "id": id })).await
    }

    // --- Gallery ---

    pub async fn add_gallery_item(&self, item: &GalleryFields) -> Result<Created> {
        self.write("addGalleryItem", item).await
    }

    pub async fn delete_gallery_item(&self, id: &str) -> Result<()> {
        self.write_unit("deleteGalleryItem", &json!({ "id": id }))
            .await
    }

    // --- Board members ---

    pub async fn add_board_member(&self, item: &MemberFields) -> Result<Created> {
        self.write("addBoardMember", item).await
    }

    pub async fn update_board_member(&self, item: &ManagementMember) -> Result<Updated> {
        self.write("updateBoardMember", item).await
    }

    pub async fn delete_board_member(&self, id: &str) -> Result<()> {
        self.write_unit("deleteBoardMember", &json!({ "id": id }))
            .await
    }
}

fn decode<T: DeserializeOwned>(action: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| AppError::schema(action, e))
}

fn to_fields<P: Serialize + ?Sized>(action: &str, payload: &P) -> Result<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::validation(format!(
            "{action} payload must be an object, got {other}"
        ))),
    }
}

/// Writes answer `{ success, ... }`; an explicit `success: false` is a rejection.
fn check_ack(action: &str, value: &Value) -> Result<()> {
    if value.get("success") == Some(&Value::Bool(false)) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Permintaan ditolak");
        return Err(AppError::remote(action, message));
    }
    Ok(())
}
