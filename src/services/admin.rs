// src/services/admin.rs

//! Admin content store.
//!
//! Holds the editable copy of all site content and mirrors every successful
//! write into it. The remote call always comes first: local state, the
//! public cache and the toast are only touched once the data service has
//! acknowledged the change. A failed write leaves local state as it was and
//! reports the failure as an error toast.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::api::{ApiClient, Created, DonationSaved, Updated, corrected};
use crate::cache::ResultCache;
use crate::error::{AppError, Result};
use crate::models::{
    ActivityLogItem, AgendaFields, AgendaItem, AgendaPatch, AllSiteData, Article, ArticleFields,
    ArticlePatch, Content, CountdownEvent, DashboardData, DonationConfig, FooterData,
    GalleryFields, GalleryItem, HeroData, ManagementMember, MemberFields, MemberPatch, Patch,
    Record,
};
use crate::services::Toaster;

/// Editable copy of the site content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminContent {
    pub hero: HeroData,
    pub countdown: CountdownEvent,
    pub agenda: Vec<AgendaItem>,
    pub articles: Vec<Article>,
    pub gallery: Vec<GalleryItem>,
    pub board: Vec<ManagementMember>,
    pub donation: DonationConfig,
    pub footer: FooterData,
}

/// Where a created record lands in its list.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Front,
    Back,
}

/// How a collection is addressed and reported.
struct Collection<T> {
    /// Subject of success toasts
    label: &'static str,
    /// Object of failure toasts
    noun: &'static str,
    placement: Placement,
    items: fn(&AdminContent) -> &[Record<T>],
    slot: fn(&mut AdminContent) -> &mut Vec<Record<T>>,
}

fn agenda_items(content: &AdminContent) -> &[AgendaItem] {
    &content.agenda
}

fn article_items(content: &AdminContent) -> &[Article] {
    &content.articles
}

fn gallery_items(content: &AdminContent) -> &[GalleryItem] {
    &content.gallery
}

fn board_items(content: &AdminContent) -> &[ManagementMember] {
    &content.board
}

fn agenda_slot(content: &mut AdminContent) -> &mut Vec<AgendaItem> {
    &mut content.agenda
}

fn article_slot(content: &mut AdminContent) -> &mut Vec<Article> {
    &mut content.articles
}

fn gallery_slot(content: &mut AdminContent) -> &mut Vec<GalleryItem> {
    &mut content.gallery
}

fn board_slot(content: &mut AdminContent) -> &mut Vec<ManagementMember> {
    &mut content.board
}

const AGENDA: Collection<AgendaFields> = Collection {
    label: "Agenda",
    noun: "agenda",
    placement: Placement::Front,
    items: agenda_items,
    slot: agenda_slot,
};

const ARTICLES: Collection<ArticleFields> = Collection {
    label: "Artikel",
    noun: "artikel",
    placement: Placement::Front,
    items: article_items,
    slot: article_slot,
};

const GALLERY: Collection<GalleryFields> = Collection {
    label: "Foto",
    noun: "foto",
    placement: Placement::Front,
    items: gallery_items,
    slot: gallery_slot,
};

// Board order is meaningful, new members go last.
const BOARD: Collection<MemberFields> = Collection {
    label: "Pengurus",
    noun: "pengurus",
    placement: Placement::Back,
    items: board_items,
    slot: board_slot,
};

/// Counts an in-flight write for as long as it lives.
struct Saving<'a>(&'a AtomicUsize);

impl<'a> Saving<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Saving<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AdminStore {
    api: ApiClient,
    cache: Arc<ResultCache<Arc<AllSiteData>>>,
    toaster: Toaster,
    activity_limit: usize,
    content: RwLock<AdminContent>,
    activity: RwLock<Vec<ActivityLogItem>>,
    initialized: AtomicBool,
    loading: AtomicBool,
    saving: AtomicUsize,
}

impl AdminStore {
    pub fn new(
        api: ApiClient,
        cache: Arc<ResultCache<Arc<AllSiteData>>>,
        toaster: Toaster,
        activity_limit: usize,
    ) -> Self {
        Self {
            api,
            cache,
            toaster,
            activity_limit,
            content: RwLock::new(AdminContent::default()),
            activity: RwLock::new(Vec::new()),
            initialized: AtomicBool::new(false),
            loading: AtomicBool::new(true),
            saving: AtomicUsize::new(0),
        }
    }

    /// Load every entity concurrently.
    ///
    /// All eight reads must succeed. On failure the store stays in the
    /// loading state and an error toast is shown; returns whether the store
    /// is ready.
    pub async fn initialize(&self) -> bool {
        self.loading.store(true, Ordering::SeqCst);
        let api = &self.api;

        let result = futures::try_join!(
            api.fetch_hero(),
            api.fetch_countdown(),
            api.fetch_agenda(),
            api.fetch_articles(),
            api.fetch_gallery(),
            api.fetch_board(),
            api.fetch_donation(),
            api.fetch_footer(),
        );

        match result {
            Ok((hero, countdown, agenda, articles, gallery, board, donation, footer)) => {
                log::info!(
                    "Admin data loaded: {} agenda, {} articles, {} photos, {} board members",
                    agenda.len(),
                    articles.len(),
                    gallery.len(),
                    board.len()
                );
                *self.content.write().await = AdminContent {
                    hero,
                    countdown,
                    agenda,
                    articles,
                    gallery,
                    board,
                    donation,
                    footer,
                };
                self.initialized.store(true, Ordering::SeqCst);
                self.loading.store(false, Ordering::SeqCst);
                true
            }
            Err(e) => {
                self.failed("memuat data", &e);
                false
            }
        }
    }

    // --- State ---

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// At least one write is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst) > 0
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub async fn content(&self) -> AdminContent {
        self.content.read().await.clone()
    }

    pub async fn hero(&self) -> HeroData {
        self.content.read().await.hero.clone()
    }

    pub async fn countdown(&self) -> CountdownEvent {
        self.content.read().await.countdown.clone()
    }

    pub async fn agenda(&self) -> Vec<AgendaItem> {
        self.content.read().await.agenda.clone()
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.content.read().await.articles.clone()
    }

    pub async fn gallery(&self) -> Vec<GalleryItem> {
        self.content.read().await.gallery.clone()
    }

    pub async fn board(&self) -> Vec<ManagementMember> {
        self.content.read().await.board.clone()
    }

    pub async fn donation(&self) -> DonationConfig {
        self.content.read().await.donation.clone()
    }

    pub async fn footer(&self) -> FooterData {
        self.content.read().await.footer.clone()
    }

    // --- Dashboard ---

    pub async fn load_dashboard(&self) -> Result<DashboardData> {
        self.api.fetch_dashboard().await
    }

    /// Refresh the activity log.
    ///
    /// Failures are logged and the last known entries are returned.
    pub async fn load_activity_log(&self) -> Vec<ActivityLogItem> {
        match self.api.fetch_activity_log(self.activity_limit).await {
            Ok(items) => {
                *self.activity.write().await = items.clone();
                items
            }
            Err(e) => {
                log::warn!("Failed to load activity log: {e}");
                self.activity.read().await.clone()
            }
        }
    }

    pub async fn activity_log(&self) -> Vec<ActivityLogItem> {
        self.activity.read().await.clone()
    }

    // --- Singletons ---

    pub async fn save_hero(&self, data: HeroData) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.save_hero(&data).await;
        self.finish_save(
            result,
            "menyimpan hero section",
            "Hero section berhasil diperbarui",
            move |content, ()| content.hero = data,
        )
        .await
    }

    pub async fn save_countdown(&self, data: CountdownEvent) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.save_countdown(&data).await;
        self.finish_save(
            result,
            "menyimpan countdown",
            "Countdown berhasil diperbarui",
            move |content, ()| content.countdown = data,
        )
        .await
    }

    /// Save donation settings, adopting the stored QRIS image URL.
    pub async fn save_donation(&self, data: DonationConfig) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.save_donation(&data).await;
        self.finish_save(
            result,
            "menyimpan donasi",
            "Donasi berhasil diperbarui",
            move |content, saved: DonationSaved| {
                let mut data = data;
                if let Some(url) = corrected(saved.qris_image_url) {
                    data.qris_image_url = url;
                }
                content.donation = data;
            },
        )
        .await
    }

    pub async fn save_footer(&self, data: FooterData) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.save_footer(&data).await;
        self.finish_save(
            result,
            "menyimpan footer",
            "Footer berhasil diperbarui",
            move |content, ()| content.footer = data,
        )
        .await
    }

    // --- Agenda ---

    pub async fn add_agenda(&self, fields: AgendaFields) -> Option<AgendaItem> {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.add_agenda(&fields).await;
        self.finish_create(&AGENDA, fields, result).await
    }

    pub async fn update_agenda(&self, id: &str, patch: AgendaPatch) -> bool {
        let Some(merged) = self.merged(&AGENDA, id, patch).await else {
            return false;
        };
        let _saving = Saving::begin(&self.saving);
        let result = self.api.update_agenda(&merged).await;
        self.finish_update(&AGENDA, merged, result).await
    }

    pub async fn delete_agenda(&self, id: &str) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.delete_agenda(id).await;
        self.finish_delete(&AGENDA, id, result).await
    }

    // --- Articles ---

    pub async fn add_article(&self, fields: ArticleFields) -> Option<Article> {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.add_article(&fields).await;
        self.finish_create(&ARTICLES, fields, result).await
    }

    pub async fn update_article(&self, id: &str, patch: ArticlePatch) -> bool {
        let Some(merged) = self.merged(&ARTICLES, id, patch).await else {
            return false;
        };
        let _saving = Saving::begin(&self.saving);
        let result = self.api.update_article(&merged).await;
        self.finish_update(&ARTICLES, merged, result).await
    }

    pub async fn delete_article(&self, id: &str) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.delete_article(id).await;
        self.finish_delete(&ARTICLES, id, result).await
    }

    // --- Gallery ---

    pub async fn add_gallery_item(&self, fields: GalleryFields) -> Option<GalleryItem> {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.add_gallery_item(&fields).await;
        self.finish_create(&GALLERY, fields, result).await
    }

    pub async fn delete_gallery_item(&self, id: &str) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.delete_gallery_item(id).await;
        self.finish_delete(&GALLERY, id, result).await
    }

    // --- Board members ---

    pub async fn add_board_member(&self, fields: MemberFields) -> Option<ManagementMember> {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.add_board_member(&fields).await;
        self.finish_create(&BOARD, fields, result).await
    }

    pub async fn update_board_member(&self, id: &str, patch: MemberPatch) -> bool {
        let Some(merged) = self.merged(&BOARD, id, patch).await else {
            return false;
        };
        let _saving = Saving::begin(&self.saving);
        let result = self.api.update_board_member(&merged).await;
        self.finish_update(&BOARD, merged, result).await
    }

    pub async fn delete_board_member(&self, id: &str) -> bool {
        let _saving = Saving::begin(&self.saving);
        let result = self.api.delete_board_member(id).await;
        self.finish_delete(&BOARD, id, result).await
    }

    // --- Internals ---

    async fn finish_save<R>(
        &self,
        result: Result<R>,
        what: &str,
        success: &str,
        apply: impl FnOnce(&mut AdminContent, R) + Send,
    ) -> bool {
        match result {
            Ok(answer) => {
                apply(&mut *self.content.write().await, answer);
                self.committed(success);
                true
            }
            Err(e) => {
                self.failed(what, &e);
                false
            }
        }
    }

    async fn finish_create<T: Content>(
        &self,
        collection: &Collection<T>,
        mut fields: T,
        result: Result<Created>,
    ) -> Option<Record<T>> {
        let created = match result {
            Ok(created) => created,
            Err(e) => {
                self.failed(&format!("menambahkan {}", collection.noun), &e);
                return None;
            }
        };

        if let Some(url) = corrected(created.image_url) {
            fields.replace_image(url);
        }
        let record = Record::new(created.id, fields);
        {
            let mut content = self.content.write().await;
            let items = (collection.slot)(&mut *content);
            match collection.placement {
                Placement::Front => items.insert(0, record.clone()),
                Placement::Back => items.push(record.clone()),
            }
        }

        self.committed(&format!("{} berhasil ditambahkan", collection.label));
        Some(record)
    }

    /// Existing record `id` with `patch` applied, `None` when unknown.
    async fn merged<T: Content, P: Patch<T>>(
        &self,
        collection: &Collection<T>,
        id: &str,
        patch: P,
    ) -> Option<Record<T>> {
        let content = self.content.read().await;
        let Some(existing) = (collection.items)(&*content).iter().find(|r| r.id == id) else {
            log::debug!("No {} with id {id}, update skipped", collection.noun);
            return None;
        };
        let mut merged = existing.clone();
        patch.apply(&mut merged.fields);
        Some(merged)
    }

    async fn finish_update<T: Content>(
        &self,
        collection: &Collection<T>,
        mut record: Record<T>,
        result: Result<Updated>,
    ) -> bool {
        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                self.failed(&format!("memperbarui {}", collection.noun), &e);
                return false;
            }
        };

        if let Some(url) = corrected(updated.image_url) {
            record.fields.replace_image(url);
        }
        {
            let mut content = self.content.write().await;
            if let Some(slot) = (collection.slot)(&mut *content)
                .iter_mut()
                .find(|r| r.id == record.id)
            {
                *slot = record;
            }
        }

        self.committed(&format!("{} berhasil diperbarui", collection.label));
        true
    }

    async fn finish_delete<T: Content>(
        &self,
        collection: &Collection<T>,
        id: &str,
        result: Result<()>,
    ) -> bool {
        if let Err(e) = result {
            self.failed(&format!("menghapus {}", collection.noun), &e);
            return false;
        }

        (collection.slot)(&mut *self.content.write().await).retain(|r| r.id != id);
        self.committed(&format!("{} berhasil dihapus", collection.label));
        true
    }

    fn committed(&self, message: &str) {
        self.cache.invalidate(None);
        self.toaster.success(message);
    }

    fn failed(&self, what: &str, error: &AppError) {
        log::debug!("{what}: {:?} error", error.kind());
        self.toaster.error(format!("Gagal {what}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::api::testing::{
        FakeTransport, Method, agenda_json, article_json, countdown_json, donation_json,
        footer_json, gallery_json, hero_json, member_json, site_json,
    };
    use crate::cache::SITE_DATA_KEY;
    use crate::services::ToastKind;

    fn script_init(fake: &FakeTransport) {
        fake.respond_ok("getHero", hero_json("Selamat Datang"));
        fake.respond_ok("getCountdown", countdown_json());
        fake.respond_ok("getAgenda", json!([agenda_json("a1", "Kajian Subuh")]));
        fake.respond_ok(
            "getArticles",
            json!([article_json("r1", "Keutamaan Sedekah")]),
        );
        fake.respond_ok("getGallery", json!([gallery_json("g1")]));
        fake.respond_ok("getBoard", json!([member_json("m1", "H. Ahmad")]));
        fake.respond_ok("getDonation", donation_json());
        fake.respond_ok("getFooter", footer_json());
    }

    fn warm_cache() -> Arc<ResultCache<Arc<AllSiteData>>> {
        let cache = Arc::new(ResultCache::default());
        let site: AllSiteData = serde_json::from_value(site_json("Lama")).unwrap();
        cache.set(SITE_DATA_KEY, Arc::new(site));
        cache
    }

    fn store(fake: &Arc<FakeTransport>, cache: &Arc<ResultCache<Arc<AllSiteData>>>) -> AdminStore {
        AdminStore::new(
            ApiClient::new(fake.clone()),
            Arc::clone(cache),
            Toaster::new(Duration::from_secs(3)),
            10,
        )
    }

    async fn ready(
        fake: &Arc<FakeTransport>,
        cache: &Arc<ResultCache<Arc<AllSiteData>>>,
    ) -> AdminStore {
        script_init(fake);
        let store = store(fake, cache);
        assert!(store.initialize().await);
        store
    }

    fn toast(store: &AdminStore) -> (ToastKind, String) {
        let t = store.toaster().current().expect("toast shown");
        (t.kind, t.message)
    }

    #[tokio::test]
    async fn test_initialize_loads_everything() {
        let fake = Arc::new(FakeTransport::new());
        let cache = Arc::new(ResultCache::default());
        let store = ready(&fake, &cache).await;

        assert!(store.is_initialized());
        assert!(!store.is_loading());
        let content = store.content().await;
        assert_eq!(content.hero.title, "Selamat Datang");
        assert_eq!(content.agenda[0].id, "a1");
        assert_eq!(content.board[0].fields.name, "H. Ahmad");
        assert_eq!(content.donation.bank_name, "BSI");
        assert!(store.toaster().current().is_none());
    }

    #[tokio::test]
    async fn test_initialize_failure_stays_loading() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_err("getBoard", AppError::remote("getBoard", "Sheet Board hilang"));
        script_init(&fake);
        let cache = Arc::new(ResultCache::default());
        let store = store(&fake, &cache);

        assert!(!store.initialize().await);
        assert!(store.is_loading());
        assert!(!store.is_initialized());
        let (kind, message) = toast(&store);
        assert_eq!(kind, ToastKind::Error);
        assert_eq!(message, "Gagal memuat data: Sheet Board hilang");
    }

    #[tokio::test]
    async fn test_add_agenda_uses_server_id() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok("addAgenda", json!({"success": true, "id": "new-1"}));

        let created = store
            .add_agenda(AgendaFields {
                title: "Rapat DKM".into(),
                date: "2026-11-10".into(),
                ..AgendaFields::default()
            })
            .await
            .unwrap();

        assert_eq!(created.id, "new-1");
        let agenda = store.agenda().await;
        assert_eq!(agenda.len(), 2);
        assert_eq!(agenda[0].id, "new-1");
        assert_eq!(agenda[0].fields.title, "Rapat DKM");
        assert!(cache.get(SITE_DATA_KEY).is_none());
        assert_eq!(
            toast(&store),
            (ToastKind::Success, "Agenda berhasil ditambahkan".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_create_leaves_state_untouched() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        let before = store.content().await;
        fake.respond_err("addArticle", AppError::timeout("addArticle", 60));

        let created = store
            .add_article(ArticleFields {
                title: "Draf".into(),
                ..ArticleFields::default()
            })
            .await;

        assert_eq!(created, None);
        assert_eq!(store.content().await, before);
        assert!(cache.get(SITE_DATA_KEY).is_some());
        assert_eq!(
            toast(&store),
            (
                ToastKind::Error,
                "Gagal menambahkan artikel: addArticle timed out after 60s".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_update_article_merges_patch() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok(
            "updateArticle",
            json!({"success": true, "imageUrl": "https://drive.example/baru.jpg"}),
        );

        let ok = store
            .update_article(
                "r1",
                ArticlePatch {
                    title: Some("Keutamaan Sedekah Subuh".into()),
                    image: Some("data:image/jpeg;base64,AAAA".into()),
                    ..ArticlePatch::default()
                },
            )
            .await;
        assert!(ok);

        let body = &fake.calls_to("updateArticle")[0].body;
        assert_eq!(body["id"], "r1");
        assert_eq!(body["title"], "Keutamaan Sedekah Subuh");
        assert_eq!(body["author"], "Admin");

        let article = &store.articles().await[0];
        assert_eq!(article.fields.title, "Keutamaan Sedekah Subuh");
        assert_eq!(article.fields.image, "https://drive.example/baru.jpg");
        assert_eq!(article.fields.excerpt, "Ringkasan");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_update_agenda_sends_merged_record() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok("updateAgenda", json!({"success": true}));

        let ok = store
            .update_agenda(
                "a1",
                AgendaPatch {
                    title: Some("Kajian Khusus".into()),
                    ..AgendaPatch::default()
                },
            )
            .await;
        assert!(ok);

        let body = &fake.calls_to("updateAgenda")[0].body;
        assert_eq!(body["title"], "Kajian Khusus");
        assert_eq!(body["time"], "18:30 WIB");
        assert_eq!(body["location"], "Ruang utama");

        let agenda = store.agenda().await;
        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda[0].fields.title, "Kajian Khusus");
        assert_eq!(agenda[0].fields.date, "2026-11-01");
        assert_eq!(
            toast(&store),
            (ToastKind::Success, "Agenda berhasil diperbarui".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_no_op() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;

        let ok = store
            .update_agenda("tidak-ada", AgendaPatch::default())
            .await;

        assert!(!ok);
        assert!(fake.calls_to("updateAgenda").is_empty());
        assert!(store.toaster().current().is_none());
        assert!(cache.get(SITE_DATA_KEY).is_some());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_record() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok(
            "updateBoardMember",
            json!({"success": false, "message": "Token tidak valid"}),
        );

        let ok = store
            .update_board_member(
                "m1",
                MemberPatch {
                    name: Some("H. Ahmad Fauzi".into()),
                    ..MemberPatch::default()
                },
            )
            .await;

        assert!(!ok);
        assert_eq!(store.board().await[0].fields.name, "H. Ahmad");
        assert_eq!(
            toast(&store),
            (
                ToastKind::Error,
                "Gagal memperbarui pengurus: Token tidak valid".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_id_still_calls_remote() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok("deleteGalleryItem", json!({"success": true}));

        assert!(store.delete_gallery_item("zzz").await);

        assert_eq!(fake.calls_to("deleteGalleryItem").len(), 1);
        assert_eq!(store.gallery().await.len(), 1);
        assert_eq!(
            toast(&store),
            (ToastKind::Success, "Foto berhasil dihapus".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok("deleteAgenda", json!({"success": true}));

        assert!(store.delete_agenda("a1").await);

        assert!(store.agenda().await.is_empty());
        assert_eq!(fake.calls_to("deleteAgenda")[0].body["id"], "a1");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_err(
            "deleteAgenda",
            AppError::invalid_body("deleteAgenda", "<html>"),
        );

        assert!(!store.delete_agenda("a1").await);
        assert_eq!(store.agenda().await.len(), 1);
        assert!(cache.get(SITE_DATA_KEY).is_some());
    }

    #[tokio::test]
    async fn test_new_board_member_goes_last() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok("addBoardMember", json!({"success": true, "id": 2}));

        let created = store
            .add_board_member(MemberFields {
                name: "Ust. Hasan".into(),
                title: "Sekretaris".into(),
                ..MemberFields::default()
            })
            .await
            .unwrap();

        let board = store.board().await;
        assert_eq!(created.id, "2");
        assert_eq!(board.last().map(|m| m.id.as_str()), Some("2"));
        assert_eq!(
            toast(&store),
            (ToastKind::Success, "Pengurus berhasil ditambahkan".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_donation_adopts_qris_url() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok(
            "saveDonation",
            json!({"success": true, "qrisImageUrl": "https://drive.example/qris-baru.png"}),
        );

        let mut donation = store.donation().await;
        donation.donation_collected = 30_000_000;
        donation.qris_image_url = "data:image/png;base64,AAAA".into();
        assert!(store.save_donation(donation).await);

        let saved = store.donation().await;
        assert_eq!(saved.donation_collected, 30_000_000);
        assert_eq!(saved.qris_image_url, "https://drive.example/qris-baru.png");
        assert_eq!(
            toast(&store),
            (ToastKind::Success, "Donasi berhasil diperbarui".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_singleton_save_keeps_state() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_err("saveHero", AppError::remote("saveHero", "Unauthorized"));

        let hero = HeroData {
            title: "Baru".into(),
            ..HeroData::default()
        };
        assert!(!store.save_hero(hero).await);

        assert_eq!(store.hero().await.title, "Selamat Datang");
        assert_eq!(
            toast(&store).1,
            "Gagal menyimpan hero section: Unauthorized"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_saving_flag_tracks_inflight_writes() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_ok_after(
            "saveFooter",
            Duration::from_secs(2),
            json!({"success": true}),
        );

        assert!(!store.is_saving());
        let observed = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            store.is_saving()
        };
        let (saved, during) = tokio::join!(store.save_footer(FooterData::default()), observed);

        assert!(saved);
        assert!(during);
        assert!(!store.is_saving());
    }

    #[tokio::test(start_paused = true)]
    async fn test_saving_flag_drops_after_slow_failure() {
        let fake = Arc::new(FakeTransport::new());
        let cache = warm_cache();
        let store = ready(&fake, &cache).await;
        fake.respond_err_after(
            "saveFooter",
            Duration::from_secs(2),
            AppError::remote("saveFooter", "Unauthorized"),
        );

        let observed = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            store.is_saving()
        };
        let (saved, during) = tokio::join!(store.save_footer(FooterData::default()), observed);

        assert!(!saved);
        assert!(during);
        assert!(!store.is_saving());
        assert_eq!(fake.calls_to("saveFooter")[0].method, Method::Post);
        assert!(cache.get(SITE_DATA_KEY).is_some());
        assert_eq!(toast(&store).0, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_activity_log_failure_keeps_last_entries() {
        let fake = Arc::new(FakeTransport::new());
        let cache = Arc::new(ResultCache::default());
        let store = store(&fake, &cache);
        fake.respond_ok(
            "getActivityLog",
            json!([{
                "id": "1",
                "timestamp": "2026-10-15T08:00:00Z",
                "action": "create",
                "entity": "agenda",
                "entityId": "a1",
                "description": "Menambahkan agenda Kajian Subuh",
                "user": "admin"
            }]),
        );
        fake.respond_err(
            "getActivityLog",
            AppError::invalid_body("getActivityLog", "<html>"),
        );

        assert_eq!(store.load_activity_log().await.len(), 1);
        let after_failure = store.load_activity_log().await;
        assert_eq!(after_failure.len(), 1);
        assert_eq!(after_failure[0].entity_id, "a1");
        assert!(store.toaster().current().is_none());
        assert_eq!(
            fake.calls_to("getActivityLog")[0].params,
            vec![("limit".to_string(), "10".to_string())]
        );
    }
}
