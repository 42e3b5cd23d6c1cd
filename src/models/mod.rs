// src/models/mod.rs

//! Domain models for the site client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod content;
mod patch;
mod site;

// Re-export all public types
pub use config::{
    AdminConfig, ApiConfig, CacheConfig, Config, ENDPOINT_ENV, SessionConfig, ToastConfig,
};
pub use content::{
    AgendaCategory, AgendaFields, AgendaItem, Article, ArticleFields, Content, CountdownEvent,
    DonationConfig, FooterData, GalleryFields, GalleryItem, HeroData, ManagementMember,
    MemberFields, Record, SocialLink, SocialPlatform, TimeLeft,
};
pub(crate) use content::id_string;
pub use patch::{AgendaPatch, ArticlePatch, MemberPatch, Patch};
pub use site::{ActivityLogItem, AllSiteData, DashboardData, LoginResult};
