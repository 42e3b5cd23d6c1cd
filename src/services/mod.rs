//! Service layer for the site client.
//!
//! This module contains the stateful logic for:
//! - Public page data with stale-while-revalidate (`SiteDataProvider`)
//! - Admin content editing (`AdminStore`)
//! - Admin login and session guard (`AuthService`)
//! - Outcome notifications (`Toaster`)

mod admin;
mod auth;
mod site_data;
mod toast;

pub use admin::{AdminContent, AdminStore};
pub use auth::AuthService;
pub use site_data::{SiteDataProvider, SiteState};
pub use toast::{Toast, ToastKind, Toaster};
