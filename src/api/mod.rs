//! Client side of the remote data service.
//!
//! - `Transport`: raw action execution (`HttpTransport` over reqwest)
//! - `ApiClient`: one typed method per action

mod client;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, Created, DonationSaved, Updated};
pub(crate) use client::corrected;
pub use transport::{HttpTransport, Transport, check_envelope};
