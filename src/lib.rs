//! Async Salesforce REST client—user-agent OAuth flows, durable credential stores, and a
//! self-healing request pipeline in one crate built for production.
//!
//! The crate centers on [`client::Salesforce`]: callers describe a REST resource, the client
//! looks up the stored [`auth::Authorization`], executes the request, validates the platform's
//! response envelopes, and—when the server reports the credential expired—drives one
//! interactive re-authorization through the configured [`session::BrowserSession`] before
//! retrying exactly once. Concurrent callers never trigger more than one interactive login.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod datetime;
pub mod error;
pub mod obs;
pub mod resource;
pub mod response;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
