//! Interactive browser session contract used by the authorization coordinator.
//!
//! The user-agent flow delegates credential entry to a secure browsing surface (system browser,
//! embedded auth session, device portal). The client never inspects that surface; it only hands
//! over the authorization URL and waits for the redirect or a cancellation signal.

// self
use crate::_prelude::*;

/// Boxed future returned by [`BrowserSession::authenticate`].
pub type SessionFuture<'a> = Pin<Box<dyn Future<Output = SessionOutcome> + 'a + Send>>;

/// Terminal outcome of one interactive login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
	/// The provider redirected back to the app with an authorization payload.
	Redirect(Url),
	/// The end user dismissed the session before completing the login.
	Cancelled,
}

/// Secure browsing surface that performs the interactive OAuth2 user-agent login.
///
/// Implementations present `authorization_url`, intercept the navigation to
/// `callback_scheme`, and resolve with the full redirect URL. The coordinator guarantees at
/// most one call is outstanding per client instance at any time.
pub trait BrowserSession
where
	Self: Send + Sync,
{
	/// Presents the authorization URL and resolves once the provider redirects back or the user
	/// cancels.
	fn authenticate<'a>(&'a self, authorization_url: Url, callback_scheme: &'a str)
	-> SessionFuture<'a>;
}
