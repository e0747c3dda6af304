// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// self
use salesforce_connect::{
	auth::ConsumerKey,
	client::Salesforce,
	config::Configuration,
	session::{BrowserSession, SessionFuture, SessionOutcome},
	store::MemoryStore,
	url::Url,
};

pub const CONSUMER_KEY: &str = "3MVG9A2kN3Bn17hs";
pub const IDENTITY_URL: &str =
	"https://login.salesforce.com/id/00Di0000000bcK3FAI/005i00000016PdaBAE";

/// Browser-session stand-in resolving with a pre-scripted outcome.
///
/// Counts launches so tests can assert the at-most-one-session invariant.
pub struct ScriptedSession {
	outcome: SessionOutcome,
	launches: AtomicUsize,
	delay: Option<Duration>,
}
impl ScriptedSession {
	pub fn redirecting(redirect_url: Url) -> Arc<Self> {
		Arc::new(Self {
			outcome: SessionOutcome::Redirect(redirect_url),
			launches: AtomicUsize::new(0),
			delay: None,
		})
	}

	pub fn cancelling() -> Arc<Self> {
		Arc::new(Self {
			outcome: SessionOutcome::Cancelled,
			launches: AtomicUsize::new(0),
			delay: None,
		})
	}

	pub fn redirecting_after(redirect_url: Url, delay: Duration) -> Arc<Self> {
		Arc::new(Self {
			outcome: SessionOutcome::Redirect(redirect_url),
			launches: AtomicUsize::new(0),
			delay: Some(delay),
		})
	}

	pub fn launches(&self) -> usize {
		self.launches.load(Ordering::SeqCst)
	}
}
impl BrowserSession for ScriptedSession {
	fn authenticate<'a>(
		&'a self,
		_authorization_url: Url,
		_callback_scheme: &'a str,
	) -> SessionFuture<'a> {
		self.launches.fetch_add(1, Ordering::SeqCst);

		let outcome = self.outcome.clone();
		let delay = self.delay;

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			outcome
		})
	}
}

/// Builds a redirect URL carrying the given token and instance endpoint in its fragment.
pub fn redirect_url(access_token: &str, instance_url: &str) -> Url {
	let mut fragment = url::form_urlencoded::Serializer::new(String::new());

	fragment.append_pair("access_token", access_token);
	fragment.append_pair("instance_url", instance_url);
	fragment.append_pair("id", IDENTITY_URL);
	fragment.append_pair("refresh_token", "5Aep8614iLM");

	Url::parse(&format!("sfdc1234://authorized#{}", fragment.finish()))
		.expect("Scripted redirect URL should parse successfully.")
}

pub fn configuration() -> Configuration {
	Configuration::new(
		ConsumerKey::new(CONSUMER_KEY).expect("Consumer key fixture should be valid."),
		Url::parse("sfdc1234://authorized").expect("Callback URL fixture should parse."),
	)
}

pub fn build_client(session: Arc<ScriptedSession>) -> (Salesforce, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let client = Salesforce::new(configuration(), store.clone(), session)
		.expect("Client construction should succeed.");

	(client, store)
}
