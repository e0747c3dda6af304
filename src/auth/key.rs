//! Store keys identifying one credential set per app, per user, per organization.

// self
use crate::{
	_prelude::*,
	auth::{
		id::{ConsumerKey, IdentifierError, OrgId, UserId},
		record::Authorization,
	},
};

/// Unique key for a stored [`Authorization`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// User the credential was issued to.
	pub user_id: UserId,
	/// Organization the credential belongs to.
	pub org_id: OrgId,
	/// Consumer key of the connected app that obtained the credential.
	pub consumer_key: ConsumerKey,
}
impl StoreKey {
	/// Builds a key from its three components.
	pub fn new(user_id: UserId, org_id: OrgId, consumer_key: ConsumerKey) -> Self {
		Self { user_id, org_id, consumer_key }
	}

	/// Derives the key under which `authorization` should be stored for a connected app.
	pub fn for_authorization(
		authorization: &Authorization,
		consumer_key: ConsumerKey,
	) -> Result<Self, IdentifierError> {
		let user_id = UserId::new(authorization.user_id())?;
		let org_id = OrgId::new(authorization.org_id())?;

		Ok(Self { user_id, org_id, consumer_key })
	}
}
