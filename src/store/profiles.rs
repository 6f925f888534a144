use std::sync::Arc;

use futures::Stream;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{DocPath, DocumentStore};
use crate::domain::{UserId, UserProfile};
use crate::error::Result;

/// One profile document per user, replaced wholesale on save.
#[derive(Clone)]
pub struct ProfileStore {
    docs: Arc<dyn DocumentStore>,
}

impl ProfileStore {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    pub async fn save(&self, user: &UserId, profile: &UserProfile) -> Result<()> {
        profile.validate()?;
        self.docs
            .set(&DocPath::profile(user), &serde_json::to_value(profile)?)
            .await?;
        info!(%user, "profile saved");
        Ok(())
    }

    pub async fn load(&self, user: &UserId) -> Result<Option<UserProfile>> {
        match self.docs.get(&DocPath::profile(user)).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => {
                debug!(%user, "no profile yet");
                Ok(None)
            }
        }
    }

    /// Follow the signed-in user's profile.
    ///
    /// Yields once for the current auth state and again after every change:
    /// the user's profile (or `None` if they have not saved one), and `None`
    /// straight away when nobody is signed in. Ends when the identity is
    /// dropped.
    pub fn follow(
        &self,
        auth: watch::Receiver<Option<UserId>>,
    ) -> impl Stream<Item = Result<Option<UserProfile>>> + Send + 'static {
        let store = self.clone();
        futures::stream::unfold((store, auth, true), |(store, mut auth, first)| async move {
            if !first && auth.changed().await.is_err() {
                return None;
            }
            let user = auth.borrow_and_update().clone();
            let item = match user {
                Some(user) => store.load(&user).await,
                None => Ok(None),
            };
            Some((item, (store, auth, false)))
        })
    }
}
