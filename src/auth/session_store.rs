use super::SessionUser;
use crate::{
    error::{SerdeJsonAction, SerdeJsonSnafu, SlateResult},
    state::storage::{KeyValueStore, MemoryStore},
};
use snafu::ResultExt;

const SESSION_KEY: &str = "currentUser";

/// "Remember me" sessions go to the durable store, the rest only live as
/// long as the process.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    durable: S,
    ephemeral: MemoryStore,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(durable: S) -> Self {
        Self {
            durable,
            ephemeral: MemoryStore::new("session_store"),
        }
    }

    pub async fn load_session(&self) -> SlateResult<Option<SessionUser>> {
        let raw = match self.ephemeral.get(SESSION_KEY).await? {
            Some(raw) => Some(raw),
            None => self.durable.get(SESSION_KEY).await?,
        };
        let Some(raw) = raw else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .context(SerdeJsonSnafu {
                action: SerdeJsonAction::DecodingSession,
            })
    }

    pub async fn store_session(&self, user: &SessionUser, remember: bool) -> SlateResult<()> {
        let json = serde_json::to_string(user).context(SerdeJsonSnafu {
            action: SerdeJsonAction::EncodingSession,
        })?;

        if remember {
            self.ephemeral.remove(SESSION_KEY).await?;
            self.durable.set(SESSION_KEY, json).await
        } else {
            self.durable.remove(SESSION_KEY).await?;
            self.ephemeral.set(SESSION_KEY, json).await
        }
    }

    pub async fn destroy_session(&self) -> SlateResult<()> {
        self.ephemeral.remove(SESSION_KEY).await?;
        self.durable.remove(SESSION_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::Role,
        error::SlateError,
        state::storage::{tests::scratch_dir, FileStore},
    };
    use serde_json::Map;

    fn user(name: &str) -> SessionUser {
        SessionUser {
            username: name.into(),
            role: Role::Admin,
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn only_remembered_sessions_touch_disk() {
        let dir = scratch_dir("sessions");
        let disk = FileStore::new(&dir);
        let sessions = SessionStore::new(disk.clone());

        sessions.store_session(&user("direction"), false).await.unwrap();
        assert!(disk.get(SESSION_KEY).await.unwrap().is_none());
        assert_eq!(
            sessions.load_session().await.unwrap().map(|u| u.username),
            Some("direction".to_string())
        );

        sessions.store_session(&user("secretariat"), true).await.unwrap();
        assert!(disk.get(SESSION_KEY).await.unwrap().is_some());

        let after_restart = SessionStore::new(FileStore::new(&dir));
        assert_eq!(
            after_restart.load_session().await.unwrap().map(|u| u.username),
            Some("secretariat".to_string())
        );

        after_restart.destroy_session().await.unwrap();
        assert!(after_restart.load_session().await.unwrap().is_none());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn garbage_is_an_error() {
        let durable = MemoryStore::default();
        durable.set(SESSION_KEY, "not json".into()).await.unwrap();

        assert!(matches!(
            SessionStore::new(durable).load_session().await,
            Err(SlateError::SerdeJson { .. })
        ));
    }
}
