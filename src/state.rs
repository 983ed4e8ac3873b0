pub mod cache;
pub mod storage;

use crate::{
    api::{HttpBackend, SchoolApi},
    auth::session_store::SessionStore,
    cfg::Settings,
    dashboard::Dashboard,
    error::SlateResult,
    gradebook::Gradebook,
    models::{Course, Student},
};
use cache::TtlCache;
use storage::SlateStorage;

/// Everything a screen needs, built once from settings.
#[derive(Clone, Debug)]
pub struct SlateState {
    pub settings: Settings,
    pub api: SchoolApi<HttpBackend>,
    pub storage: SlateStorage,
    pub sessions: SessionStore<SlateStorage>,
}

impl SlateState {
    pub fn new(settings: Settings) -> SlateResult<Self> {
        let backend = HttpBackend::new(&settings.api.base_url)?;
        let api = SchoolApi::new(backend, &settings.api.admin_prefix);
        let storage = SlateStorage::new(&settings.storage);
        let sessions = SessionStore::new(storage.clone());

        Ok(Self {
            settings,
            api,
            storage,
            sessions,
        })
    }

    #[must_use]
    pub fn teacher_cache(&self) -> TtlCache<SlateStorage> {
        TtlCache::new(self.storage.clone(), self.settings.cache.ttl())
    }

    #[must_use]
    pub fn dashboard(&self) -> Dashboard<HttpBackend, SlateStorage> {
        Dashboard::new(
            self.api.clone(),
            self.teacher_cache(),
            self.settings.cache.teachers_key.clone(),
            self.settings.absences.dashboard_rule(),
        )
    }

    /// A mark sheet for one course, using the configured gradebook absence rule.
    #[must_use]
    pub fn gradebook(&self, course: Course, students: &[Student]) -> Gradebook {
        Gradebook::new(course, students, self.settings.absences.gradebook_rule())
    }
}
