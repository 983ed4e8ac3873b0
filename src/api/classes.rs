use super::{RestBackend, SchoolApi};
use crate::{error::SlateResult, models::Class};
use http::Method;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_classes(&self) -> SlateResult<Vec<Class>> {
        self.list(&self.admin("/classes")).await
    }

    pub async fn create_class(&self, class: &Class) -> SlateResult<Class> {
        self.write(Method::POST, &self.admin("/classes"), class).await
    }

    pub async fn update_class(&self, id: i64, class: &Class) -> SlateResult<Class> {
        self.write(Method::PUT, &self.admin(format!("/classes/{id}")), class)
            .await
    }

    pub async fn delete_class(&self, id: i64) -> SlateResult<()> {
        self.unit(Method::DELETE, &self.admin(format!("/classes/{id}")), None)
            .await
    }
}
