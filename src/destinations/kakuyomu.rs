//! カクヨム 投稿驱动

use async_trait::async_trait;

use crate::config::Credentials;
use crate::destinations::layout::DestinationLayout;
use crate::destinations::session::{DriverContext, FormSession};
use crate::destinations::{DestinationPlatform, DriverState, PublishReport};
use crate::error::MigrateResult;
use crate::infrastructure::PageDriver;
use crate::models::{EpisodeSequence, Platform};

fn new_episode_url(work_url: &str) -> String {
    format!("{}/episodes/new", work_url)
}

pub static KAKUYOMU_LAYOUT: DestinationLayout = DestinationLayout {
    platform: Platform::Kakuyomu,
    login_url: "https://kakuyomu.jp/auth/login/email?location=%2F&auth_platform=web",
    login_id_field: "[name=email]",
    login_password_field: "[name=password]",
    login_submit: "button[type=submit]",
    login_marker: "/auth/login",
    second_factor_marker: None,
    landing_url: "https://kakuyomu.jp/my",
    form_url: new_episode_url,
    title_field: "[name=title]",
    body_field: "[name=body]",
    primary_submit: "#updateButton",
    fallback_submit: "button[type=submit]",
};

/// カクヨム 投稿驱动
pub struct KakuyomuDriver<P: PageDriver> {
    session: FormSession<P>,
}

impl<P: PageDriver> KakuyomuDriver<P> {
    /// 创建驱动；认证信息为空时直接拒绝
    pub fn new(page: P, credentials: Credentials, ctx: DriverContext) -> MigrateResult<Self> {
        Ok(Self {
            session: FormSession::new(&KAKUYOMU_LAYOUT, page, credentials, ctx)?,
        })
    }
}

#[async_trait]
impl<P: PageDriver> DestinationPlatform for KakuyomuDriver<P> {
    fn platform(&self) -> Platform {
        Platform::Kakuyomu
    }

    fn state(&self) -> DriverState {
        self.session.state()
    }

    async fn login(&mut self) -> MigrateResult<()> {
        self.session.login().await
    }

    async fn publish_sequence(
        &mut self,
        work_url: &str,
        episodes: &EpisodeSequence,
    ) -> MigrateResult<PublishReport> {
        self.session.publish(work_url, episodes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_url_strips_trailing_slash() {
        assert_eq!(
            KAKUYOMU_LAYOUT.episode_form_url("https://kakuyomu.jp/my/works/123/"),
            "https://kakuyomu.jp/my/works/123/episodes/new"
        );
        assert_eq!(
            KAKUYOMU_LAYOUT.episode_form_url("https://kakuyomu.jp/my/works/123"),
            "https://kakuyomu.jp/my/works/123/episodes/new"
        );
    }
}
