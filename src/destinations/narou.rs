//! 小説家になろう 投稿驱动
//!
//! 登录后可能被带到二段认证页，此时需要人工确认后才能继续

use async_trait::async_trait;

use crate::config::Credentials;
use crate::destinations::layout::DestinationLayout;
use crate::destinations::session::{DriverContext, FormSession};
use crate::destinations::{DestinationPlatform, DriverState, PublishReport};
use crate::error::MigrateResult;
use crate::infrastructure::PageDriver;
use crate::models::{EpisodeSequence, Platform};

/// 作品管理 URL 本身就是新话投稿表单
fn draft_input_url(work_url: &str) -> String {
    work_url.to_string()
}

pub static NAROU_LAYOUT: DestinationLayout = DestinationLayout {
    platform: Platform::Narou,
    login_url: "https://syosetu.com/login/input/",
    login_id_field: "[name=narouid]",
    login_password_field: "[name=pass]",
    login_submit: "#mainsubmit",
    login_marker: "/login/",
    second_factor_marker: Some("/user2stepauth/input/authtoken/"),
    landing_url: "https://syosetu.com/user/top/",
    form_url: draft_input_url,
    title_field: "[name=subtitle]",
    body_field: "[name=novel]",
    primary_submit: r#"button[form="usernoveldatainputForm"]"#,
    fallback_submit: "button[type=submit]",
};

/// 小説家になろう 投稿驱动
pub struct NarouDriver<P: PageDriver> {
    session: FormSession<P>,
}

impl<P: PageDriver> NarouDriver<P> {
    /// 创建驱动；认证信息为空时直接拒绝
    pub fn new(page: P, credentials: Credentials, ctx: DriverContext) -> MigrateResult<Self> {
        Ok(Self {
            session: FormSession::new(&NAROU_LAYOUT, page, credentials, ctx)?,
        })
    }
}

#[async_trait]
impl<P: PageDriver> DestinationPlatform for NarouDriver<P> {
    fn platform(&self) -> Platform {
        Platform::Narou
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
