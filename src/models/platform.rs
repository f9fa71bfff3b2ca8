//! 平台定义
//!
//! 所有"选哪个站点"的判断都通过 `Platform` 枚举完成，不做字符串匹配

use std::fmt;

/// 支持的小说平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// カクヨム
    Kakuyomu,
    /// 小説家になろう
    Narou,
    /// アルファポリス（未实现）
    AlphaPolis,
    /// ネオページ（未实现）
    NeoPage,
}

/// 菜单选择结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Platform(Platform),
    Exit,
}

impl Platform {
    /// 菜单中的显示顺序
    pub const ALL: [Platform; 4] = [
        Platform::Kakuyomu,
        Platform::Narou,
        Platform::AlphaPolis,
        Platform::NeoPage,
    ];

    /// 配置文件中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Kakuyomu => "kakuyomu",
            Platform::Narou => "narou",
            Platform::AlphaPolis => "alphapolis",
            Platform::NeoPage => "neopage",
        }
    }

    /// 菜单显示名称
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Kakuyomu => "カクヨム",
            Platform::Narou => "小説家になろう",
            Platform::AlphaPolis => "【未実装】アルファポリス",
            Platform::NeoPage => "【未実装】ネオページ",
        }
    }

    /// 是否已实现（可作为来源或目标）
    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::Kakuyomu | Platform::Narou)
    }

    /// 作为投稿目标时 URL 必须包含的域名
    pub fn destination_domain(&self) -> Option<&'static str> {
        match self {
            Platform::Kakuyomu => Some("kakuyomu.jp"),
            Platform::Narou => Some("syosetu.com"),
            Platform::AlphaPolis | Platform::NeoPage => None,
        }
    }

    /// 检查作品管理 URL 是否属于本平台
    pub fn owns_url(&self, url: &str) -> bool {
        self.destination_domain()
            .is_some_and(|domain| url.contains(domain))
    }

    /// 来源标识的输入示例
    pub fn identifier_example(&self) -> &'static str {
        match self {
            Platform::Kakuyomu => "https://kakuyomu.jp/works/16818622177542595290",
            Platform::Narou => "n5922lb",
            Platform::AlphaPolis | Platform::NeoPage => "",
        }
    }

    /// 作品管理 URL 的输入示例
    pub fn destination_example(&self) -> &'static str {
        match self {
            Platform::Kakuyomu => "https://kakuyomu.jp/my/works/16818622177542595290",
            Platform::Narou => "https://syosetu.com/draftepisode/input/ncode/2875635/",
            Platform::AlphaPolis | Platform::NeoPage => "",
        }
    }

    /// 菜单选项（末尾为"退出"）
    pub fn menu_options() -> Vec<&'static str> {
        let mut options: Vec<&'static str> = Self::ALL.iter().map(|p| p.label()).collect();
        options.push("ソフトを終了");
        options
    }

    /// 将菜单索引映射为选择结果，越界返回 None
    pub fn from_menu_index(index: usize) -> Option<MenuChoice> {
        match Self::ALL.get(index) {
            Some(platform) => Some(MenuChoice::Platform(*platform)),
            None if index == Self::ALL.len() => Some(MenuChoice::Exit),
            None => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
