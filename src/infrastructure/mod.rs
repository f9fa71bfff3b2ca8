//! 基础设施层
//!
//! 持有稀缺资源（浏览器页面），只暴露页面操作能力

pub mod chrome_page;
pub mod page_driver;

pub use chrome_page::ChromePage;
pub use page_driver::{wait_for_element, PageDriver};
