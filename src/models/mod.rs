mod link;
mod url_analytic;

pub use link::{CreateLinkDto, CreateLinkResponseDto, LinkStatsResponseDto};
pub use url_analytic::{NewUrlAnalytic, UrlAnalytic};
