//! Upstream document models.
//!
//! Field names follow the upstream JSON exactly. Everything the upstream may
//! omit is an `Option` so that sparse posts deserialize cleanly.

use serde::{Deserialize, Serialize};

use super::media::{self, MediaKind};

/// `/boards.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    #[serde(default)]
    pub boards: Vec<Board>,
}

/// One board as listed in `/boards.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Short name used in paths, e.g. `"v"`.
    pub board: String,
    pub title: String,
    /// 1 for work-safe boards.
    pub ws_board: u8,
    pub pages: u32,
    pub per_page: u32,
    #[serde(default)]
    pub meta_description: Option<String>,
}

impl Board {
    pub fn is_worksafe(&self) -> bool {
        self.ws_board == 1
    }

    /// Text shown next to the board: the meta description when present,
    /// else the title.
    pub fn description(&self) -> &str {
        self.meta_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.title)
    }
}

/// One page of `/{board}/catalog.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub threads: Vec<CatalogThread>,
}

/// Thread summary in a catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogThread {
    pub no: u64,
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub com: Option<String>,
    #[serde(default)]
    pub replies: Option<u32>,
    #[serde(default)]
    pub images: Option<u32>,
    #[serde(default)]
    pub tim: Option<u64>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl CatalogThread {
    pub fn thumbnail_url(&self, board: &str) -> Option<String> {
        media::thumbnail_url(board, self.tim)
    }

    pub fn country_flag_url(&self) -> Option<String> {
        media::country_flag_url(self.country.as_deref())
    }
}

/// `/{board}/thread/{no}.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub posts: Vec<ThreadPost>,
}

impl Thread {
    /// The opening post, if the thread has any posts at all.
    pub fn op(&self) -> Option<&ThreadPost> {
        self.posts.first()
    }

    pub fn post(&self, no: u64) -> Option<&ThreadPost> {
        self.posts.iter().find(|p| p.no == no)
    }
}

/// One post inside a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadPost {
    pub no: u64,
    /// Thread this post replies to; 0 for the opening post.
    #[serde(default)]
    pub resto: u64,
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub com: Option<String>,
    #[serde(default)]
    pub tim: Option<u64>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub fsize: Option<u64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl ThreadPost {
    pub fn is_op(&self) -> bool {
        self.resto == 0
    }

    /// Original file name with extension, when the post carries a file.
    pub fn file_name(&self) -> Option<String> {
        match (self.filename.as_deref(), self.ext.as_deref()) {
            (Some(name), Some(ext)) if !name.is_empty() && !ext.is_empty() => {
                Some(format!("{name}{ext}"))
            }
            _ => None,
        }
    }

    pub fn thumbnail_url(&self, board: &str) -> Option<String> {
        media::thumbnail_url(board, self.tim)
    }

    pub fn image_url(&self, board: &str) -> Option<String> {
        media::image_url(board, self.tim, self.ext.as_deref())
    }

    pub fn media_kind(&self) -> MediaKind {
        media::media_kind(self.ext.as_deref())
    }

    pub fn file_size(&self) -> Option<String> {
        self.fsize.map(media::format_bytes)
    }

    pub fn country_flag_url(&self) -> Option<String> {
        media::country_flag_url(self.country.as_deref())
    }
}
