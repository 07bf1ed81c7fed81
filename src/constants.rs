// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const TITLE_TRUNCATE_LENGTH: usize = 60;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DATA_FILE_NAME: &str = "snapshot.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_RECENT_DAYS: i64 = 3;
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub mod env {
    pub const DATABASE_URL: &str = "LECTURE_HUB_DATABASE_URL";
    pub const AUTH: &str = "LECTURE_HUB_AUTH";
}

pub mod providers {
    pub mod video {
        pub const DOMAIN_MARKER: &str = "youtube.com";
        pub const SHORT_LINK_MARKER: &str = "youtu.be";
        pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";
        pub const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
    }
    pub mod file {
        pub const DOMAIN_MARKER: &str = "drive.google.com";
        pub const FILE_BASE: &str = "https://drive.google.com/file/d/";
        pub const DOWNLOAD_BASE: &str = "https://drive.google.com/uc?export=download&id=";
    }
}
