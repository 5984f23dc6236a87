//! 配置管理
//!
//! 配置来源按优先级从低到高：`config.toml`、`config.{APP_ENV}.toml`、
//! `TUTORHUB_*` 环境变量、以及少量常用的独立环境变量。

mod r#impl;
mod structs;

pub use structs::*;
