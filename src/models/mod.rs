//! # 数据模型模块
//!
//! 定义参考晶体结构的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `geometry/` 和 `engine/` 使用
//! - 子模块: structure

pub mod structure;

pub use structure::{Atom, Crystal, Lattice};
