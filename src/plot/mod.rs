//! # 绘图模块
//!
//! 声子色散曲线渲染。
//!
//! ## 依赖关系
//! - 被 `engine/process.rs` 使用
//! - 子模块: dispersion

pub mod dispersion;
