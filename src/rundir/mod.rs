//! # 运行目录管理
//!
//! 计算输出目录并执行幂等的存在性 / 覆盖检查。
//!
//! ## 状态
//! - `Fresh`: 输出根目录不存在
//! - `ExistingDistinct`: 根目录存在，本次运行目录不存在
//! - `ExistingCollision`: 两者都存在
//!
//! 运行目录以原子的 `mkdir` 创建，两个并发进程中只有一个能拿到新目录。
//! 任何情况下都不删除目录；`overwrite` 只允许写入已有目录。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 调用
//! - 使用 `config/`, `utils/output.rs`

use crate::config::RunConfig;
use crate::error::{LtcError, Result};
use crate::utils::output;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 输出目录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Fresh,
    ExistingDistinct,
    ExistingCollision,
}

/// 目录准备结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preparation {
    /// 可以写入
    Ready { run_dir: PathBuf, state: RunState },
    /// 目录已存在且不允许覆盖，未做任何修改
    Abort { run_dir: PathBuf },
}

/// 运行目录管理器
pub struct RunDirectoryManager;

impl RunDirectoryManager {
    /// 只读检查当前状态
    pub fn inspect(config: &RunConfig) -> RunState {
        if !config.output_root.is_dir() {
            RunState::Fresh
        } else if config.output_dir().is_dir() {
            RunState::ExistingCollision
        } else {
            RunState::ExistingDistinct
        }
    }

    /// 准备输出目录
    pub fn prepare(config: &RunConfig) -> Result<Preparation> {
        let root = &config.output_root;
        let run_dir = config.output_dir();

        let state = if root.is_dir() {
            output::print_warning(&format!("{} directory already exists", root.display()));
            RunState::ExistingDistinct
        } else {
            create_dir_all(root)?;
            RunState::Fresh
        };

        match fs::create_dir(&run_dir) {
            Ok(()) => Ok(Preparation::Ready { run_dir, state }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && run_dir.is_dir() => {
                output::print_warning(&format!("{} directory already exists", run_dir.display()));
                output::print_warning("continuing may overwrite, or load previous data");

                if config.overwrite {
                    Ok(Preparation::Ready {
                        run_dir,
                        state: RunState::ExistingCollision,
                    })
                } else {
                    output::print_warning("overwrites disallowed, exiting safely..");
                    Ok(Preparation::Abort { run_dir })
                }
            }
            Err(e) => Err(LtcError::DirectoryCreate {
                path: run_dir.display().to_string(),
                source: e,
            }),
        }
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| LtcError::DirectoryCreate {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings;
    use crate::config::{ConfigResolver, Environment};

    fn config(root: &Path, tokens: &[&str]) -> RunConfig {
        let env = Environment::default()
            .with(settings::INPUT_ROOT_VAR, root.join("inputs").display().to_string())
            .with(settings::OUTPUT_ROOT_VAR, root.join("ald").display().to_string());
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        ConfigResolver::resolve(&tokens, &env).unwrap()
    }

    #[test]
    fn test_fresh_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), &["3u"]);
        assert_eq!(RunDirectoryManager::inspect(&config), RunState::Fresh);

        let prep = RunDirectoryManager::prepare(&config).unwrap();
        assert_eq!(
            prep,
            Preparation::Ready {
                run_dir: tmp.path().join("ald").join("3u"),
                state: RunState::Fresh,
            }
        );
        assert!(config.output_dir().is_dir());
        assert_eq!(RunDirectoryManager::inspect(&config), RunState::ExistingCollision);
    }

    #[test]
    fn test_existing_root_distinct_run() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("ald").join("3u")).unwrap();

        let config = config(tmp.path(), &["3"]);
        assert_eq!(RunDirectoryManager::inspect(&config), RunState::ExistingDistinct);

        let prep = RunDirectoryManager::prepare(&config).unwrap();
        assert!(matches!(
            prep,
            Preparation::Ready { state: RunState::ExistingDistinct, .. }
        ));
        assert!(tmp.path().join("ald").join("3").is_dir());
    }

    #[test]
    fn test_second_prepare_aborts_without_mutation() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(tmp.path(), &["2"]);

        let first = RunDirectoryManager::prepare(&config).unwrap();
        assert!(matches!(first, Preparation::Ready { .. }));

        let marker = config.output_dir().join("kappa.npy");
        fs::write(&marker, b"previous results").unwrap();

        let second = RunDirectoryManager::prepare(&config).unwrap();
        assert_eq!(
            second,
            Preparation::Abort {
                run_dir: config.output_dir()
            }
        );
        assert_eq!(fs::read(&marker).unwrap(), b"previous results");
        assert_eq!(fs::read_dir(config.output_dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_overwrite_reuses_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let first = RunDirectoryManager::prepare(&config(tmp.path(), &["2"])).unwrap();
        assert!(matches!(first, Preparation::Ready { .. }));

        let overwrite = config(tmp.path(), &["2", "overwrite"]);
        let marker = overwrite.output_dir().join("kappa.npy");
        fs::write(&marker, b"previous results").unwrap();

        let second = RunDirectoryManager::prepare(&overwrite).unwrap();
        assert!(matches!(
            second,
            Preparation::Ready { state: RunState::ExistingCollision, .. }
        ));
        assert_eq!(fs::read(&marker).unwrap(), b"previous results");
    }

    #[test]
    fn test_run_path_occupied_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("ald")).unwrap();
        fs::write(tmp.path().join("ald").join("4"), b"not a directory").unwrap();

        let err = RunDirectoryManager::prepare(&config(tmp.path(), &["4"])).unwrap_err();
        assert!(matches!(err, LtcError::DirectoryCreate { .. }));
    }
}
