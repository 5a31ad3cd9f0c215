//! # 配置解析器
//!
//! 从副本参数、模式标记和环境快照构造 `RunConfig`，不产生任何副作用。
//!
//! ## 参数格式
//! ```text
//! <digit>[u|n]  [harmonic] [overwrite]
//! ```
//! - 副本参数首字符为副本数，参数中任意位置出现 `u` 即启用展开
//! - 模式标记顺序无关，未知标记直接报错
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `config/settings.rs` 中的常量

use super::settings;
use super::{BandPathSpec, ConductivityMethod, EngineConcurrency, Environment, RunConfig};
use crate::error::{LtcError, Result};

use std::path::PathBuf;

/// 模式标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeToken {
    Harmonic,
    Overwrite,
}

impl ModeToken {
    fn parse(token: &str) -> Result<Self> {
        match token {
            "harmonic" => Ok(ModeToken::Harmonic),
            "overwrite" => Ok(ModeToken::Overwrite),
            other => Err(LtcError::UnknownModeToken(other.to_string())),
        }
    }
}

/// 配置解析器
pub struct ConfigResolver;

impl ConfigResolver {
    /// 解析参数列表（不含程序名）和环境快照
    pub fn resolve(tokens: &[String], env: &Environment) -> Result<RunConfig> {
        let replica_token = tokens.first().map(|s| s.as_str()).unwrap_or("");
        let (replica_count, unfold) = parse_replica_token(replica_token)?;

        let mut harmonic_only = false;
        let mut overwrite = false;
        for token in tokens.iter().skip(1) {
            match ModeToken::parse(token)? {
                ModeToken::Harmonic => harmonic_only = true,
                ModeToken::Overwrite => overwrite = true,
            }
        }

        let input_root = require_path(env, settings::INPUT_ROOT_VAR)?;
        let output_root = require_path(env, settings::OUTPUT_ROOT_VAR)?;

        Ok(RunConfig {
            replica_count,
            unfold,
            harmonic_only,
            overwrite,
            concurrency: engine_concurrency(num_cpus::get()),
            kpoint_grid: [settings::KPOINTS; 3],
            conductivity_method: ConductivityMethod::Inverse,
            band_path: BandPathSpec {
                path: settings::BAND_PATH.to_string(),
                npoints: settings::BAND_NPOINTS,
            },
            temperature_k: settings::TEMPERATURE_K,
            is_classic: false,
            third_supercell: settings::THIRD_SUPERCELL,
            fc_format: settings::FC_FORMAT.to_string(),
            acoustic_sum: true,
            storage: settings::STORAGE.to_string(),
            input_root,
            output_root,
        })
    }
}

/// 解析副本参数，返回 (副本数, 是否展开)
fn parse_replica_token(token: &str) -> Result<(u32, bool)> {
    let invalid = |reason: &str| LtcError::InvalidReplica {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let first = token
        .chars()
        .next()
        .ok_or_else(|| invalid("missing replica count"))?;
    let count = first
        .to_digit(10)
        .ok_or_else(|| invalid("must start with a decimal digit"))?;
    if count == 0 {
        return Err(invalid("replica count must be at least 1"));
    }

    Ok((count, token.contains('u')))
}

fn require_path(env: &Environment, name: &str) -> Result<PathBuf> {
    env.get(name)
        .map(PathBuf::from)
        .ok_or_else(|| LtcError::MissingEnvironment {
            name: name.to_string(),
        })
}

/// 线程数取固定值，但不超过主机核数；引擎始终只使用 CPU
fn engine_concurrency(available: usize) -> EngineConcurrency {
    EngineConcurrency {
        threads: settings::ENGINE_THREADS.min(available).max(1),
        cpu_only: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::default()
            .with(settings::INPUT_ROOT_VAR, "/in")
            .with(settings::OUTPUT_ROOT_VAR, "/out")
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_replica_digit_and_unfold() {
        for digit in 1..=9u32 {
            for (suffix, unfold) in [("", false), ("u", true), ("n", false)] {
                let token = format!("{}{}", digit, suffix);
                let config = ConfigResolver::resolve(&tokens(&[&token]), &env()).unwrap();
                assert_eq!(config.replica_count, digit);
                assert_eq!(config.unfold, unfold);
            }
        }
    }

    #[test]
    fn test_unfold_marker_anywhere_in_token() {
        let config = ConfigResolver::resolve(&tokens(&["2xu"]), &env()).unwrap();
        assert_eq!(config.replica_count, 2);
        assert!(config.unfold);
    }

    #[test]
    fn test_only_leading_digit_counts() {
        let config = ConfigResolver::resolve(&tokens(&["12"]), &env()).unwrap();
        assert_eq!(config.replica_count, 1);
    }

    #[test]
    fn test_mode_flags_any_order() {
        let config =
            ConfigResolver::resolve(&tokens(&["3", "overwrite", "harmonic"]), &env()).unwrap();
        assert!(config.harmonic_only);
        assert!(config.overwrite);

        let config = ConfigResolver::resolve(&tokens(&["3"]), &env()).unwrap();
        assert!(!config.harmonic_only);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_unknown_mode_token_rejected() {
        let err = ConfigResolver::resolve(&tokens(&["3", "disp"]), &env()).unwrap_err();
        assert!(matches!(err, LtcError::UnknownModeToken(ref t) if t == "disp"));
        assert!(err.is_config());
    }

    #[test]
    fn test_malformed_replica_token() {
        for bad in ["", "u3", "x", "0u"] {
            let err = ConfigResolver::resolve(&tokens(&[bad]), &env()).unwrap_err();
            assert!(matches!(err, LtcError::InvalidReplica { .. }), "token {:?}", bad);
            assert!(err.is_config());
        }

        let err = ConfigResolver::resolve(&[], &env()).unwrap_err();
        assert!(matches!(err, LtcError::InvalidReplica { .. }));
    }

    #[test]
    fn test_missing_environment() {
        let only_inputs = Environment::default().with(settings::INPUT_ROOT_VAR, "/in");
        let err = ConfigResolver::resolve(&tokens(&["3"]), &only_inputs).unwrap_err();
        assert!(
            matches!(err, LtcError::MissingEnvironment { ref name } if name == settings::OUTPUT_ROOT_VAR)
        );

        let only_outputs = Environment::default().with(settings::OUTPUT_ROOT_VAR, "/out");
        let err = ConfigResolver::resolve(&tokens(&["3"]), &only_outputs).unwrap_err();
        assert!(
            matches!(err, LtcError::MissingEnvironment { ref name } if name == settings::INPUT_ROOT_VAR)
        );
    }

    #[test]
    fn test_missing_environment_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let output_root = tmp.path().join("ald");
        let env = Environment::default().with(settings::OUTPUT_ROOT_VAR, output_root.as_os_str());

        for args in [&["3u"][..], &["3", "overwrite"][..], &["2", "harmonic"][..]] {
            let err = ConfigResolver::resolve(&tokens(args), &env).unwrap_err();
            assert!(err.is_config());
        }

        assert!(!output_root.exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_root_is_accepted() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/data/ald-\xff".to_vec());
        let env = Environment::default()
            .with(settings::INPUT_ROOT_VAR, "/in")
            .with(settings::OUTPUT_ROOT_VAR, raw.clone());

        let config = ConfigResolver::resolve(&tokens(&["3u"]), &env).unwrap();
        assert_eq!(config.output_root, PathBuf::from(raw));
    }

    #[test]
    fn test_fixed_operational_constants() {
        let config = ConfigResolver::resolve(&tokens(&["3"]), &env()).unwrap();
        assert_eq!(config.kpoint_grid, [7, 7, 7]);
        assert_eq!(config.conductivity_method, ConductivityMethod::Inverse);
        assert_eq!(config.band_path.path, "GXULG");
        assert_eq!(config.band_path.npoints, 150);
        assert_eq!(config.third_supercell, [3, 3, 3]);
        assert!(config.kpoint_grid.iter().all(|&k| k >= 1));
        assert!(config.concurrency.cpu_only);
        assert!(config.concurrency.threads >= 1);
    }

    #[test]
    fn test_engine_concurrency_capped_by_host() {
        assert_eq!(engine_concurrency(1).threads, 1);
        assert_eq!(engine_concurrency(64).threads, settings::ENGINE_THREADS);
        assert_eq!(engine_concurrency(0).threads, 1);
    }
}
