//! # 子进程引擎桥接
//!
//! 每个阶段启动一次外部引擎程序（默认 `kaldo-bridge`），阻塞等待其退出。
//!
//! ## 调用格式
//! ```text
//! <program> [prefix args] dispersion   <common args> --path-file <csv> --output <csv>
//! <program> [prefix args] conductivity <common args> --method <name> --output <csv>
//! ```
//! 并发配置只作用于子进程环境（`CUDA_VISIBLE_DEVICES`, `OMP_NUM_THREADS`,
//! `TF_NUM_INTEROP_THREADS`, `TF_NUM_INTRAOP_THREADS`），不修改本进程状态。
//! 引擎的 stdout/stderr 保存在输出目录下的 `<stage>.log`。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 构造
//! - 使用 `engine/exchange.rs`, `plot/`, `utils/progress.rs`

use super::exchange;
use super::{
    ForceConstantModel, Matrix3, ModelRequest, PhononContext, PhononEngine, PhononRequest,
};
use crate::config::{ConductivityMethod, EngineConcurrency};
use crate::error::{LtcError, Result};
use crate::geometry::BandPath;
use crate::plot;
use crate::utils::progress;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// 默认引擎程序
pub const DEFAULT_ENGINE: &str = "kaldo-bridge";

/// 子进程引擎
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    prefix_args: Vec<String>,
    concurrency: EngineConcurrency,
}

impl ProcessEngine {
    /// 从命令行字符串创建，如 `"python3 bridge.py"`
    pub fn new(command_line: &str, concurrency: EngineConcurrency) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(|s| s.to_string());
        let program = parts.next().ok_or_else(|| LtcError::CommandNotFound {
            command: command_line.to_string(),
        })?;

        Ok(Self {
            program,
            prefix_args: parts.collect(),
            concurrency,
        })
    }

    /// 程序名
    pub fn program(&self) -> &str {
        &self.program
    }

    /// 模型与上下文参数
    fn common_args(&self, context: &PhononContext) -> Vec<String> {
        let model = &context.model.request;
        let phonons = &context.settings;
        let triple = |v: [u32; 3]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();

        let mut args = vec!["--fcs-folder".to_string(), model.folder.display().to_string()];
        args.push("--supercell".to_string());
        args.extend(triple(model.supercell));
        args.push("--third-supercell".to_string());
        args.extend(triple(model.third_supercell));
        args.extend(["--format".to_string(), model.format.clone()]);
        if model.acoustic_sum {
            args.push("--acoustic-sum".to_string());
        }
        if !model.include_third_order {
            args.push("--only-second".to_string());
        }

        args.push("--kpts".to_string());
        args.extend(triple(phonons.kpts));
        args.extend([
            "--temperature".to_string(),
            format!("{}", phonons.temperature_k),
        ]);
        if phonons.is_classic {
            args.push("--is-classic".to_string());
        }
        if phonons.unfold {
            args.push("--unfold".to_string());
        }
        args.extend([
            "--folder".to_string(),
            phonons.folder.display().to_string(),
            "--storage".to_string(),
            phonons.storage.clone(),
            "--threads".to_string(),
            self.concurrency.threads.to_string(),
        ]);

        args
    }

    /// 运行一个阶段
    fn invoke(&self, stage: &str, args: &[String], log_dir: &Path, message: &str) -> Result<()> {
        let threads = self.concurrency.threads.to_string();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .arg(stage)
            .args(args)
            .env("OMP_NUM_THREADS", &threads)
            .env("TF_NUM_INTEROP_THREADS", &threads)
            .env("TF_NUM_INTRAOP_THREADS", &threads);
        if self.concurrency.cpu_only {
            cmd.env("CUDA_VISIBLE_DEVICES", "");
        }

        let spinner = progress::create_spinner(message);
        let result = cmd.output();
        spinner.finish_and_clear();

        let command = format!("{} {}", self.program, stage);
        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LtcError::CommandNotFound {
                    command: self.program.clone(),
                })
            }
            Err(e) => {
                return Err(LtcError::CommandFailed {
                    command,
                    stderr: e.to_string(),
                })
            }
        };

        let log_path = log_dir.join(format!("{}.log", stage));
        let mut log = out.stdout.clone();
        log.extend_from_slice(&out.stderr);
        fs::write(&log_path, log).map_err(|e| LtcError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;

        if !out.status.success() {
            return Err(LtcError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl PhononEngine for ProcessEngine {
    fn build_model(&self, request: &ModelRequest) -> Result<ForceConstantModel> {
        if !request.folder.is_dir() {
            return Err(LtcError::DirectoryNotFound {
                path: request.folder.display().to_string(),
            });
        }

        Ok(ForceConstantModel {
            request: request.clone(),
        })
    }

    fn build_phonon_context(
        &self,
        model: &ForceConstantModel,
        request: &PhononRequest,
    ) -> Result<PhononContext> {
        Ok(PhononContext {
            model: model.clone(),
            settings: request.clone(),
        })
    }

    fn render_dispersion(
        &self,
        context: &PhononContext,
        path: &BandPath,
        folder: &Path,
    ) -> Result<()> {
        fs::create_dir_all(folder).map_err(|e| LtcError::DirectoryCreate {
            path: folder.display().to_string(),
            source: e,
        })?;

        let path_file = folder.join("band_path.csv");
        let freq_file = folder.join("frequencies.csv");
        exchange::write_band_path_csv(path, &path_file)?;

        let mut args = self.common_args(context);
        args.extend([
            "--path-file".to_string(),
            path_file.display().to_string(),
            "--output".to_string(),
            freq_file.display().to_string(),
        ]);
        self.invoke("dispersion", &args, folder, "Computing dispersion...")?;

        if !freq_file.exists() {
            return Err(LtcError::FileNotFound {
                path: freq_file.display().to_string(),
            });
        }
        let frequencies = exchange::read_frequencies_csv(&freq_file)?;
        if frequencies.len() != path.kpts.len() {
            return Err(LtcError::EngineOutput {
                path: freq_file.display().to_string(),
                reason: format!(
                    "expected {} rows (one per path point), found {}",
                    path.kpts.len(),
                    frequencies.len()
                ),
            });
        }

        plot::dispersion::generate_dispersion_plot(
            path,
            &frequencies,
            &folder.join("dispersion.png"),
            &format!("Phonon dispersion ({})", path.path),
            1200,
            800,
        )
    }

    fn compute_conductivity(
        &self,
        context: &PhononContext,
        method: ConductivityMethod,
    ) -> Result<Vec<Matrix3>> {
        let folder = &context.settings.folder;
        let output = folder.join("conductivity_modes.csv");

        let mut args = self.common_args(context);
        args.extend([
            "--method".to_string(),
            method.engine_name().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ]);
        self.invoke(
            "conductivity",
            &args,
            folder,
            &format!("Computing conductivity ({})...", method.description()),
        )?;

        if !output.exists() {
            return Err(LtcError::FileNotFound {
                path: output.display().to_string(),
            });
        }
        exchange::read_mode_conductivity_csv(&output)
    }
}
