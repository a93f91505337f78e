//! # Height Sim
//!
//! 场景回放工具：在虚拟时钟上回放一组高度变化，输出状态提交与事件的时间线。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p height-sim -- run scenarios/accordion.json
//! cargo run -p height-sim -- run scenarios/accordion.json --json
//! cargo run -p height-sim -- run scenarios/accordion.json --config my-config.json --verbose
//! cargo run -p height-sim -- run scenarios/accordion.json --reduced-motion
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use height_runtime::{AnimateHeightConfig, Scenario, SimulatedHost};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "height-sim")]
#[command(about = "高度过渡场景回放工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出控制器的调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放场景并打印时间线
    Run {
        /// 场景文件（JSON）
        file: PathBuf,

        /// 以 JSON 输出时间线
        #[arg(long)]
        json: bool,

        /// 用指定的配置文件替换场景内的配置
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 模拟系统开启了减弱动效
        #[arg(long)]
        reduced_motion: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli.command) {
        eprintln!("height-sim error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::TRACE } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            file,
            json,
            config,
            reduced_motion,
        } => {
            let host = run_scenario(&file, config.as_deref(), reduced_motion)?;
            if json {
                let out = serde_json::to_string_pretty(host.timeline())?;
                println!("{out}");
            } else {
                print!("{}", host.render_timeline());
                print_summary(&host);
            }
        }
    }
    Ok(())
}

fn run_scenario(
    file: &Path,
    config: Option<&Path>,
    reduced_motion: bool,
) -> anyhow::Result<SimulatedHost> {
    let mut scenario = Scenario::load(file)
        .with_context(|| format!("无法加载场景 {}", file.display()))?;

    if let Some(path) = config {
        scenario.config = AnimateHeightConfig::load(path)
            .with_context(|| format!("无法加载配置 {}", path.display()))?;
    }
    if reduced_motion {
        scenario.env_reduced_motion = true;
    }

    debug!(
        steps = scenario.steps.len(),
        duration_ms = scenario.config.duration_ms,
        delay_ms = scenario.config.delay_ms,
        "开始回放"
    );
    Ok(scenario.run())
}

fn print_summary(host: &SimulatedHost) {
    let controller = host.controller();
    println!("─────────────────────────────────────────────────────");
    println!(
        "结束于 {}ms：高度 {}，{}",
        host.now_ms(),
        controller.state().rendered_height,
        if controller.is_animating() {
            "过渡未完成"
        } else {
            "已稳定"
        }
    );
    println!(
        "{} 次提交，{} 个事件",
        host.commits().len(),
        host.events().len()
    );
}
