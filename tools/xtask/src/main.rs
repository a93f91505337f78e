//! # xtask
//!
//! workspace 的本地检查入口：`cargo xtask <command>`。
//!
//! - `check-all`：fmt / clippy / test，最后回放全部场景
//! - `cov [runtime|workspace]`：llvm-cov HTML 报告
//! - `scenario-check [path]`：回放场景文件并检查事件序列

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::Context;
use height_runtime::{HeightEvent, Scenario};
use walkdir::WalkDir;

/// `check-all` 依次执行的 cargo 命令
const GATE: &[&[&str]] = &[
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

/// 默认场景目录（相对于 workspace root）
const SCENARIOS_DIR: &str = "scenarios";

const USAGE: &str = "\
usage: cargo xtask <command>

  check-all               fmt + clippy + test，然后回放 scenarios/
  cov [runtime|workspace] 覆盖率报告（默认 runtime），输出到 target/llvm-cov/html
  scenario-check [path]   回放场景；path 可以是文件或目录，缺省为 scenarios/";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Job {
    CheckAll,
    Cov(CovScope),
    ScenarioCheck(Option<PathBuf>),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CovScope {
    /// 只统计 height-runtime
    Runtime,
    /// 组件 crate，不含工具
    Workspace,
}

impl CovScope {
    fn llvm_cov_args(self) -> &'static [&'static str] {
        match self {
            Self::Runtime => &["llvm-cov", "-p", "height-runtime", "--all-features", "--html"],
            Self::Workspace => &[
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--exclude",
                "height-sim",
                "--html",
            ],
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Job> {
    let Some(command) = args.next() else {
        return Ok(Job::Help);
    };
    let job = match command.as_str() {
        "check-all" => Job::CheckAll,
        "cov" => match args.next().as_deref() {
            None | Some("runtime") => Job::Cov(CovScope::Runtime),
            Some("workspace") => Job::Cov(CovScope::Workspace),
            Some(other) => anyhow::bail!("unknown coverage scope: {other}"),
        },
        "scenario-check" => Job::ScenarioCheck(args.next().map(PathBuf::from)),
        "help" | "-h" | "--help" => Job::Help,
        other => anyhow::bail!("unknown xtask command: {other}\n\n{USAGE}"),
    };
    Ok(job)
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    match parse_args(std::env::args().skip(1))? {
        Job::CheckAll => {
            for args in GATE {
                cargo(args)?;
            }
            scenario_check(None)
        }
        Job::Cov(scope) => {
            cargo(&["llvm-cov", "--version"]).context(
                "需要 cargo-llvm-cov：cargo install cargo-llvm-cov && rustup component add llvm-tools-preview",
            )?;
            cargo(scope.llvm_cov_args())?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
            Ok(())
        }
        Job::ScenarioCheck(path) => scenario_check(path.as_deref()),
        Job::Help => {
            eprintln!("{USAGE}");
            Ok(())
        }
    }
}

/// 运行一条 cargo 命令，失败时报告完整命令行
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let line = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {line}");
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("无法启动 {line}"))?;
    anyhow::ensure!(status.success(), "{line} failed with {status}");
    Ok(())
}

//=============================================================================
// scenario-check
//=============================================================================

fn scenario_check(path: Option<&Path>) -> anyhow::Result<()> {
    let root = path.unwrap_or(Path::new(SCENARIOS_DIR));
    anyhow::ensure!(
        root.exists(),
        "场景路径不存在: {}（请在 workspace 根目录运行，或指定路径）",
        root.display()
    );

    let files = scenario_files(root);
    if files.is_empty() {
        eprintln!("{} 下没有 .json 场景", root.display());
        return Ok(());
    }

    let mut failed = 0usize;
    for file in &files {
        let problems = match Scenario::load(file) {
            Ok(scenario) => replay(&scenario),
            Err(e) => vec![e.to_string()],
        };
        if problems.is_empty() {
            eprintln!("[OK]    {}", file.display());
        }
        for problem in &problems {
            eprintln!("[ERROR] {}: {problem}", file.display());
        }
        failed += usize::from(!problems.is_empty());
    }

    anyhow::ensure!(failed == 0, "{failed}/{} 个场景未通过", files.len());
    eprintln!("{} 个场景全部通过", files.len());
    Ok(())
}

fn scenario_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 回放一个场景，返回发现的问题
///
/// 被抢占的过渡只有开始没有结束，所以只要求结束事件不多于开始事件。
fn replay(scenario: &Scenario) -> Vec<String> {
    let host = scenario.run();
    let mut problems = Vec::new();

    if scenario.run_until_ms.is_none() && host.controller().is_animating() {
        problems.push(format!("回放结束于 {}ms 时过渡仍未稳定", host.now_ms()));
    }

    let mut open = 0usize;
    for (at_ms, event) in host.events() {
        match event {
            HeightEvent::AnimationStart { .. } => open += 1,
            HeightEvent::AnimationEnd { .. } => match open.checked_sub(1) {
                Some(rest) => open = rest,
                None => {
                    problems.push(format!("{at_ms}ms 的 AnimationEnd 之前没有 AnimationStart"));
                    break;
                }
            },
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[])).unwrap(), Job::Help);
        assert_eq!(parse_args(args(&["cov"])).unwrap(), Job::Cov(CovScope::Runtime));
        assert_eq!(
            parse_args(args(&["cov", "workspace"])).unwrap(),
            Job::Cov(CovScope::Workspace)
        );
        assert_eq!(
            parse_args(args(&["scenario-check", "scenarios/accordion.json"])).unwrap(),
            Job::ScenarioCheck(Some(PathBuf::from("scenarios/accordion.json")))
        );
        assert!(parse_args(args(&["cov", "everything"])).is_err());
        assert!(parse_args(args(&["deploy"])).is_err());
    }

    #[test]
    fn test_replay_settled_scenario_is_clean() {
        let scenario = Scenario::from_json_str(
            r#"{ "initial": 0, "content_height": 40, "steps": [{ "at_ms": 0, "height": "auto" }] }"#,
        )
        .unwrap();
        assert!(replay(&scenario).is_empty());
    }

    #[test]
    fn test_replay_allows_bounded_run_mid_transition() {
        let scenario = Scenario::from_json_str(
            r#"{ "initial": 0, "steps": [{ "at_ms": 0, "height": 100 }], "run_until_ms": 10 }"#,
        )
        .unwrap();
        assert!(scenario.run().controller().is_animating());
        assert!(replay(&scenario).is_empty());
    }
}
