//! # 场景文件回放测试
//!
//! 回放 workspace 根目录 `scenarios/` 下的示例场景。

use std::path::PathBuf;

use height_runtime::{HeightEvent, HeightSpec, Scenario};

fn scenario(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../scenarios")
        .join(name);
    Scenario::load(&path).unwrap()
}

fn ends(scenario: &Scenario) -> Vec<(u64, HeightSpec)> {
    scenario
        .run()
        .events()
        .into_iter()
        .filter_map(|(at, event)| match event {
            HeightEvent::AnimationEnd { new_height } => Some((at, new_height)),
            HeightEvent::AnimationStart { .. } => None,
        })
        .collect()
}

#[test]
fn test_accordion() {
    let scenario = scenario("accordion.json");
    let host = scenario.run();
    assert!(!host.controller().is_animating());
    assert_eq!(host.controller().state().rendered_height, HeightSpec::Auto);
    assert_eq!(
        ends(&scenario),
        vec![
            (300, HeightSpec::Auto),
            // auto → 0 需要额外一帧
            (916, HeightSpec::ZERO),
            (1500, HeightSpec::Auto),
        ]
    );
}

#[test]
fn test_preemption() {
    let scenario = scenario("preemption.json");
    let host = scenario.run();
    // 三次过渡中只有最后一次结束
    assert_eq!(ends(&scenario), vec![(430, HeightSpec::Auto)]);
    assert!(!host.content_display_hidden());
}

#[test]
fn test_from_auto() {
    let scenario = scenario("from-auto.json");
    let host = scenario.run();
    assert_eq!(host.controller().state().rendered_height, HeightSpec::Auto);
    assert_eq!(ends(&scenario).len(), 3);
}

#[test]
fn test_reduced_motion() {
    let scenario = scenario("reduced-motion.json");
    assert_eq!(
        ends(&scenario),
        vec![(0, HeightSpec::ZERO), (50, HeightSpec::Auto)]
    );
}

#[test]
fn test_unmount() {
    let scenario = scenario("unmount.json");
    let host = scenario.run();
    // 帧回调在卸载前已投递，结束回调在卸载后被丢弃
    assert_eq!(host.events().len(), 1);
    assert!(ends(&scenario).is_empty());
    assert!(!host.controller().is_mounted());
    assert_eq!(host.now_ms(), 600);
}
