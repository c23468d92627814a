use std::time::Duration;

use chat2md_core::{LoadStrategy, Platform};

#[test]
fn doubao_waits_for_load_and_three_seconds() {
    let platform = Platform::detect("https://www.DOUBAO.com/thread/abc");
    assert_eq!(platform, Platform::Doubao);
    let profile = platform.profile();
    assert_eq!(profile.load_strategy, LoadStrategy::Load);
    assert_eq!(profile.settle_delay, Duration::from_millis(3000));
}

#[test]
fn gemini_and_short_links_wait_five_seconds() {
    for url in [
        "https://gemini.google.com/share/123",
        "https://g.co/gemini/share/456",
    ] {
        let platform = Platform::detect(url);
        assert_eq!(platform, Platform::Gemini, "{url}");
        let profile = platform.profile();
        assert_eq!(profile.load_strategy, LoadStrategy::Load);
        assert_eq!(profile.settle_delay, Duration::from_millis(5000));
    }
}

#[test]
fn everything_else_uses_network_idle() {
    let platform = Platform::detect("https://chatgpt.com/share/xyz");
    assert_eq!(platform, Platform::Default);
    let profile = platform.profile();
    assert_eq!(profile.load_strategy, LoadStrategy::NetworkIdle);
    assert_eq!(profile.settle_delay, Duration::from_millis(2000));
    assert_eq!(platform.name(), "default");
}
