use feed_harness::Harness;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};

fn tag_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("div"),
        Just("section"),
        Just("span"),
        Just("p"),
        Just("form"),
        Just("ul"),
        Just("li"),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn class_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("alpha"),
        Just("beta"),
        Just("gamma"),
        Just("like"),
        Just("message"),
        Just("far"),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn layer_strategy() -> BoxedStrategy<(String, String)> {
    (tag_strategy(), class_strategy()).boxed()
}

fn selector_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z0-9#.*>,\\[\\]='\" _:+~-]{0,16}")
        .expect("valid regex")
        .boxed()
}

fn build_document(layers: &[(String, String)]) -> String {
    let mut html = String::new();
    for (tag, class) in layers {
        html.push_str(&format!("<{tag} class=\"{class}\">"));
    }
    html.push_str("<div id=\"probe\" class=\"p-mark\">payload</div>");
    for (tag, _) in layers.iter().rev() {
        html.push_str(&format!("</{tag}>"));
    }
    html
}

fn fail(err: feed_harness::Error) -> TestCaseError {
    TestCaseError::fail(err.to_string())
}

fn check_probe_document(layers: &[(String, String)]) -> TestCaseResult {
    let html = build_document(layers);
    let h = Harness::from_html(&html).map_err(fail)?;

    prop_assert_eq!(h.query_count("#probe").map_err(fail)?, 1);
    prop_assert_eq!(h.query_count("div#probe.p-mark").map_err(fail)?, 1);
    prop_assert_eq!(h.query_count(".p-mark").map_err(fail)?, 1);
    prop_assert_eq!(h.text("#probe").map_err(fail)?, "payload");

    for (tag, class) in layers {
        let scoped = format!("{tag}.{class} #probe");
        prop_assert_eq!(h.query_count(&scoped).map_err(fail)?, 1);
    }
    Ok(())
}

proptest! {
    #[test]
    fn generated_documents_parse_and_match(layers in vec(layer_strategy(), 0..8)) {
        check_probe_document(&layers)?;
    }

    #[test]
    fn arbitrary_selector_input_never_panics(
        layers in vec(layer_strategy(), 0..4),
        selector in selector_strategy(),
    ) {
        let html = build_document(&layers);
        let h = Harness::from_html(&html).map_err(fail)?;
        // Any outcome is acceptable; the engine must only stay total.
        let _ = h.query_count(&selector);
    }

    #[test]
    fn appended_fragments_join_the_tree(layers in vec(layer_strategy(), 0..6)) {
        let html = build_document(&layers);
        let mut h = Harness::from_html(&html).map_err(fail)?;

        let before = h.query_count(".appended").map_err(fail)?;
        prop_assert_eq!(before, 0);

        h.append_html("#probe", "<span class=\"appended\">x</span>")
            .map_err(fail)?;
        prop_assert_eq!(h.query_count(".appended").map_err(fail)?, 1);
        prop_assert_eq!(h.query_count("#probe .appended").map_err(fail)?, 1);
    }
}
