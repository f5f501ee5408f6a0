use feed_harness::{FeedConfig, Harness};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{TestCaseError, TestCaseResult};

#[derive(Debug, Clone)]
enum Op {
    Click,
    ResolveOldest(u16),
    ResolveNewest(u16),
    FailOldest,
}

fn status_strategy() -> BoxedStrategy<u16> {
    prop_oneof![
        Just(200u16),
        Just(201u16),
        Just(204u16),
        Just(404u16),
        Just(500u16),
        Just(503u16),
    ]
    .boxed()
}

fn op_strategy() -> BoxedStrategy<Op> {
    prop_oneof![
        Just(Op::Click),
        status_strategy().prop_map(Op::ResolveOldest),
        status_strategy().prop_map(Op::ResolveNewest),
        Just(Op::FailOldest),
    ]
    .boxed()
}

fn feed_harness_under_test() -> feed_harness::Result<Harness> {
    let html = r#"
    <div class="container">
      <form method="POST" action="/messages/11/like" data="11">
        <button class="like"><i class="far fa-star" id="star"></i></button>
      </form>
    </div>
    "#;
    let mut h = Harness::from_html(html)?;
    h.install_like_toggle(&FeedConfig::default())?;
    Ok(h)
}

fn fail(err: feed_harness::Error) -> TestCaseError {
    TestCaseError::fail(err.to_string())
}

fn run_ops(ops: &[Op]) -> TestCaseResult {
    let mut h = feed_harness_under_test().map_err(fail)?;
    let mut clicks = 0usize;

    for op in ops {
        match op {
            Op::Click => {
                h.click("#star").map_err(fail)?;
                clicks += 1;
            }
            Op::ResolveOldest(status) => {
                if let Some(first) = h.pending_requests().first() {
                    h.resolve_request(first.id, *status).map_err(fail)?;
                }
            }
            Op::ResolveNewest(status) => {
                if let Some(last) = h.pending_requests().last() {
                    h.resolve_request(last.id, *status).map_err(fail)?;
                }
            }
            Op::FailOldest => {
                if !h.pending_requests().is_empty() {
                    h.fail_next("synthetic transport error").map_err(fail)?;
                }
            }
        }

        let outline = h.has_class("#star", "far").map_err(fail)?;
        let filled = h.has_class("#star", "fas").map_err(fail)?;
        prop_assert!(
            outline ^ filled,
            "icon must carry exactly one style, got outline={outline} filled={filled}"
        );
    }

    prop_assert_eq!(h.issued_requests().len(), clicks);
    prop_assert!(h.pending_requests().len() <= clicks);
    prop_assert!(h.navigations().is_empty());

    for issued in h.issued_requests() {
        prop_assert_eq!(issued.as_str(), "POST /messages/11/like");
    }
    Ok(())
}

proptest! {
    #[test]
    fn icon_always_carries_exactly_one_style(ops in vec(op_strategy(), 1..48)) {
        run_ops(&ops)?;
    }

    #[test]
    fn draining_all_pending_responses_balances_clicks(
        clicks in 1usize..12,
        status in status_strategy(),
    ) {
        let mut h = feed_harness_under_test().map_err(fail)?;
        for _ in 0..clicks {
            h.click("#star").map_err(fail)?;
        }
        let completed = h.resolve_all(status).map_err(fail)?;
        prop_assert_eq!(completed, clicks);
        prop_assert!(h.pending_requests().is_empty());

        let outline = h.has_class("#star", "far").map_err(fail)?;
        let success = (200..300).contains(&status);
        // Successes toggle per response; failures leave the icon alone.
        let expected_outline = if success { clicks % 2 == 0 } else { true };
        prop_assert_eq!(outline, expected_outline);
    }
}
