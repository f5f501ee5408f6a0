use feed_harness::{FeedConfig, Harness};

fn message_feed() -> &'static str {
    r#"
    <div class="container">
      <div class="message">
        <form method="POST" action="/messages/42/like" data="42">
          <button class="btn like"><i class="far fa-star" id="star42"></i></button>
        </form>
      </div>
      <div class="message">
        <form method="POST" action="/messages/77/like" data="77">
          <button class="btn like"><i class="fas fa-star" id="star77"></i></button>
        </form>
      </div>
    </div>
    "#
}

#[test]
fn single_click_posts_once_to_message_endpoint() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.click("#star42")?;

    assert_eq!(h.issued_requests(), ["POST /messages/42/like"]);
    assert!(h.navigations().is_empty());
    Ok(())
}

#[test]
fn double_click_round_trips_to_original_state() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.click("#star42")?;
    h.click("#star42")?;
    assert_eq!(
        h.issued_requests(),
        ["POST /messages/42/like", "POST /messages/42/like"]
    );

    h.resolve_next(200)?;
    h.resolve_next(200)?;
    h.assert_has_class("#star42", "far")?;
    h.assert_lacks_class("#star42", "fas")?;
    Ok(())
}

#[test]
fn each_message_resolves_its_own_identifier() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.click("#star77")?;
    h.click("#star42")?;

    assert_eq!(
        h.issued_requests(),
        ["POST /messages/77/like", "POST /messages/42/like"]
    );

    // An already-filled star goes back to outline on success.
    h.resolve_next(200)?;
    h.assert_has_class("#star77", "far")?;
    h.assert_lacks_class("#star77", "fas")?;
    Ok(())
}

#[test]
fn messages_added_after_binding_still_toggle() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.append_html(
        ".container",
        r#"
        <div class="message">
          <form method="POST" action="/messages/99/like" data="99">
            <button class="btn like"><i class="far fa-star" id="star99"></i></button>
          </form>
        </div>
        "#,
    )?;

    h.click("#star99")?;
    assert_eq!(h.issued_requests(), ["POST /messages/99/like"]);

    h.resolve_next(200)?;
    h.assert_has_class("#star99", "fas")?;
    Ok(())
}

#[test]
fn toggle_applies_to_the_clicked_element_only() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.click("#star42")?;
    h.resolve_next(200)?;

    h.assert_has_class("#star42", "fas")?;
    // The enclosing button keeps its own classes untouched.
    h.assert_has_class(".container .like", "btn")?;
    h.assert_lacks_class(".container .like", "fas")?;
    Ok(())
}

#[test]
fn out_of_order_responses_apply_per_response() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(message_feed())?;
    h.install_like_toggle(&FeedConfig::default())?;

    h.click("#star42")?;
    h.click("#star42")?;
    let pending = h.pending_requests();

    // Later response lands first; each success still toggles once.
    h.resolve_request(pending[1].id, 204)?;
    h.assert_has_class("#star42", "fas")?;
    h.fail_request(pending[0].id, "timed out")?;
    h.assert_has_class("#star42", "fas")?;

    assert_eq!(h.take_warnings().len(), 1);
    Ok(())
}
