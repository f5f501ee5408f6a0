use feed_harness::{Error, FeedConfig, Harness};

fn feed_with_compose() -> &'static str {
    r#"
    <div class="container">
      <div class="message">
        <form method="POST" action="/messages/5/like" data="5">
          <button class="like"><i class="far fa-star" id="star5"></i></button>
        </form>
      </div>
    </div>
    <form class="add-message" id="compose" action="/messages/new">
      <textarea name="text">draft text</textarea>
      <button type="submit" id="send">Add my message!</button>
    </form>
    <div class="modal show" id="newMessageModal"></div>
    "#
}

#[test]
fn submit_closes_modal_without_navigation_or_network() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(feed_with_compose())?;
    h.install_compose_modal(&FeedConfig::default())?;

    h.submit("#compose")?;

    h.assert_lacks_class("#newMessageModal", "show")?;
    assert!(h.navigations().is_empty());
    assert!(h.issued_requests().is_empty());
    assert!(h.pending_requests().is_empty());
    Ok(())
}

#[test]
fn send_button_click_goes_through_the_same_path() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(feed_with_compose())?;
    h.install_compose_modal(&FeedConfig::default())?;

    h.click("#send")?;

    h.assert_lacks_class("#newMessageModal", "show")?;
    assert!(h.navigations().is_empty());
    Ok(())
}

#[test]
fn repeated_submits_keep_toggling_the_modal() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(feed_with_compose())?;
    h.install_compose_modal(&FeedConfig::default())?;

    for round in 0..4 {
        h.submit("#compose")?;
        let open = h.has_class("#newMessageModal", "show")?;
        assert_eq!(open, round % 2 == 1);
    }
    assert!(h.navigations().is_empty());
    Ok(())
}

#[test]
fn both_handlers_coexist_independently() -> feed_harness::Result<()> {
    let mut h = Harness::from_html(feed_with_compose())?;
    let config = FeedConfig::default();
    h.install_like_toggle(&config)?;
    h.install_compose_modal(&config)?;

    h.click("#star5")?;
    h.submit("#compose")?;

    assert_eq!(h.issued_requests(), ["POST /messages/5/like"]);
    h.assert_lacks_class("#newMessageModal", "show")?;
    assert!(h.navigations().is_empty());

    h.resolve_next(200)?;
    h.assert_has_class("#star5", "fas")?;
    Ok(())
}

#[test]
fn like_only_page_variant_skips_the_compose_handler() -> feed_harness::Result<()> {
    // A feed page variant ships without the compose form; the like handler
    // must not depend on it.
    let html = r#"
    <div class="container">
      <form method="POST" action="/messages/8/like" data="8">
        <button class="like"><i class="far fa-star" id="star8"></i></button>
      </form>
    </div>
    "#;
    let mut h = Harness::from_html(html)?;
    let config = FeedConfig::default();
    h.install_like_toggle(&config)?;

    assert_eq!(
        h.install_compose_modal(&config),
        Err(Error::SelectorNotFound(".add-message".to_string()))
    );

    h.click("#star8")?;
    assert_eq!(h.issued_requests(), ["POST /messages/8/like"]);
    Ok(())
}
