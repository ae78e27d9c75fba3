use periodical_core::ImageRegistry;
use periodical_engine::{
    rewrite_images, strip_frames, widont, BodyNormalizer, RegexNormalizer,
};
use pretty_assertions::assert_eq;

#[test]
fn frames_are_removed_wherever_they_appear() {
    let body = r#"<p>Intro</p><div><IFRAME src="https://video.example/x" width=640></iframe></div><iframe src="x">"#;
    let stripped = strip_frames(body);

    assert!(!stripped.to_ascii_lowercase().contains("iframe"));
    assert_eq!(stripped, "<p>Intro</p><div></div>");
}

#[test]
fn frames_in_partial_markup_are_removed() {
    let body = r#"text <iframe src="x" allowfullscreen"#;
    // An unterminated tag is left alone; only complete tags are matched.
    assert_eq!(strip_frames(body), body);
    assert_eq!(strip_frames(r#"a<iframe src="x">b"#), "ab");
}

#[test]
fn images_point_at_numbered_assets() {
    let mut images = ImageRegistry::new();
    let body = r#"<p>One</p><img src="http://a/b.png" alt="x"><img class="wide" src='http://a/c.png'/>"#;

    let rewritten = rewrite_images(body, &mut images);

    assert_eq!(
        rewritten,
        r#"<p>One</p><img src="0.jpg" width="50%"><img src="1.jpg" width="50%">"#
    );
    assert_eq!(images.get(0), Some("http://a/b.png"));
    assert_eq!(images.get(1), Some("http://a/c.png"));
}

#[test]
fn images_without_trailing_attributes_are_rewritten() {
    let mut images = ImageRegistry::new();
    let rewritten = rewrite_images(r#"<img src="http://a/b.png">"#, &mut images);
    assert_eq!(rewritten, r#"<img src="0.jpg" width="50%">"#);
}

#[test]
fn data_src_is_not_mistaken_for_src() {
    let mut images = ImageRegistry::new();
    let rewritten = rewrite_images(
        r#"<img data-src="http://lazy/x.png" src="http://a/real.png" alt="">"#,
        &mut images,
    );
    assert_eq!(rewritten, r#"<img src="0.jpg" width="50%">"#);
    assert_eq!(images.get(0), Some("http://a/real.png"));
}

#[test]
fn registration_continues_after_existing_images() {
    let mut images: ImageRegistry = ["http://pre/0.png"].into_iter().collect();
    let rewritten = rewrite_images(r#"<img src="http://a/b.png" alt="x">"#, &mut images);
    assert_eq!(rewritten, r#"<img src="1.jpg" width="50%">"#);
}

#[test]
fn widont_binds_last_word_before_block_end() {
    assert_eq!(
        widont("<p>a very long line</p>"),
        "<p>a very long&nbsp;line</p>"
    );
}

#[test]
fn widont_fires_at_end_of_text() {
    assert_eq!(widont("a very long line"), "a very long&nbsp;line");
}

#[test]
fn widont_matches_tags_case_insensitively() {
    assert_eq!(
        widont("first words<BR>second line here</H2>"),
        "first&nbsp;words<BR>second line&nbsp;here</H2>"
    );
}

#[test]
fn widont_leaves_single_words_alone() {
    assert_eq!(widont("<p>Alone</p>"), "<p>Alone</p>");
    assert_eq!(widont("<span>a b</span>"), "<span>a b</span>");
}

#[test]
fn normalizer_runs_all_steps_in_order() {
    let mut images = ImageRegistry::new();
    let body = r#"<iframe src="v"></iframe><p>See the chart <img src="http://a/b.png" alt="chart"> below now</p>"#;

    let out = RegexNormalizer.normalize(body, &mut images);

    assert_eq!(
        out,
        r#"<p>See the chart <img src="0.jpg" width="50%"> below&nbsp;now</p>"#
    );
    assert_eq!(images.len(), 1);
}

#[test]
fn repeated_image_is_registered_twice() {
    let mut images = ImageRegistry::new();
    let body = r#"<img src="http://a/b.png" alt=""><img src="http://a/b.png" alt="">"#;

    let out = RegexNormalizer.normalize(body, &mut images);

    assert_eq!(
        out,
        r#"<img src="0.jpg" width="50%"><img src="1.jpg" width="50%">"#
    );
    assert_eq!(images.len(), 2);
}
