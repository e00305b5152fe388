use crate::catalog::ImageSource;

/// Marker colors offered in every popup, as (data-color, label).
const MARK_COLORS: &[(&str, &str)] = &[("red", "Red"), ("yellow", "Yellow"), ("green", "Green")];

pub struct PopupOptions {
    pub inspection_form: bool,
}

/// Renders the popup for one site.
///
/// `images` must already hold resolved URLs. `index` is the site's position in
/// the catalog and keeps carousel ids unique on the page.
pub fn render_popup(
    site_id: &str,
    name: &str,
    images: &ImageSource,
    index: usize,
    options: &PopupOptions,
) -> String {
    let mut html = format!("<h4>{}</h4>", name);

    match images {
        ImageSource::Single(url) => html.push_str(&single_image(url)),
        ImageSource::Multiple(urls) => html.push_str(&carousel(&format!("carousel{}", index), urls)),
    }

    html.push_str(&action_bar(site_id, name, options));
    html
}

fn single_image(url: &str) -> String {
    format!(
        r#"<img src="{}" class="site-image" style="max-width:420px;"><br>"#,
        url
    )
}

fn carousel(carousel_id: &str, urls: &[String]) -> String {
    let mut indicators = String::new();
    let mut items = String::new();

    for (i, url) in urls.iter().enumerate() {
        let current = if i == 0 { r#" class="active" aria-current="true""# } else { "" };
        indicators.push_str(&format!(
            r##"<button type="button" data-bs-target="#{}" data-bs-slide-to="{}"{} aria-label="Slide {}"></button>"##,
            carousel_id,
            i,
            current,
            i + 1
        ));

        let item_class = if i == 0 { "carousel-item active" } else { "carousel-item" };
        items.push_str(&format!(
            r#"<div class="{}"><img src="{}" class="d-block w-100" style="max-height:360px; object-fit:contain;"></div>"#,
            item_class, url
        ));
    }

    format!(
        concat!(
            r#"<div id="{id}" class="carousel slide" data-bs-interval="false" data-bs-touch="false">"#,
            r#"<div class="carousel-indicators">{indicators}</div>"#,
            r#"<div class="carousel-inner">{items}</div>"#,
            r##"<button class="carousel-control-prev" type="button" data-bs-target="#{id}" data-bs-slide="prev">"##,
            r#"<span class="carousel-control-prev-icon" aria-hidden="true"></span>"#,
            r#"<span class="visually-hidden">Previous</span>"#,
            r#"</button>"#,
            r##"<button class="carousel-control-next" type="button" data-bs-target="#{id}" data-bs-slide="next">"##,
            r#"<span class="carousel-control-next-icon" aria-hidden="true"></span>"#,
            r#"<span class="visually-hidden">Next</span>"#,
            r#"</button>"#,
            r#"</div>"#
        ),
        id = carousel_id,
        indicators = indicators,
        items = items
    )
}

fn action_bar(site_id: &str, name: &str, options: &PopupOptions) -> String {
    let mut html = String::from(r#"<div class="mt-2">"#);

    for (color, label) in MARK_COLORS {
        html.push_str(&format!(
            r#"<button class="btn btn-sm btn-outline-dark mark-btn" data-color="{}">Mark {}</button> "#,
            color, label
        ));
    }

    if options.inspection_form {
        html.push_str(&format!(
            r#"<button class="btn btn-sm btn-primary open-form-btn" data-site-id="{}" data-site-name="{}">Open Form</button>"#,
            site_id, name
        ));
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_FORM: PopupOptions = PopupOptions { inspection_form: true };

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://img.test/{}.jpg", i)).collect()
    }

    #[test]
    fn single_image_has_no_carousel_controls() {
        let html = render_popup(
            "building-a",
            "Building A",
            &ImageSource::Single("https://img.test/a.jpg".into()),
            0,
            &WITH_FORM,
        );

        assert!(html.starts_with("<h4>Building A</h4>"));
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(html.contains(r#"src="https://img.test/a.jpg""#));
        assert!(!html.contains("carousel"));
        assert!(!html.contains("data-bs-slide"));
    }

    #[test]
    fn carousel_has_one_indicator_and_item_per_image() {
        for n in [2, 4, 7] {
            let html = render_popup("c", "C", &ImageSource::Multiple(urls(n)), 2, &WITH_FORM);

            assert_eq!(html.matches("data-bs-slide-to=").count(), n);
            assert_eq!(html.matches(r#"class="carousel-item"#).count(), n);
            assert_eq!(html.matches("<img ").count(), n);
            assert_eq!(html.matches(r#"class="carousel-item active""#).count(), 1);
            assert_eq!(html.matches(r#"aria-current="true""#).count(), 1);
        }
    }

    #[test]
    fn only_first_slide_is_active() {
        let html = render_popup("c", "C", &ImageSource::Multiple(urls(3)), 0, &WITH_FORM);

        let active = html.find(r#"class="carousel-item active""#).unwrap();
        let first_img = html.find("https://img.test/0.jpg").unwrap();
        let second_img = html.find("https://img.test/1.jpg").unwrap();
        assert!(active < first_img && first_img < second_img);
        assert!(html.contains(r#"data-bs-slide-to="0" class="active" aria-current="true""#));
        assert!(html.contains(r#"data-bs-slide-to="1" aria-label="Slide 2""#));
    }

    #[test]
    fn carousel_controls_target_indexed_id() {
        let html = render_popup("c", "C", &ImageSource::Multiple(urls(2)), 5, &WITH_FORM);

        assert!(html.contains(r#"<div id="carousel5" class="carousel slide" data-bs-interval="false""#));
        // 2 indicators + prev + next
        assert_eq!(html.matches(r##"data-bs-target="#carousel5""##).count(), 4);
    }

    #[test]
    fn action_bar_carries_stable_site_id() {
        let html = render_popup(
            "building-b",
            "Building B",
            &ImageSource::Single("https://img.test/b.jpg".into()),
            1,
            &WITH_FORM,
        );

        assert_eq!(html.matches("mark-btn").count(), 3);
        for color in ["red", "yellow", "green"] {
            assert!(html.contains(&format!(r#"data-color="{}""#, color)));
        }
        assert!(html.contains(r#"data-site-id="building-b""#));
        assert!(html.ends_with("Open Form</button></div>"));
    }

    #[test]
    fn inspection_button_omitted_when_disabled() {
        let html = render_popup(
            "building-a",
            "Building A",
            &ImageSource::Single("https://img.test/a.jpg".into()),
            0,
            &PopupOptions { inspection_form: false },
        );

        assert!(!html.contains("Open Form"));
        assert_eq!(html.matches("mark-btn").count(), 3);
    }
}
