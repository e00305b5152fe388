use anyhow::{bail, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Images attached to a site: one picture, or an ordered set shown as a carousel.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Single(String),
    Multiple(Vec<String>),
}

impl ImageSource {
    /// Builds a source from a list, collapsing a one-element list into `Single`.
    pub fn from_urls<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        match urls.len() {
            0 => bail!("image list must not be empty"),
            1 => Ok(ImageSource::Single(urls.remove(0))),
            _ => Ok(ImageSource::Multiple(urls)),
        }
    }

    pub fn urls(&self) -> Vec<&str> {
        match self {
            ImageSource::Single(url) => vec![url.as_str()],
            ImageSource::Multiple(urls) => urls.iter().map(String::as_str).collect(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            ImageSource::Single(_) => 1,
            ImageSource::Multiple(urls) => urls.len(),
        }
    }

    pub fn is_carousel(&self) -> bool {
        matches!(self, ImageSource::Multiple(_))
    }
}

#[derive(Debug, Clone)]
pub struct SiteRecord {
    /// Stable key for client-side storage; survives catalog reordering.
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub images: ImageSource,
}

impl SiteRecord {
    pub fn new(id: &str, name: &str, coordinate: Coordinate, images: ImageSource) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            coordinate,
            images,
        }
    }
}

const PAGES_IMAGES: &str = "https://jswegleitner.github.io/SAP_Evaluator_Case_Studies/images";

/// The compiled-in list of inspection sites.
pub fn damage_sites() -> Result<Vec<SiteRecord>> {
    let img = |file: &str| format!("{}/{}", PAGES_IMAGES, file);

    Ok(vec![
        SiteRecord::new(
            "building-a",
            "Building A",
            Coordinate::new(37.78882458093672, -122.39127790986115),
            ImageSource::Single(img("375-Beale-St-San-Francisco-CA-Primary-Photo-1-Large.jpg")),
        ),
        SiteRecord::new(
            "building-b",
            "Building B",
            Coordinate::new(37.779569006965744, -122.41922021805215),
            ImageSource::Single(img("San_Francisco_City_Hall_1906-04-20.jpg")),
        ),
        SiteRecord::new(
            "building-c",
            "Building C",
            Coordinate::new(37.791187516917894, -122.44426156272114),
            ImageSource::from_urls(
                ["IMG_0944.JPG", "IMG_0945.JPG", "IMG_0946.JPG", "IMG_0948.JPG"].map(img),
            )?,
        ),
    ])
}

/// Checks the invariants every later stage relies on.
pub fn validate(sites: &[SiteRecord]) -> Result<()> {
    let mut seen = HashSet::new();

    for (index, site) in sites.iter().enumerate() {
        if site.id.trim().is_empty() {
            bail!("site #{} ({}) has an empty id", index, site.name);
        }
        if !seen.insert(site.id.as_str()) {
            bail!("duplicate site id '{}'", site.id);
        }
        if !site.coordinate.is_valid() {
            bail!(
                "site '{}' has an invalid coordinate ({}, {})",
                site.id,
                site.coordinate.lat,
                site.coordinate.lng
            );
        }
        if let ImageSource::Multiple(urls) = &site.images {
            match urls.len() {
                0 => bail!("site '{}' has no images", site.id),
                1 => bail!("site '{}' has a carousel with a single image", site.id),
                _ => {}
            }
        }
        if site.images.urls().iter().any(|url| url.trim().is_empty()) {
            bail!("site '{}' has an empty image URL", site.id);
        }
    }

    Ok(())
}
