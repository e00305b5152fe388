use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::catalog::{self, ImageSource, SiteRecord};
use crate::html_template::{BaseMap, MapDocument, MapMarker};
use crate::popup::{render_popup, PopupOptions};
use crate::resolver::{Probe, UrlResolver};
use crate::settings::Settings;

pub const MAP_TITLE: &str = "SAP Evaluator Case Study";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub sites: usize,
    pub images: usize,
    pub reachable: usize,
    pub repaired: usize,
    pub placeholders: usize,
    pub carousels: usize,
}

async fn resolve_images<P: Probe>(
    images: &ImageSource,
    resolver: &UrlResolver<P>,
    stats: &mut GenerationStats,
) -> ImageSource {
    let mut resolved = Vec::with_capacity(images.count());

    for url in images.urls() {
        let image = resolver.resolve(url).await;
        stats.images += 1;
        match (image.was_fixed, image.used_placeholder) {
            (false, _) => {
                debug!("✅ {}", image.original_url);
                stats.reachable += 1
            }
            (true, false) => stats.repaired += 1,
            (true, true) => stats.placeholders += 1,
        }
        resolved.push(image.resolved_url);
    }

    match images {
        ImageSource::Single(_) => ImageSource::Single(resolved.remove(0)),
        ImageSource::Multiple(_) => ImageSource::Multiple(resolved),
    }
}

/// Resolves every image in catalog order and assembles the map document.
pub async fn generate<P: Probe>(
    sites: &[SiteRecord],
    resolver: &UrlResolver<P>,
    settings: &Settings,
) -> Result<(MapDocument, GenerationStats)> {
    catalog::validate(sites).context("Invalid site catalog")?;

    let popup_options = PopupOptions {
        inspection_form: settings.inspection_form,
    };
    let mut stats = GenerationStats::default();
    let mut markers = Vec::with_capacity(sites.len());

    for (index, site) in sites.iter().enumerate() {
        info!("📍 {} ({} image(s))", site.name, site.images.count());

        let images = resolve_images(&site.images, resolver, &mut stats).await;
        if images.is_carousel() {
            stats.carousels += 1;
        }

        markers.push(MapMarker {
            dom_id: format!("popup-{}", site.id),
            coordinate: site.coordinate,
            popup_html: render_popup(&site.id, &site.name, &images, index, &popup_options),
        });
        stats.sites += 1;
    }

    let document = MapDocument {
        title: MAP_TITLE.to_string(),
        base: BaseMap::standard(settings.zoom_start),
        markers,
        inspection_pdf_url: settings
            .inspection_form
            .then(|| settings.inspection_pdf_url.clone()),
    };

    Ok((document, stats))
}

/// Full run: generate the document and write it to `output`.
pub async fn run<P: Probe>(
    sites: &[SiteRecord],
    resolver: &UrlResolver<P>,
    settings: &Settings,
    output: &Path,
) -> Result<GenerationStats> {
    let start_time = std::time::Instant::now();

    let (document, stats) = generate(sites, resolver, settings).await?;
    document.save(output).await?;

    info!("📊 Map statistics:");
    info!("   📍 Sites: {}", stats.sites);
    info!("   🖼️  Images: {} ({} in carousels)", stats.images, stats.carousels);
    info!("   ✅ Reachable: {}", stats.reachable);
    info!("   🔧 Repaired: {}", stats.repaired);
    info!("   ⚠️  Placeholders: {}", stats.placeholders);
    info!("   ⏱️  Time: {:.2} s", start_time.elapsed().as_secs_f64());
    info!("🎉 Map saved to {}", output.display());

    Ok(stats)
}
