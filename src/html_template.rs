use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use std::path::Path;

use crate::catalog::Coordinate;
use crate::constants::*;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn asset(name: &str) -> Result<String> {
    let file = Asset::get(name).with_context(|| format!("Embedded asset missing: {}", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("Embedded asset is not UTF-8: {}", name))
}

/// Serializes a value for inlining inside a `<script>` block.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize script data")?;
    Ok(json.replace("</", "<\\/"))
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn new(name: &str, url: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BaseMap {
    pub center: Coordinate,
    pub zoom: u8,
    /// The first layer is shown on load; all of them appear in the layer control.
    pub tile_layers: Vec<TileLayer>,
}

impl BaseMap {
    /// Street map plus satellite imagery, centered on San Francisco.
    pub fn standard(zoom: u8) -> Self {
        Self {
            center: Coordinate::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom,
            tile_layers: vec![
                TileLayer::new("OpenStreetMap", OSM_TILES, OSM_ATTRIBUTION),
                TileLayer::new("Esri Satellite", ESRI_TILES, ESRI_ATTRIBUTION),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapMarker {
    pub dom_id: String,
    pub coordinate: Coordinate,
    pub popup_html: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientOptions<'a> {
    inspection_form: bool,
    inspection_pdf_url: &'a str,
}

pub struct MapDocument {
    pub title: String,
    pub base: BaseMap,
    pub markers: Vec<MapMarker>,
    /// `Some` injects the inspection modal pointing at this PDF.
    pub inspection_pdf_url: Option<String>,
}

impl MapDocument {
    pub fn render(&self) -> Result<String> {
        let inspection = self.inspection_pdf_url.as_deref();

        let mut client_script = asset("case_study.js")?;
        let modal = match inspection {
            Some(pdf_url) => {
                client_script.push('\n');
                client_script.push_str(&asset("inspection.js")?);
                asset("inspection_modal.html")?.replace("{INSPECTION_PDF_URL}", pdf_url)
            }
            None => String::new(),
        };

        let html = MAP_HTML
            .replace("<!-- TITLE -->", &self.title)
            .replace("<!-- HEAD_ASSETS -->", &head_assets())
            .replace("/* MAP_STYLE */", &asset("map.css")?)
            .replace("<!-- POPUP_TEMPLATES -->", &self.popup_templates())
            .replace("<!-- INSPECTION_MODAL -->", &modal)
            .replace("<!-- BODY_SCRIPTS -->", &body_scripts())
            .replace("/* CLIENT_SCRIPT */", &client_script)
            .replace("/* MAP_SCRIPT */", &self.map_script(inspection)?);

        Ok(html)
    }

    /// Renders and writes the document, replacing any existing file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let html = self.render()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        tokio::fs::write(path, html)
            .await
            .with_context(|| format!("Failed to write map to {}", path.display()))?;
        Ok(())
    }

    fn popup_templates(&self) -> String {
        self.markers
            .iter()
            .map(|m| format!("    <template id=\"{}\">{}</template>\n", m.dom_id, m.popup_html))
            .collect()
    }

    fn map_script(&self, inspection: Option<&str>) -> Result<String> {
        let mut js = String::new();

        js.push_str(&format!(
            "        const map = L.map('map').setView([{}, {}], {});\n",
            self.base.center.lat, self.base.center.lng, self.base.zoom
        ));
        js.push_str(&format!(
            "        const tileLayers = {};\n",
            script_json(&self.base.tile_layers)?
        ));
        js.push_str(
            r#"        const baseLayers = {};
        tileLayers.forEach(function (layer, i) {
            const tiles = L.tileLayer(layer.url, { attribution: layer.attribution, maxZoom: 19 });
            if (i === 0) tiles.addTo(map);
            baseLayers[layer.name] = tiles;
        });
        L.control.layers(baseLayers).addTo(map);

        function popupContent(id) {
            return document.getElementById(id).innerHTML;
        }
"#,
        );

        for marker in &self.markers {
            js.push_str(&format!(
                "        L.marker([{}, {}]).bindPopup(popupContent({}), {{ maxWidth: {} }}).addTo(map);\n",
                marker.coordinate.lat,
                marker.coordinate.lng,
                script_json(&marker.dom_id)?,
                POPUP_MAX_WIDTH
            ));
        }

        let options = ClientOptions {
            inspection_form: inspection.is_some(),
            inspection_pdf_url: inspection.unwrap_or_default(),
        };
        js.push_str(&format!(
            "\n        initCaseStudyMap(map, {});\n",
            script_json(&options)?
        ));

        Ok(js)
    }
}

fn head_assets() -> String {
    [LEAFLET_CSS, BOOTSTRAP_CSS, FONT_AWESOME_CSS]
        .iter()
        .map(|href| format!("    <link rel=\"stylesheet\" href=\"{}\" />\n", href))
        .collect()
}

fn body_scripts() -> String {
    [LEAFLET_JS, BOOTSTRAP_JS]
        .iter()
        .map(|src| format!("    <script src=\"{}\"></script>\n", src))
        .collect()
}

// HTML template for the generated map page
const MAP_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title><!-- TITLE --></title>
<!-- HEAD_ASSETS -->    <style>
/* MAP_STYLE */
    </style>
</head>
<body>
    <div id="map"></div>

<!-- POPUP_TEMPLATES -->
<!-- INSPECTION_MODAL -->
<!-- BODY_SCRIPTS -->    <script>
/* CLIENT_SCRIPT */
    </script>
    <script>
/* MAP_SCRIPT */    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn document(inspection: Option<&str>) -> MapDocument {
        MapDocument {
            title: "Test Map".into(),
            base: BaseMap::standard(14),
            markers: vec![
                MapMarker {
                    dom_id: "popup-a".into(),
                    coordinate: Coordinate::new(37.5, -122.25),
                    popup_html: "<h4>A</h4>".into(),
                },
                MapMarker {
                    dom_id: "popup-b".into(),
                    coordinate: Coordinate::new(37.75, -122.5),
                    popup_html: "<h4>B</h4>".into(),
                },
            ],
            inspection_pdf_url: inspection.map(str::to_string),
        }
    }

    #[test]
    fn one_marker_and_template_per_pair() {
        let html = document(None).render().unwrap();

        assert_eq!(html.matches(".bindPopup(").count(), 2);
        assert!(html.contains(r#"<template id="popup-a"><h4>A</h4></template>"#));
        assert!(html.contains(r#"L.marker([37.5, -122.25]).bindPopup(popupContent("popup-a"), { maxWidth: 650 })"#));
        assert!(html.contains("L.control.layers(baseLayers)"));
        assert!(html.contains("setView([37.7749, -122.4194], 14)"));
    }

    #[test]
    fn every_placeholder_is_filled() {
        let html = document(Some("inspection_form.pdf")).render().unwrap();

        for marker in [
            "<!-- TITLE -->",
            "<!-- HEAD_ASSETS -->",
            "/* MAP_STYLE */",
            "<!-- POPUP_TEMPLATES -->",
            "<!-- INSPECTION_MODAL -->",
            "<!-- BODY_SCRIPTS -->",
            "/* CLIENT_SCRIPT */",
            "/* MAP_SCRIPT */",
            "{INSPECTION_PDF_URL}",
        ] {
            assert!(!html.contains(marker), "unfilled placeholder {}", marker);
        }
        assert!(html.contains(LEAFLET_JS));
        assert!(html.contains(BOOTSTRAP_CSS));
        assert!(html.contains("<title>Test Map</title>"));
    }

    #[test]
    fn tile_layers_are_script_safe() {
        let html = document(None).render().unwrap();

        assert!(html.contains(r#""name":"Esri Satellite""#));
        // The OSM attribution carries an anchor tag; its closing tag must not end the script.
        assert!(html.contains(r#"OpenStreetMap<\/a> contributors"#));
    }

    #[test]
    fn inspection_modal_is_optional() {
        let with = document(Some("docs/form.pdf")).render().unwrap();
        assert!(with.contains(r#"id="inspectionModal""#));
        assert!(with.contains(r#"src="docs/form.pdf""#));
        assert!(with.contains("function createInspectionForm"));
        assert!(with.contains(r#"initCaseStudyMap(map, {"inspectionForm":true,"inspectionPdfUrl":"docs/form.pdf"})"#));

        let without = document(None).render().unwrap();
        assert!(!without.contains("inspectionModal\""));
        assert!(!without.contains("function createInspectionForm"));
        assert!(without.contains(r#"initCaseStudyMap(map, {"inspectionForm":false,"inspectionPdfUrl":""})"#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = document(Some("inspection_form.pdf"));
        assert_eq!(doc.render().unwrap(), doc.render().unwrap());
    }

    #[tokio::test]
    async fn save_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("map.html");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale").unwrap();

        document(None).save(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!written.contains("stale"));

        let nested = dir.path().join("a").join("b").join("map.html");
        document(None).save(&nested).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn save_fails_when_target_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = document(None).save(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to write map"));
    }
}
