// Output
pub const DEFAULT_OUTPUT_PATH: &str = "sap_case_study_map.html";
pub const CONFIG_FILE_NAME: &str = "casestudy_map.ini";

// Base map
pub const DEFAULT_CENTER: (f64, f64) = (37.7749, -122.4194);
pub const DEFAULT_ZOOM: u8 = 14;
pub const POPUP_MAX_WIDTH: u32 = 650;

pub const OSM_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const ESRI_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const ESRI_ATTRIBUTION: &str = "Esri";

// CDN bundles loaded by the generated page at view time
pub const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css";
pub const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js";
pub const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";

// URL resolution
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 6;
pub const DEFAULT_CANONICAL_OWNER: &str = "jswegleitner";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/400x300?text=Image+not+available";
pub const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";
pub const PAGES_HOST_SUFFIX: &str = "github.io";
pub const CDN_PROXY_BASE: &str = "https://cdn.jsdelivr.net/gh";
pub const BRANCH_PAIR: (&str, &str) = ("main", "master");

// Inspection form
pub const DEFAULT_INSPECTION_PDF_URL: &str = "inspection_form.pdf";
