pub const INDEX_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/index.html"
));
pub const STYLES_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/styles.css"
));
pub const APP_JS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/app.js"
));

const SUN_SVG: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/icons/sun.svg"
));
const RAIN_SVG: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/icons/rain.svg"
));

/// Season icons shown next to the dropdown.
pub fn icon(name: &str) -> Option<&'static [u8]> {
    match name {
        "sun.svg" => Some(SUN_SVG),
        "rain.svg" => Some(RAIN_SVG),
        _ => None,
    }
}
