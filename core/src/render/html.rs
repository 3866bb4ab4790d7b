use crate::prelude::{FeedError, FeedResult};
use crate::render::view::{escape_html, MapView};
use serde_json::{json, Value};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__TITLE__</title>
  <link rel="stylesheet" href="__LEAFLET_CSS__">
  <style>
    html, body { height: 100%; margin: 0; }
    #__CONTAINER__ { height: 100%; }
    .info { padding: 6px 8px; background: rgba(255, 255, 255, 0.85); border-radius: 5px; box-shadow: 0 0 15px rgba(0, 0, 0, 0.2); }
    .legend { line-height: 18px; color: #555; }
    .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.7; }
    .notice { color: #800026; font-weight: bold; max-width: 320px; }
  </style>
</head>
<body>
  <div id="__CONTAINER__">__NOTICE__</div>
  <script src="__LEAFLET_JS__"></script>
  <script>
    const view = __VIEW__;

    const baseMaps = {};
    view.baseLayers.forEach(function (layer) {
      baseMaps[layer.name] = L.tileLayer(layer.url, { attribution: layer.attribution });
    });

    const overlayMaps = {};
    const initialLayers = [baseMaps[view.baseLayers[0].name]];
    if (view.overlay) {
      const markers = view.overlay.markers.map(function (marker) {
        return L.circleMarker([marker.lat, marker.lon], marker.options).bindPopup(marker.popup);
      });
      const group = L.layerGroup(markers);
      overlayMaps[view.overlay.name] = group;
      initialLayers.push(group);
    }

    const map = L.map(view.container, {
      center: view.center,
      zoom: view.zoom,
      layers: initialLayers
    });

    L.control.layers(baseMaps, overlayMaps, { collapsed: false }).addTo(map);

    const legend = L.control({ position: "bottomright" });
    legend.onAdd = function () {
      const div = L.DomUtil.create("div", "info legend");
      div.innerHTML = view.legend;
      return div;
    };
    legend.addTo(map);

    if (view.error) {
      const notice = L.control({ position: "topright" });
      notice.onAdd = function () {
        const div = L.DomUtil.create("div", "info notice");
        div.textContent = view.error;
        return div;
      };
      notice.addTo(map);
    }
  </script>
</body>
</html>
"#;

/// Renders the populated map page.
pub fn render_page(view: &MapView) -> FeedResult<String> {
    render(view, None)
}

/// Renders the base map with an on-page message instead of markers.
pub fn render_failure_page(view: &MapView, error: &FeedError) -> FeedResult<String> {
    render(view, Some(format!("Unable to load earthquake data: {}", error)))
}

/// Legend markup: one swatch and label per band, separated by `<br>`.
pub fn legend_html(view: &MapView) -> String {
    view.legend
        .iter()
        .map(|band| {
            format!(
                "<i style=\"background:{}\"></i> {}",
                band.color.to_hex(),
                escape_html(&band.label())
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn render(view: &MapView, error: Option<String>) -> FeedResult<String> {
    view.settings.validate()?;

    let payload = script_payload(view, error.as_deref());
    let embedded = serde_json::to_string(&payload)
        .map_err(|err| FeedError::Render(err.to_string()))?
        .replace("</", "<\\/");

    let notice = error
        .as_deref()
        .map(|message| format!("<noscript>{}</noscript>", escape_html(message)))
        .unwrap_or_default();

    Ok(fill_template(
        PAGE_TEMPLATE,
        &[
            ("__TITLE__", "Earthquakes"),
            ("__LEAFLET_CSS__", LEAFLET_CSS),
            ("__LEAFLET_JS__", LEAFLET_JS),
            ("__CONTAINER__", &view.settings.container_id),
            ("__NOTICE__", &notice),
            ("__VIEW__", &embedded),
        ],
    ))
}

/// Substitutes every slot in one left-to-right scan of `template`.
/// Inserted values are never rescanned, so text from the feed or an error
/// message that happens to contain a placeholder stays literal.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((at, key, value)) = slots
        .iter()
        .filter_map(|&(key, value)| rest.find(key).map(|at| (at, key, value)))
        .min_by_key(|&(at, _, _)| at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}

fn script_payload(view: &MapView, error: Option<&str>) -> Value {
    let base_layers: Vec<Value> = view
        .base_layers
        .iter()
        .map(|layer| {
            json!({
                "name": layer.name,
                "url": layer.url_template,
                "attribution": layer.attribution,
            })
        })
        .collect();

    let overlay = view.overlay.as_ref().map(|overlay| {
        let markers: Vec<Value> = overlay
            .markers
            .iter()
            .map(|marker| {
                json!({
                    "lat": marker.lat,
                    "lon": marker.lon,
                    "popup": marker.popup,
                    "options": {
                        "radius": marker.style.radius,
                        "fillColor": marker.style.fill_color.to_hex(),
                        "color": marker.style.color.to_hex(),
                        "weight": marker.style.weight,
                        "opacity": marker.style.opacity,
                        "fillOpacity": marker.style.fill_opacity,
                    },
                })
            })
            .collect();
        json!({ "name": overlay.name, "markers": markers })
    });

    json!({
        "container": view.settings.container_id,
        "center": [view.settings.center.lat, view.settings.center.lon],
        "zoom": view.settings.zoom,
        "baseLayers": base_layers,
        "overlay": overlay,
        "legend": legend_html(view),
        "error": error,
    })
}
