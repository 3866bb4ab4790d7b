use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use quakecore::classify::Rgb;
use quakecore::render::{screen_pixel, CircleMarker, LatLng, MapView};
use std::time::Duration;

const BRIDGE_ENV: &str = "QUAKEVIEW_BRIDGE";
const DEFAULT_BRIDGE: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Viewer::boot, Viewer::update, Viewer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Viewer) -> String {
    "Earthquake Viewer".into()
}

fn application_subscription(_: &Viewer) -> Subscription<Message> {
    time::every(Duration::from_secs(5)).map(|_| Message::Tick)
}

fn application_theme(_: &Viewer) -> Theme {
    Theme::Light
}

#[derive(Debug)]
struct Viewer {
    view: Option<MapView>,
    base_layer: usize,
    overlay_visible: bool,
    status: String,
    history: Vec<String>,
    map_url: String,
}

/// `/map` endpoint of the bridge at `base`, e.g. `http://127.0.0.1:9100`
/// or a bare `host:port` as passed to `quakemap --bind`.
fn bridge_map_url(base: Option<String>) -> String {
    let base = base
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BRIDGE.to_string());
    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{base}/map")
    } else {
        format!("http://{base}/map")
    }
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    MapFetched(Result<MapView, String>),
    BaseLayerSelected(usize),
    ToggleOverlay,
}

impl Viewer {
    fn boot() -> (Self, Task<Message>) {
        let map_url = bridge_map_url(std::env::var(BRIDGE_ENV).ok());
        (
            Viewer {
                view: None,
                base_layer: 0,
                overlay_visible: true,
                status: format!("Waiting for the map bridge at {map_url}..."),
                history: Vec::new(),
                map_url: map_url.clone(),
            },
            Task::perform(fetch_map(map_url), Message::MapFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_map(state.map_url.clone()), Message::MapFetched),
            Message::MapFetched(Ok(view)) => {
                let count = view.markers().len();
                let changed = state
                    .view
                    .as_ref()
                    .map(|current| current.markers().len() != count)
                    .unwrap_or(true);
                state.view = Some(view);
                state.status = format!("{} earthquakes loaded", count);
                if changed {
                    state.push_history(format!("Map received: {} markers", count));
                }
                Task::none()
            }
            Message::MapFetched(Err(err)) => {
                state.status = format!("Map unavailable: {err}");
                Task::none()
            }
            Message::BaseLayerSelected(index) => {
                state.base_layer = index;
                Task::none()
            }
            Message::ToggleOverlay => {
                state.overlay_visible = !state.overlay_visible;
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(map) = state.view.as_ref() else {
            return Container::new(text(&state.status).size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let base_buttons = map.base_layers.iter().enumerate().fold(
            Row::new().spacing(8),
            |row, (index, layer)| {
                let label = if index == state.base_layer {
                    format!("[{}]", layer.name)
                } else {
                    layer.name.clone()
                };
                row.push(
                    button(text(label))
                        .on_press(Message::BaseLayerSelected(index))
                        .padding(6),
                )
            },
        );

        let overlay_label = match (&map.overlay, state.overlay_visible) {
            (Some(overlay), true) => format!("Hide {}", overlay.name),
            (Some(overlay), false) => format!("Show {}", overlay.name),
            (None, _) => "No overlay".to_string(),
        };
        let overlay_button = button(text(overlay_label))
            .on_press(Message::ToggleOverlay)
            .padding(6);

        let canvas = Canvas::new(MapCanvas {
            view: map.clone(),
            base_layer: state.base_layer,
            overlay_visible: state.overlay_visible,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let legend = map.legend.iter().fold(
            Column::new().spacing(4).push(text("Depth (km)").size(16)),
            |col, band| {
                col.push(
                    text(format!("\u{25a0} {}", band.label()))
                        .size(14)
                        .color(to_color(band.color, 1.0)),
                )
            },
        );

        let mut strongest: Vec<&CircleMarker> = map.markers().iter().collect();
        strongest.sort_by(|a, b| b.record.magnitude.total_cmp(&a.record.magnitude));
        let events = if strongest.is_empty() {
            Column::new().push(text("No earthquakes to list").size(12))
        } else {
            strongest
                .iter()
                .take(12)
                .fold(Column::new().spacing(6), |col, marker| {
                    col.push(
                        column![
                            text(marker.record.place.clone()).size(13),
                            text(format!(
                                "Magnitude: {} | Depth: {} km | ({},{})",
                                marker.record.magnitude,
                                marker.record.depth_km,
                                marker.record.longitude,
                                marker.record.latitude
                            ))
                            .size(11),
                            text(marker.record.human_time()).size(11),
                        ]
                        .spacing(2),
                    )
                })
        };

        let history_list = state
            .history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.clone()).size(12))
            });

        let side_panel = column![
            text("Layers").size(22),
            base_buttons,
            overlay_button,
            legend,
            text("Strongest events").size(18),
            Container::new(scrollable(events).height(Length::Fixed(320.0))).padding(6),
            text(&state.status).size(12),
            Container::new(scrollable(history_list).height(Length::Fixed(80.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0));

        let layout = row![canvas, side_panel]
            .spacing(12)
            .align_y(Alignment::Start)
            .padding(12);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_map(url: String) -> Result<MapView, String> {
    let response = reqwest::get(&url)
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        return Err(format!("{}: {}", status, message));
    }
    response.json::<MapView>().await.map_err(|e| e.to_string())
}

fn to_color(rgb: Rgb, alpha: f32) -> Color {
    Color {
        a: alpha,
        ..Color::from_rgb8(rgb.r, rgb.g, rgb.b)
    }
}

/// Background palette and graticule spacing standing in for each tile layer.
struct BaseStyle {
    background: Color,
    graticule: Color,
    step_deg: f64,
}

fn base_style(index: usize) -> BaseStyle {
    match index {
        0 => BaseStyle {
            background: Color::from_rgb(0.93, 0.93, 0.91),
            graticule: Color::from_rgb(0.78, 0.80, 0.84),
            step_deg: 10.0,
        },
        _ => BaseStyle {
            background: Color::from_rgb(0.91, 0.88, 0.78),
            graticule: Color::from_rgb(0.66, 0.56, 0.40),
            step_deg: 5.0,
        },
    }
}

#[derive(Clone)]
struct MapCanvas {
    view: MapView,
    base_layer: usize,
    overlay_visible: bool,
}

impl MapCanvas {
    fn to_screen(&self, lat: f64, lon: f64, bounds: &Rectangle) -> Point {
        let (x, y) = screen_pixel(
            LatLng { lat, lon },
            self.view.settings.center,
            self.view.settings.zoom,
            bounds.width as f64,
            bounds.height as f64,
        );
        Point::new(x as f32, y as f32)
    }
}

impl canvas::Program<Message> for MapCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let style = base_style(self.base_layer);
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), style.background);

        let graticule = Path::new(|builder| {
            let mut lon = -180.0;
            while lon <= 180.0 {
                builder.move_to(self.to_screen(-85.0, lon, &bounds));
                builder.line_to(self.to_screen(85.0, lon, &bounds));
                lon += style.step_deg;
            }
            let mut lat = -80.0;
            while lat <= 80.0 {
                builder.move_to(self.to_screen(lat, -180.0, &bounds));
                builder.line_to(self.to_screen(lat, 180.0, &bounds));
                lat += style.step_deg;
            }
        });
        frame.stroke(
            &graticule,
            Stroke::default()
                .with_width(1.0)
                .with_color(style.graticule),
        );

        if self.overlay_visible {
            for marker in self.view.markers() {
                let radius = marker.style.radius.max(0.0) as f32;
                if radius == 0.0 {
                    continue;
                }
                let center = self.to_screen(marker.lat, marker.lon, &bounds);
                let circle = Path::new(|builder| builder.circle(center, radius));
                frame.fill(
                    &circle,
                    to_color(marker.style.fill_color, marker.style.fill_opacity as f32),
                );
                frame.stroke(
                    &circle,
                    Stroke::default()
                        .with_width(marker.style.weight as f32)
                        .with_color(to_color(marker.style.color, marker.style.opacity as f32)),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
