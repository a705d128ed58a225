use chrono::Local;
use eink_weather_core::{IconSet, UiState, WeatherView};

/// Plain-text screen for the current state. No colour or cursor tricks, so
/// slow panels only redraw when the text changes.
pub fn render(state: &UiState, icon_set: IconSet) -> String {
    match state {
        UiState::Loading => "Loading...".to_string(),
        UiState::Error(message) => format!("Error: {message}"),
        UiState::Success(snapshot) => {
            let view = WeatherView::new(snapshot, icon_set);
            let updated = snapshot.fetched_at.with_timezone(&Local).format("%H:%M");

            let mut lines = vec![
                format!("[{}]", view.icon_path),
                view.temperature,
            ];
            if !view.description.is_empty() {
                lines.push(view.description);
            }
            lines.push(String::new());
            lines.push(view.humidity);
            lines.push(view.wind);
            lines.push(view.location);
            lines.push(format!("Updated {updated}"));
            lines.join("\n")
        }
    }
}
