//! Snapshot to markup for the two weather panels

use crate::format::{Formatter, MeasureUnit, UnitDisplay};
use crate::models::WeatherSnapshot;

use maud::html;

use super::markup::Fragment;
use super::{Region, ViewPort};

/// Replace the stats panel with the snapshot's cards
pub fn render_stats<V: ViewPort + ?Sized>(view: &mut V, snapshot: &WeatherSnapshot, fmt: &Formatter) {
    view.set_markup(Region::Stats, stats_fragment(snapshot, fmt));
}

/// Replace the current-conditions panel
pub fn render_temp<V: ViewPort + ?Sized>(view: &mut V, snapshot: &WeatherSnapshot, fmt: &Formatter) {
    view.set_markup(Region::Conditions, temp_fragment(snapshot, fmt));
}

/// One labelled value in the stats panel
struct StatCard {
    class: &'static str,
    title: &'static str,
    value_class: &'static str,
    value: String,
}

#[must_use]
pub fn stats_fragment(snapshot: &WeatherSnapshot, fmt: &Formatter) -> Fragment {
    let temperature = MeasureUnit::temperature(snapshot.units);
    let speed = MeasureUnit::speed(snapshot.units);

    let cards = [
        StatCard {
            class: "clouds",
            title: "Clouds",
            value_class: "clouds-val",
            value: fmt.format_unit(snapshot.clouds, MeasureUnit::Percent, None),
        },
        StatCard {
            class: "dewPoint",
            title: "Dew Point",
            value_class: "dew-point-val",
            value: fmt.format_unit(snapshot.dew_point, temperature, None),
        },
        StatCard {
            class: "feelsLike",
            title: "Feels Like",
            value_class: "feels-like-val",
            value: fmt.format_unit(snapshot.feels_like, temperature, None),
        },
        StatCard {
            class: "humidity",
            title: "Humidity",
            value_class: "humidity-val",
            value: fmt.format_unit(snapshot.humidity, MeasureUnit::Percent, None),
        },
        StatCard {
            class: "pressure",
            title: "Pressure",
            value_class: "pressure-val",
            value: format!("{} hPa", fmt.format_number(snapshot.pressure)),
        },
        StatCard {
            class: "uvi",
            title: "UVI",
            value_class: "uvi-val",
            value: fmt.format_number(snapshot.uvi),
        },
        StatCard {
            class: "wind-deg",
            title: "Wind Deg",
            value_class: "wind-deg-val",
            value: fmt.format_unit(snapshot.wind_deg, MeasureUnit::Degree, Some(UnitDisplay::Narrow)),
        },
        StatCard {
            class: "wind-speed",
            title: "Wind Speed",
            value_class: "wind-speed-val",
            value: fmt.format_unit(snapshot.wind_speed, speed, None),
        },
    ];

    let markup = html! {
        @for card in &cards {
            div class=(format!("card {}", card.class)) {
                h4 { (card.title) }
                div class=(format!("val {}", card.value_class)) { (card.value) }
            }
        }
    };
    let text = cards
        .iter()
        .flat_map(|card| [card.title.to_string(), card.value.clone()]);

    Fragment::new(markup, text)
}

/// Sunrise or sunset, shown in the location's zone
struct SunEvent {
    class: &'static str,
    icon: &'static str,
    title: &'static str,
    value: String,
}

#[must_use]
pub fn temp_fragment(snapshot: &WeatherSnapshot, fmt: &Formatter) -> Fragment {
    let tz = snapshot.tz();
    let local_time = |instant: Option<chrono::DateTime<chrono::Utc>>| {
        instant
            .map(|t| fmt.format_time(&t.with_timezone(&tz)))
            .unwrap_or_default()
    };

    let temp = fmt.format_unit(snapshot.temp, MeasureUnit::temperature(snapshot.units), None);
    let conditions = &snapshot.weather;
    let events = [
        SunEvent {
            class: "sunrise",
            icon: "sunny",
            title: "Sunrise",
            value: local_time(snapshot.sunrise_time()),
        },
        SunEvent {
            class: "sunset",
            icon: "partly-sunny",
            title: "Sunset",
            value: local_time(snapshot.sunset_time()),
        },
    ];

    let markup = html! {
        div.temp {
            img src=(conditions.icon_url()) alt=(conditions.description);
            div.temp-val { (temp) }
            div.desc { (conditions.description) }
            div.status { (conditions.main) }
        }
        div.sunrise-sunset {
            @for event in &events {
                div class=(event.class) {
                    ion-icon class=(format!("{}-icon", event.class)) name=(event.icon) {}
                    h4 { (event.title) }
                    div class=(format!("{}-val", event.class)) { (event.value) }
                }
            }
        }
    };

    let mut text = vec![
        temp,
        conditions.description.clone(),
        conditions.main.clone(),
    ];
    for event in events {
        text.push(event.title.to_string());
        text.push(event.value);
    }

    Fragment::new(markup, text)
}
