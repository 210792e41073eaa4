//! Display surface abstraction and the HTML page implementation
//!
//! The controller only talks to a [`ViewPort`]; every region is replaced
//! wholesale on each update.

pub mod markup;
pub mod render;

use maud::{DOCTYPE, PreEscaped, html};
use serde::Serialize;

pub use markup::Fragment;
pub use render::{render_stats, render_temp};

/// Asks the browser for its position on a blank index page and reports it
/// to `/locate`.
const LOCATE_SCRIPT: &str = include_str!("locate.js");

/// Addressable areas of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Stats panel (clouds, humidity, wind...)
    Stats,
    /// Current-conditions panel (temperature, sky, sunrise/sunset)
    Conditions,
    /// Place label
    Place,
    /// Timestamp label
    Timestamp,
    /// Status line for failures
    Notice,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Stats,
        Region::Conditions,
        Region::Place,
        Region::Timestamp,
        Region::Notice,
    ];

    /// Whether the region holds plain text rather than markup
    #[must_use]
    pub fn is_label(self) -> bool {
        matches!(self, Self::Place | Self::Timestamp | Self::Notice)
    }
}

/// What the page controller needs from a display technology.
///
/// Submission events are owned by the surface: it forwards them by calling
/// the controller's search entry points.
pub trait ViewPort: Send {
    /// Replace the text of a label region
    fn set_text(&mut self, region: Region, text: &str);

    /// Replace the markup of a panel region
    fn set_markup(&mut self, region: Region, fragment: Fragment);

    /// Read the search field and clear it in one step
    fn take_search_input(&mut self) -> String;

    fn clear(&mut self, region: Region) {
        if region.is_label() {
            self.set_text(region, "");
        } else {
            self.set_markup(region, Fragment::empty());
        }
    }
}

/// In-memory page whose regions serialize to a full HTML document
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    stats: Fragment,
    conditions: Fragment,
    place: String,
    timestamp: String,
    notice: String,
    search_input: String,
}

impl HtmlPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type into the search field
    pub fn set_search_input(&mut self, value: impl Into<String>) {
        self.search_input = value.into();
    }

    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    #[must_use]
    pub fn label(&self, region: Region) -> &str {
        match region {
            Region::Place => &self.place,
            Region::Timestamp => &self.timestamp,
            Region::Notice => &self.notice,
            Region::Stats | Region::Conditions => "",
        }
    }

    fn panel(&self, region: Region) -> Option<&Fragment> {
        match region {
            Region::Stats => Some(&self.stats),
            Region::Conditions => Some(&self.conditions),
            _ => None,
        }
    }

    /// Inner HTML of a region
    #[must_use]
    pub fn region_html(&self, region: Region) -> String {
        match self.panel(region) {
            Some(fragment) => fragment.to_html(),
            None => html! { (self.label(region)) }.into_string(),
        }
    }

    /// Visible text of a region, one entry per text node
    #[must_use]
    pub fn region_text(&self, region: Region) -> Vec<String> {
        match self.panel(region) {
            Some(fragment) => fragment.text_content(),
            None if self.label(region).is_empty() => Vec::new(),
            None => vec![self.label(region).to_string()],
        }
    }

    /// The whole page as an HTML document
    #[must_use]
    pub fn document(&self) -> String {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { "Weather" }
                }
                body {
                    form.form method="post" action="/search" {
                        input.search-input type="text" name="city" placeholder="Search city"
                            value=(self.search_input);
                        button type="submit" { "Search" }
                    }
                    p.notice { (self.notice) }
                    h2.location { (self.place) }
                    p.time { (self.timestamp) }
                    section.temp-status { (self.conditions) }
                    section.stats { (self.stats) }
                    script { (PreEscaped(LOCATE_SCRIPT)) }
                }
            }
        }
        .into_string()
    }
}

impl ViewPort for HtmlPage {
    fn set_text(&mut self, region: Region, text: &str) {
        match region {
            Region::Place => self.place = text.to_string(),
            Region::Timestamp => self.timestamp = text.to_string(),
            Region::Notice => self.notice = text.to_string(),
            Region::Stats | Region::Conditions => {
                self.set_markup(region, Fragment::text(text));
            }
        }
    }

    fn set_markup(&mut self, region: Region, fragment: Fragment) {
        match region {
            Region::Stats => self.stats = fragment,
            Region::Conditions => self.conditions = fragment,
            Region::Place | Region::Timestamp | Region::Notice => {
                self.set_text(region, &fragment.text_content().join(" "));
            }
        }
    }

    fn take_search_input(&mut self) -> String {
        std::mem::take(&mut self.search_input)
    }
}
