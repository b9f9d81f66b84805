//! Device status record and the status page parser
//!
//! The unit does not publish any API for its readings, only an HTML page.
//! Values are located by position: the nth element carrying a layout class.
//! Any mismatch is reported as a [`ParseError`].

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::errors::ParseError;

/// Placeholder shown by the unit instead of an unavailable reading
const SENTINEL: &str = "-";

/// Snapshot of a device's readings and settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Hostname used to reach the device
    pub device: String,

    /// Name configured on the device
    pub name: String,

    /// Temperature inside in °C
    pub temperature_in: Option<i32>,

    /// Relative humidity inside in %
    pub humidity_in: Option<i32>,

    /// Temperature outside in °C
    pub temperature_out: Option<i32>,

    /// Operating mode label as displayed
    pub mode: String,

    /// CO2 concentration in ppm
    pub co2_ppm: Option<i32>,

    /// Filter used in %
    pub filter: u8,

    /// Fan speed in %
    pub fan: u8,

    /// Light intensity, 0-5
    pub light: u8,

    /// Fault lines reported by the device
    pub warnings: Vec<String>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status(device={:?}, name={:?}, temperature_in={}, humidity_in={}, \
             temperature_out={}, mode={:?}, co2_ppm={}, filter={}, fan={}, light={}, warnings={:?})",
            self.device,
            self.name,
            OptionalValue(self.temperature_in),
            OptionalValue(self.humidity_in),
            OptionalValue(self.temperature_out),
            self.mode,
            OptionalValue(self.co2_ppm),
            self.filter,
            self.fan,
            self.light,
            self.warnings,
        )
    }
}

struct OptionalValue(Option<i32>);

impl fmt::Display for OptionalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("None"),
        }
    }
}

/// Parse the status page of `device`
pub fn parse_status(device: &str, html: &str) -> Result<Status, ParseError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let container = first(root, ".container")?;
    let columns: Vec<ElementRef> = container.select(&selector(".col-12")?).collect();

    // "17 °C/56 %5 °C"
    let climate = text(first(nth(&columns, 1, ".col-12")?, ".bigText")?);
    let (inside, outside) = climate.trim().split_once('%').unwrap_or((climate.trim(), ""));
    let (temperature_in, humidity_in) = inside.trim().split_once('/').unwrap_or((inside.trim(), ""));

    let mode = text(first(nth(&columns, 3, ".col-12")?, "span")?);
    let co2 = text(first(nth(&columns, 4, ".col-12")?, "b")?);

    let gauges: Vec<ElementRef> = container.select(&selector(".filterBox")?).collect();
    let filter = gauge_used("filter", nth(&gauges, 1, ".filterBox")?)?;
    let fan = gauge_used("fan", nth(&gauges, 2, ".filterBox")?)?;

    let light_element = first(container, "#myRange")?;
    let light_raw = light_element
        .value()
        .attr("value")
        .ok_or_else(|| ParseError::MissingAttribute {
            element: "#myRange".to_string(),
            attribute: "value".to_string(),
        })?;
    let light = number("light", light_raw.trim())?;
    if !(0..=5).contains(&light) {
        return Err(ParseError::OutOfRange { field: "light", value: light });
    }

    Ok(Status {
        device: device.to_string(),
        name: text(first(root, ".deviceName")?).trim().to_string(),
        temperature_in: optional_number("temperature_in", temperature_in)?,
        humidity_in: optional_number("humidity_in", humidity_in)?,
        temperature_out: optional_number("temperature_out", outside)?,
        mode: mode.trim().to_string(),
        co2_ppm: optional_number("co2_ppm", &co2)?,
        filter,
        fan,
        light: light as u8,
        warnings: warnings(root)?,
    })
}

/// Warning lines from the modal, skipping its header
fn warnings(root: ElementRef) -> Result<Vec<String>, ParseError> {
    let Some(modal) = root.select(&selector(".modal-content")?).next() else {
        return Ok(Vec::new());
    };

    let lines = modal
        .children()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .map(|child| {
            child
                .children()
                .filter_map(|node| node.value().as_text())
                .map(|text| &**text)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    Ok(lines)
}

/// Used percentage of a gauge whose style carries the remaining percentage
fn gauge_used(field: &'static str, gauge: ElementRef) -> Result<u8, ParseError> {
    let bar = first(gauge, "div")?;
    let style = bar
        .value()
        .attr("style")
        .ok_or_else(|| ParseError::MissingAttribute {
            element: format!("{} gauge", field),
            attribute: "style".to_string(),
        })?;

    // "width:98%"
    let remaining = style
        .split_once(':')
        .map(|(_, value)| value)
        .unwrap_or("")
        .split('%')
        .next()
        .unwrap_or("");
    let remaining = number(field, strip_unit(remaining))?;
    if !(0..=100).contains(&remaining) {
        return Err(ParseError::OutOfRange { field, value: remaining });
    }

    Ok((100 - remaining) as u8)
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::InvalidSelector(css.to_string()))
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ParseError> {
    scope
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| ParseError::MissingElement(css.to_string()))
}

fn nth<'a>(elements: &[ElementRef<'a>], index: usize, css: &str) -> Result<ElementRef<'a>, ParseError> {
    elements
        .get(index)
        .copied()
        .ok_or_else(|| ParseError::MissingElement(format!("{}[{}]", css, index)))
}

fn text(element: ElementRef) -> String {
    element.text().collect()
}

/// Quantity without its unit, "17 °C" -> "17"
fn strip_unit(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

fn number(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn optional_number(field: &'static str, raw: &str) -> Result<Option<i32>, ParseError> {
    let value = strip_unit(raw);
    if value == SENTINEL {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
