//! Location message.

use std::fmt;

use crate::error::{ProtocolError, Result};

const CONTEXT: &str = "location message";

/// A geographic position with optional accuracy, name and address.
///
/// A name is only carried together with an address.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
    name: Option<String>,
    address: Option<String>,
}

impl Location {
    /// Create a location from coordinates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if either coordinate is NaN or infinite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: finite("latitude", latitude)?,
            longitude: finite("longitude", longitude)?,
            accuracy: None,
            name: None,
            address: None,
        })
    }

    /// Attach an accuracy in meters.
    pub fn with_accuracy(mut self, accuracy: f64) -> Result<Self> {
        self.accuracy = Some(finite("accuracy", accuracy)?);
        Ok(self)
    }

    /// Attach an address without a name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the address contains a line break.
    pub fn with_address(mut self, address: impl Into<String>) -> Result<Self> {
        self.address = Some(single_line("address", address.into())?);
        self.name = None;
        Ok(self)
    }

    /// Attach a place name and its address.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if either value contains a line break.
    pub fn with_name_and_address(
        mut self,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self> {
        self.name = Some(single_line("name", name.into())?);
        self.address = Some(single_line("address", address.into())?);
        Ok(self)
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Accuracy in meters, if known.
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    /// Place name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Postal address.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        let mut text = format!("{},{}", self.latitude, self.longitude);
        if let Some(accuracy) = self.accuracy {
            text.push_str(&format!(",{}", accuracy));
        }
        if let Some(name) = &self.name {
            text.push('\n');
            text.push_str(name);
        }
        if let Some(address) = &self.address {
            text.push('\n');
            text.push_str(address);
        }
        out.extend_from_slice(text.as_bytes());
    }

    pub(crate) fn decode(body: &[u8]) -> Result<Self> {
        let text =
            std::str::from_utf8(body).map_err(|e| ProtocolError::format(CONTEXT, e.to_string()))?;
        let mut lines = text.split('\n');
        // split always yields at least one item
        let coordinates = lines.next().unwrap_or_default();
        let extra: Vec<&str> = lines.collect();

        let parts: Vec<&str> = coordinates.split(',').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(ProtocolError::format(
                CONTEXT,
                format!("expected 2 or 3 coordinates, got {}", parts.len()),
            ));
        }
        let mut location = Self {
            latitude: parse_number(parts[0])?,
            longitude: parse_number(parts[1])?,
            accuracy: parts.get(2).map(|a| parse_number(a)).transpose()?,
            name: None,
            address: None,
        };

        match extra.as_slice() {
            [] => {}
            [address] => location.address = Some((*address).to_owned()),
            [name, address] => {
                location.name = Some((*name).to_owned());
                location.address = Some((*address).to_owned());
            }
            _ => {
                return Err(ProtocolError::format(
                    CONTEXT,
                    format!("too many lines: {}", extra.len() + 1),
                ))
            }
        }
        Ok(location)
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProtocolError::InvalidField {
            field,
            reason: format!("{} is not a finite number", value),
        })
    }
}

// Lines are the record separator of the encoding.
fn single_line(field: &'static str, value: String) -> Result<String> {
    if value.contains('\n') {
        return Err(ProtocolError::InvalidField {
            field,
            reason: "contains a line break".into(),
        });
    }
    Ok(value)
}

fn parse_number(value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ProtocolError::format(
            CONTEXT,
            format!("invalid number {:?}", value),
        )),
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location[{} {}", self.latitude, self.longitude)?;
        if let Some(name) = &self.name {
            write!(f, ", {}", name)?;
        }
        if let Some(address) = &self.address {
            write!(f, ", {}", address)?;
        }
        f.write_str("]")
    }
}
