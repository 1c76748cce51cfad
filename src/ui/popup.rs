use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// An HTML popup anchored to a map position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub position: LatLng,
    pub html: String,
}

impl Popup {
    pub fn new(position: LatLng, html: impl Into<String>) -> Self {
        Self {
            position,
            html: html.into(),
        }
    }

    /// Appends a `label: value` line, separated from the previous one by `<br>`.
    pub fn line(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        if !self.html.is_empty() {
            self.html.push_str("<br>");
        }
        self.html.push_str(&format!("{}: {}", label, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_joined_with_breaks() {
        let popup = Popup::new(LatLng::new(1.0, 2.0), "")
            .line("magnitude", 4.5)
            .line("Was there a tsunami?", "no");
        assert_eq!(popup.html, "magnitude: 4.5<br>Was there a tsunami?: no");
    }
}
