use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{0}', expected #RRGGBB")]
pub struct InvalidColor(String);

/// A `#RRGGBB` color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    fn hex(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let valid = value
            .strip_prefix('#')
            .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()));

        if valid {
            Ok(Self(value))
        } else {
            Err(InvalidColor(value))
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Colors handed to the renderer together with the report data
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    pub graph: GraphTheme,
    pub page: PageTheme,
}

/// Chart colors
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphTheme {
    /// Vertical lines separating weeks
    pub weekline: Color,
    pub min: Color,
    pub max: Color,
    pub score_curve: Color,
    pub score_data: Color,
    pub average_curve: Color,
    pub average_data: Color,
    pub x_ticks: Color,
    pub x_tick_labels: Color,
    pub y_ticks: Color,
    pub y_tick_labels: Color,
    pub border_left: Color,
    pub border_bottom: Color,
}

impl Default for GraphTheme {
    fn default() -> Self {
        Self {
            weekline: Color::hex("#7f7f7f"),
            min: Color::hex("#47DDFF"),
            max: Color::hex("#47DDFF"),
            score_curve: Color::hex("#47DDFF"),
            score_data: Color::hex("#4781ff"),
            average_curve: Color::hex("#EC368D"),
            average_data: Color::hex("#F2FF49"),
            x_ticks: Color::hex("#47DDFF"),
            x_tick_labels: Color::hex("#F1F1F9"),
            y_ticks: Color::hex("#47DDFF"),
            y_tick_labels: Color::hex("#F1F1F9"),
            border_left: Color::hex("#47DDFF"),
            border_bottom: Color::hex("#47DDFF"),
        }
    }
}

/// Colors of the page the charts are embedded in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageTheme {
    pub background: Color,
    pub text: Color,
    pub titles: Color,
    pub main: Color,
    pub secondary: Color,
}

impl Default for PageTheme {
    fn default() -> Self {
        Self {
            background: Color::hex("#342E5C"),
            text: Color::hex("#F1F1F9"),
            titles: Color::hex("#F2FF49"),
            main: Color::hex("#47DDFF"),
            secondary: Color::hex("#EC368D"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_validation() {
        assert!(Color::try_from("#47DDFF".to_string()).is_ok());
        assert!(Color::try_from("#4781ff".to_string()).is_ok());
        assert_eq!(
            Color::try_from("47DDFF".to_string()),
            Err(InvalidColor("47DDFF".to_string()))
        );
        assert!(Color::try_from("#47DDF".to_string()).is_err());
        assert!(Color::try_from("#47DDFG".to_string()).is_err());
    }

    #[test]
    fn test_partial_theme() {
        let theme: Theme = toml::from_str("[graph]\nweekline = \"#000000\"\n").unwrap();
        assert_eq!(theme.graph.weekline.as_str(), "#000000");
        assert_eq!(theme.graph.score_data, GraphTheme::default().score_data);
        assert_eq!(theme.page, PageTheme::default());

        assert!(toml::from_str::<Theme>("[page]\ntext = \"white\"\n").is_err());
    }
}
