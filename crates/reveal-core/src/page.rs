//! Page descriptions
//!
//! A page is a list of sections in TOML:
//!
//! ```toml
//! [[sections]]
//! title = "Hello"
//! body = ["first line", "second line"]
//! class = "card hero"
//! immediate = true
//!
//! [[sections]]
//! title = "Later"
//! body = ["slides in from the left"]
//! delay = 0.2
//! from = { x = -40, opacity = 0 }
//! ```
//!
//! Any prop a section leaves out comes from the `[reveal]` config table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RevealConfig;
use crate::error::{Error, Result};
use crate::motion::VisualProps;
use crate::section::SectionProps;

/// Children of a section: a title line and body lines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionContent {
    pub title: String,
    #[serde(default)]
    pub body: Vec<String>,
}

impl SectionContent {
    pub fn new(title: impl Into<String>, body: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            body: body.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<VisualProps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate: Option<bool>,
}

impl SectionSpec {
    pub fn content(&self) -> SectionContent {
        SectionContent {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }

    /// Props for this section with gaps filled from `defaults`
    pub fn props(&self, defaults: &RevealConfig) -> SectionProps {
        let base = SectionProps::from_config(defaults);
        SectionProps {
            delay: self.delay.unwrap_or(base.delay),
            class_name: self.class_name.clone().unwrap_or(base.class_name),
            trigger_position: self
                .trigger_position
                .clone()
                .unwrap_or(base.trigger_position),
            duration: self.duration.unwrap_or(base.duration),
            from: self.from.unwrap_or(base.from),
            immediate: self.immediate.unwrap_or(base.immediate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl PageSpec {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Page(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let page: PageSpec = toml::from_str(content).map_err(|e| Error::Page(e.to_string()))?;
        if page.sections.is_empty() {
            return Err(Error::Page("page has no sections".to_string()));
        }
        Ok(page)
    }

    /// Built-in page used when nothing else is configured
    pub fn demo() -> Self {
        let section = |title: &str, body: &[&str]| SectionSpec {
            title: title.to_string(),
            body: body.iter().map(|line| line.to_string()).collect(),
            class_name: Some("card".to_string()),
            ..Default::default()
        };

        let mut hero = section(
            "Reveal",
            &[
                "Sections fade and slide into place as they scroll into view.",
                "This one is immediate: it animates as soon as the page mounts.",
                "",
                "j/k scroll   r replay   i toggle immediate   q quit",
            ],
        );
        hero.class_name = Some("card hero".to_string());
        hero.immediate = Some(true);

        let mut sections = vec![hero];
        sections.push(section(
            "Scroll triggered",
            &[
                "Waits until its top edge reaches 80% of the viewport height.",
                "It fires once; scrolling back up does not hide it again.",
            ],
        ));

        let mut delayed = section(
            "Delayed",
            &["Same trigger, but holds still for 0.4s before moving."],
        );
        delayed.delay = Some(0.4);
        sections.push(delayed);

        let mut sideways = section(
            "From the left",
            &[
                "A custom `from` record: x = -40, opacity = 0.",
                "The target only sets y and opacity, so x holds at -40.",
            ],
        );
        sideways.from = Some(VisualProps::new().with_x(-40.0).with_opacity(0.0));
        sideways.class_name = Some("card accent".to_string());
        sections.push(sideways);

        let mut late = section(
            "Late trigger",
            &["Starts only once its center crosses the middle of the screen."],
        );
        late.trigger_position = Some("center 50%".to_string());
        sections.push(late);

        let mut slow = section(
            "Slow",
            &["Takes two seconds to settle.", "", "That's the whole page."],
        );
        slow.duration = Some(2.0);
        slow.class_name = Some("card muted".to_string());
        sections.push(slow);

        Self { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_overrides() {
        let page = PageSpec::from_toml(
            r#"
            [[sections]]
            title = "One"
            body = ["a", "b"]
            class = "card"
            immediate = true

            [[sections]]
            title = "Two"
            delay = 0.25
            from = { y = 60 }
            "#,
        )
        .unwrap();

        assert_eq!(page.sections.len(), 2);
        let defaults = RevealConfig::default();

        let one = page.sections[0].props(&defaults);
        assert!(one.immediate);
        assert_eq!(one.class_name, "card");
        assert_eq!(one.duration, 0.8);

        let two = page.sections[1].props(&defaults);
        assert!(two.class_name.is_empty());
        assert_eq!(two.delay, 0.25);
        assert_eq!(two.from, VisualProps::new().with_y(60.0));
        assert!(page.sections[1].content().body.is_empty());
    }

    #[test]
    fn test_defaults_come_from_config() {
        let spec = SectionSpec {
            title: "x".to_string(),
            ..Default::default()
        };
        let defaults = RevealConfig {
            duration: 1.5,
            immediate: true,
            ..Default::default()
        };
        let props = spec.props(&defaults);
        assert_eq!(props.duration, 1.5);
        assert!(props.immediate);
        assert_eq!(props.trigger_position, "top 80%");
    }

    #[test]
    fn test_empty_page_is_rejected() {
        assert!(matches!(PageSpec::from_toml(""), Err(Error::Page(_))));
        assert!(matches!(
            PageSpec::from_toml("[[sections]]\nbody = []"),
            Err(Error::Page(_))
        ));
    }

    #[test]
    fn test_demo_page() {
        let page = PageSpec::demo();
        assert!(page.sections.len() >= 4);
        assert_eq!(page.sections[0].immediate, Some(true));
        assert!(page.sections.iter().all(|s| !s.title.is_empty()));
    }
}
