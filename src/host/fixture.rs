use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GuideError;
use crate::host::{Rect, UiSurface};

/// Declarative page fixture: routes, their elements, and optional click
/// effects. Loaded from YAML for headless playback, built directly in
/// tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDoc {
    /// Route shown before any navigation, defaults to "/"
    #[serde(default = "default_start_route")]
    pub start_route: String,

    #[serde(default = "default_viewport")]
    pub viewport: Rect,

    #[serde(default)]
    pub routes: BTreeMap<String, RouteFixture>,
}

fn default_start_route() -> String {
    "/".to_string()
}

fn default_viewport() -> Rect {
    Rect::new(0.0, 0.0, 1280.0, 800.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFixture {
    #[serde(default)]
    pub elements: BTreeMap<String, ElementFixture>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementFixture {
    #[serde(default)]
    pub rect: Rect,

    #[serde(default)]
    pub value: Option<String>,

    /// Hidden elements do not resolve until revealed by a click effect.
    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub on_click: Option<ClickEffect>,
}

/// What clicking an element does to the fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClickEffect {
    /// Selector (on the current route) to un-hide
    #[serde(default)]
    pub reveal: Option<String>,

    /// Route to navigate to
    #[serde(default)]
    pub goto: Option<String>,
}

/// Load a fixture document from a YAML file.
pub fn load_fixture(path: &str) -> Result<FixtureDoc, GuideError> {
    let shown = Path::new(path).display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| GuideError::Io {
        path: shown.clone(),
        source: e,
    })?;

    serde_yaml::from_str(&content).map_err(|e| GuideError::Yaml {
        path: shown,
        source: e,
    })
}

/// In-memory UiSurface over a FixtureDoc. Deterministic and inspectable:
/// it records every synthetic click so callers can assert on dispatch.
pub struct FixtureSurface {
    routes: BTreeMap<String, RouteFixture>,
    current_path: String,
    viewport: Rect,
    clicks: Vec<String>,
}

impl FixtureSurface {
    pub fn from_doc(doc: FixtureDoc) -> FixtureSurface {
        FixtureSurface {
            routes: doc.routes,
            current_path: doc.start_route,
            viewport: doc.viewport,
            clicks: Vec::new(),
        }
    }

    /// Empty surface with a single start route; elements are added with
    /// `insert_element`.
    pub fn blank() -> FixtureSurface {
        let mut routes = BTreeMap::new();
        routes.insert("/".to_string(), RouteFixture::default());
        FixtureSurface {
            routes,
            current_path: "/".to_string(),
            viewport: default_viewport(),
            clicks: Vec::new(),
        }
    }

    pub fn insert_element(&mut self, route: &str, selector: &str, rect: Rect) {
        self.routes
            .entry(route.to_string())
            .or_default()
            .elements
            .insert(
                selector.to_string(),
                ElementFixture {
                    rect,
                    ..Default::default()
                },
            );
    }

    pub fn insert_hidden(&mut self, route: &str, selector: &str, rect: Rect) {
        self.routes
            .entry(route.to_string())
            .or_default()
            .elements
            .insert(
                selector.to_string(),
                ElementFixture {
                    rect,
                    hidden: true,
                    ..Default::default()
                },
            );
    }

    /// Un-hide an element on the current route.
    pub fn reveal(&mut self, selector: &str) {
        if let Some(el) = self.element_mut(selector) {
            el.hidden = false;
        }
    }

    /// Move an element, simulating a layout change under an open step.
    pub fn move_element(&mut self, selector: &str, rect: Rect) {
        if let Some(el) = self.element_mut(selector) {
            el.rect = rect;
        }
    }

    pub fn value_of(&self, selector: &str) -> Option<&str> {
        self.routes
            .get(&self.current_path)
            .and_then(|r| r.elements.get(selector))
            .and_then(|el| el.value.as_deref())
    }

    /// Every selector clicked so far, in order.
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    fn element(&self, selector: &str) -> Option<&ElementFixture> {
        self.routes
            .get(&self.current_path)
            .and_then(|r| r.elements.get(selector))
    }

    fn element_mut(&mut self, selector: &str) -> Option<&mut ElementFixture> {
        self.routes
            .get_mut(&self.current_path)
            .and_then(|r| r.elements.get_mut(selector))
    }
}

impl UiSurface for FixtureSurface {
    fn current_path(&self) -> String {
        self.current_path.clone()
    }

    fn navigate_to(&mut self, path: &str) {
        // Unknown routes still render (as an empty page), like a SPA 404.
        self.routes.entry(path.to_string()).or_default();
        self.current_path = path.to_string();
    }

    fn query(&self, selector: &str) -> Option<Rect> {
        self.element(selector)
            .filter(|el| !el.hidden)
            .map(|el| el.rect)
    }

    fn click(&mut self, selector: &str) -> bool {
        let effect = match self.element(selector).filter(|el| !el.hidden) {
            Some(el) => el.on_click.clone(),
            None => return false,
        };

        self.clicks.push(selector.to_string());

        if let Some(effect) = effect {
            if let Some(reveal) = &effect.reveal {
                self.reveal(reveal);
            }
            if let Some(goto) = &effect.goto {
                self.navigate_to(goto);
            }
        }
        true
    }

    fn set_value(&mut self, selector: &str, value: &str) -> bool {
        match self.element_mut(selector).filter(|el| !el.hidden) {
            Some(el) => {
                el.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    fn select_option(&mut self, selector: &str, value: &str) -> bool {
        self.set_value(selector, value)
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}
