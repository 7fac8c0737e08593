use crate::achievement::animations::Frame;
use crate::achievement::badge::{Badge, CONTAINER_CLASS, ID_ATTRIBUTE};
use crate::achievement::request::AchievementId;
use crate::achievement::surface::{StyleSheets, Surface, SurfaceError, ensure_keyframes};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

const ROOT_ID: &str = "root";

#[derive(Clone, Copy, Debug)]
enum Container {
    /// The `#root` element of the widget's own document.
    Root,
    /// The body of the host page.
    Body,
}

/// Renders badges as elements of a document.
pub(crate) struct DomSurface {
    document: Document,
    container: Container,
}

impl DomSurface {
    /// Render inside the widget's own frame.
    pub(crate) fn inline(document: Document) -> Self {
        Self { document, container: Container::Root }
    }

    /// Render at the top level of a host page.
    pub(crate) fn page(document: Document) -> Self {
        Self { document, container: Container::Body }
    }

    fn container(&self) -> Result<Element, SurfaceError> {
        match self.container {
            Container::Root => self
                .document
                .get_element_by_id(ROOT_ID)
                .ok_or_else(|| SurfaceError::MissingContainer(format!("#{ROOT_ID}"))),
            Container::Body => {
                self.document.body().map(Element::from).ok_or_else(|| SurfaceError::MissingContainer("body".into()))
            }
        }
    }

    fn find(&self, id: AchievementId) -> Option<HtmlElement> {
        let container = self.container().ok()?;
        let element = container.query_selector(&format!("[{ID_ATTRIBUTE}=\"{id}\"]")).ok()??;
        element.dyn_into().ok()
    }

    // Leftovers from a previous widget instance are removed so only one badge is ever attached.
    fn clear(&self, container: &Element) -> Result<(), SurfaceError> {
        while let Some(element) = container.query_selector(&format!(".{CONTAINER_CLASS}")).map_err(dom_error)? {
            element.remove();
        }
        Ok(())
    }
}

impl Surface for DomSurface {
    fn mount(&mut self, badge: &Badge) -> Result<(), SurfaceError> {
        let container = self.container()?;
        ensure_keyframes(&mut self.document)?;
        self.clear(&container)?;

        let element = self.document.create_element("div").map_err(dom_error)?;
        element.set_class_name(CONTAINER_CLASS);
        element.set_attribute(ID_ATTRIBUTE, &badge.id().to_string()).map_err(dom_error)?;
        element.set_attribute("style", &badge.container_style_attribute()).map_err(dom_error)?;
        element.set_inner_html(&badge.inner_html());
        container.append_child(&element).map_err(dom_error)?;
        Ok(())
    }

    fn apply_frame(&mut self, badge: &Badge, frame: Frame) -> Result<bool, SurfaceError> {
        let Some(element) = self.find(badge.id()) else {
            return Ok(false);
        };
        let style = element.style();
        for (property, value) in badge.frame_style(frame) {
            style.set_property(property, &value).map_err(dom_error)?;
        }
        Ok(true)
    }

    fn unmount(&mut self, id: AchievementId) -> Result<bool, SurfaceError> {
        let Some(element) = self.find(id) else {
            return Ok(false);
        };
        element.remove();
        Ok(true)
    }
}

impl StyleSheets for Document {
    fn contains(&self, id: &str) -> bool {
        self.get_element_by_id(id).is_some()
    }

    fn insert(&mut self, id: &str, css: &str) -> Result<(), SurfaceError> {
        let head = self.head().ok_or_else(|| SurfaceError::MissingContainer("head".into()))?;
        let style = self.create_element("style").map_err(dom_error)?;
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style).map_err(dom_error)?;
        Ok(())
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn dom_error(value: JsValue) -> SurfaceError {
    SurfaceError::Dom(describe(&value))
}
