//! Deferred image loading.
//!
//! Images declare their real source in data attributes. Until they come
//! within the bottom margin below the viewport they show a 1×1 transparent
//! SVG; then the real source is assigned exactly once. The margin is in
//! layout units: [`LAZY_BOTTOM_MARGIN`] pixels for a browser, a few rows
//! for a terminal.

use tracing::{debug, trace};

use crate::viewport::{ElementBox, RootMargin, Viewport};

pub const LAZY_THRESHOLD: f64 = 0.01;
/// Default bottom margin, in pixels.
pub const LAZY_BOTTOM_MARGIN: f64 = 200.0;

/// Transparent 1×1 SVG shown until the real source is assigned.
pub const PLACEHOLDER_SRC: &str =
    "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'%3E%3C/svg%3E";

/// Markup-level description of a lazy image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LazyImageSpec {
    pub id: String,
    pub alt: String,
    /// `src` present in the markup before loading, if any.
    pub src: Option<String>,
    pub data_src: Option<String>,
    pub data_srcset: Option<String>,
    pub data_sizes: Option<String>,
}

/// What gets assigned to the image element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Placeholder,
    Src(String),
    Srcset { srcset: String, sizes: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: String,
    pub source: ImageSource,
}

#[derive(Debug, Clone)]
pub struct LazyImage {
    pub spec: LazyImageSpec,
    pub current: Option<ImageSource>,
    pub loaded: bool,
    observed: bool,
}

pub struct LazyImageLoader {
    images: Vec<LazyImage>,
    observer_supported: bool,
    bottom_margin: f64,
}

impl LazyImageLoader {
    pub fn new(observer_supported: bool) -> Self {
        Self {
            images: Vec::new(),
            observer_supported,
            bottom_margin: LAZY_BOTTOM_MARGIN,
        }
    }

    /// Grow the viewport by `margin` layout units below its bottom edge.
    pub fn with_bottom_margin(mut self, margin: f64) -> Self {
        self.bottom_margin = margin.max(0.0);
        self
    }

    pub fn bottom_margin(&self) -> f64 {
        self.bottom_margin
    }

    /// Add an image. Without intersection support it loads immediately and
    /// the returned request should be applied right away.
    pub fn register(&mut self, spec: LazyImageSpec) -> Option<LoadRequest> {
        let mut image = LazyImage {
            current: spec.src.clone().map(ImageSource::Src),
            spec,
            loaded: false,
            observed: false,
        };

        if !self.observer_supported {
            let request = load_request(&mut image);
            self.images.push(image);
            return request;
        }

        if image.current.is_none() {
            image.current = Some(ImageSource::Placeholder);
        }
        image.observed = true;
        self.images.push(image);
        None
    }

    pub fn images(&self) -> &[LazyImage] {
        &self.images
    }

    pub fn get(&self, id: &str) -> Option<&LazyImage> {
        self.images.iter().find(|i| i.spec.id == id)
    }

    /// Load every observed image that intersects the grown viewport.
    pub fn on_viewport<F>(&mut self, viewport: &Viewport, layout: F) -> Vec<LoadRequest>
    where
        F: Fn(&str) -> Option<ElementBox>,
    {
        let margin = RootMargin::bottom(self.bottom_margin);
        let mut requests = Vec::new();
        for image in self.images.iter_mut().filter(|i| i.observed) {
            let Some(bounds) = layout(&image.spec.id) else {
                continue;
            };
            if viewport.intersects(bounds, margin, LAZY_THRESHOLD) {
                image.observed = false;
                requests.extend(load_request(image));
            }
        }
        if !requests.is_empty() {
            debug!("Loading {} lazy image(s)", requests.len());
        }
        requests
    }

    /// The real source finished loading: the image gets its `loaded` class.
    pub fn mark_loaded(&mut self, id: &str) {
        if let Some(image) = self.images.iter_mut().find(|i| i.spec.id == id) {
            image.loaded = true;
            trace!("Image {id} loaded");
        }
    }
}

/// `srcset` (with `sizes`) wins over `src`; with neither nothing changes.
fn load_request(image: &mut LazyImage) -> Option<LoadRequest> {
    let spec = &image.spec;
    let source = if let Some(srcset) = &spec.data_srcset {
        ImageSource::Srcset {
            srcset: srcset.clone(),
            sizes: spec.data_sizes.clone(),
        }
    } else if let Some(src) = &spec.data_src {
        ImageSource::Src(src.clone())
    } else {
        return None;
    };
    image.current = Some(source.clone());
    Some(LoadRequest {
        id: spec.id.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover() -> LazyImageSpec {
        LazyImageSpec {
            id: "cover".into(),
            alt: "Capa".into(),
            data_src: Some("cover.jpg".into()),
            data_srcset: Some("cover-480.jpg 480w, cover-960.jpg 960w".into()),
            data_sizes: Some("(max-width: 600px) 480px, 960px".into()),
            ..Default::default()
        }
    }

    fn author() -> LazyImageSpec {
        LazyImageSpec {
            id: "author".into(),
            data_src: Some("author.jpg".into()),
            ..Default::default()
        }
    }

    fn layout(id: &str) -> Option<ElementBox> {
        match id {
            "cover" => Some(ElementBox::new(280.0, 100.0)),
            "author" => Some(ElementBox::new(900.0, 100.0)),
            _ => None,
        }
    }

    #[test]
    fn registered_images_get_the_placeholder() {
        let mut loader = LazyImageLoader::new(true);
        assert!(loader.register(cover()).is_none());
        assert_eq!(
            loader.get("cover").unwrap().current,
            Some(ImageSource::Placeholder)
        );
    }

    #[test]
    fn loads_within_200px_below_and_only_once() {
        let mut loader = LazyImageLoader::new(true);
        loader.register(cover());
        loader.register(author());

        let vp = Viewport::new(0.0, 100.0, 2000.0);
        let requests = loader.on_viewport(&vp, layout);
        assert_eq!(
            requests,
            vec![LoadRequest {
                id: "cover".into(),
                source: ImageSource::Srcset {
                    srcset: "cover-480.jpg 480w, cover-960.jpg 960w".into(),
                    sizes: Some("(max-width: 600px) 480px, 960px".into()),
                },
            }]
        );
        assert!(loader.on_viewport(&vp, layout).is_empty());

        let vp = Viewport::new(700.0, 100.0, 2000.0);
        let requests = loader.on_viewport(&vp, layout);
        assert_eq!(requests[0].source, ImageSource::Src("author.jpg".into()));

        loader.mark_loaded("author");
        assert!(loader.get("author").unwrap().loaded);
        assert!(!loader.get("cover").unwrap().loaded);
    }

    #[test]
    fn row_margin_defers_images_further_down() {
        let mut loader = LazyImageLoader::new(true).with_bottom_margin(4.0);
        loader.register(LazyImageSpec {
            id: "cover".into(),
            data_src: Some("cover.jpg".into()),
            ..Default::default()
        });
        let rows = |id: &str| (id == "cover").then(|| ElementBox::new(30.0, 3.0));

        assert!(loader.on_viewport(&Viewport::new(0.0, 20.0, 60.0), rows).is_empty());
        assert!(loader.on_viewport(&Viewport::new(5.0, 20.0, 60.0), rows).is_empty());
        let requests = loader.on_viewport(&Viewport::new(8.0, 20.0, 60.0), rows);
        assert_eq!(requests[0].source, ImageSource::Src("cover.jpg".into()));
    }

    #[test]
    fn negative_margin_is_clamped() {
        let loader = LazyImageLoader::new(true).with_bottom_margin(-3.0);
        assert_eq!(loader.bottom_margin(), 0.0);
    }

    #[test]
    fn eager_load_without_observer_support() {
        let mut loader = LazyImageLoader::new(false);
        let request = loader.register(author()).unwrap();
        assert_eq!(request.source, ImageSource::Src("author.jpg".into()));
        assert!(loader.on_viewport(&Viewport::new(0.0, 1.0, 1.0), layout).is_empty());
    }

    #[test]
    fn existing_src_is_kept_instead_of_placeholder() {
        let mut loader = LazyImageLoader::new(true);
        loader.register(LazyImageSpec {
            src: Some("thumb.jpg".into()),
            ..author()
        });
        assert_eq!(
            loader.get("author").unwrap().current,
            Some(ImageSource::Src("thumb.jpg".into()))
        );
    }
}
