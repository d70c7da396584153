// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, GrayImage};

use crate::errors::TemplateError;
use crate::observability::messages::vision::{TemplateDirectoryLoaded, TemplateLoaded};
use crate::observability::messages::StructuredLog;
use crate::traits::TemplateStore;

use super::frame::LumaImage;

/// A named reference image, stored as grayscale luma.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    luma: LumaImage,
}

impl Template {
    pub fn from_image(name: impl Into<String>, image: &DynamicImage) -> Self {
        Self {
            name: name.into(),
            luma: image.to_luma32f(),
        }
    }

    pub fn from_luma8(name: impl Into<String>, image: GrayImage) -> Self {
        Self::from_image(name, &DynamicImage::ImageLuma8(image))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn luma(&self) -> &LumaImage {
        &self.luma
    }

    pub fn width(&self) -> u32 {
        self.luma.width()
    }

    pub fn height(&self) -> u32 {
        self.luma.height()
    }
}

/// In-memory template store keyed by template name (the image's file name).
///
/// Built once before a session starts and shared read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct TemplateLibrary {
    templates: HashMap<String, Arc<Template>>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: Template) {
        self.templates
            .insert(template.name().to_string(), Arc::new(template));
    }

    /// Load every `*.png` below `dir`, recursively, keyed by file name.
    ///
    /// A later file with the same name replaces an earlier one.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let mut library = Self::new();
        library.load_tree(dir)?;

        TemplateDirectoryLoaded {
            path: &dir.display().to_string(),
            template_count: library.len(),
        }
        .log();

        Ok(library)
    }

    fn load_tree(&mut self, dir: &Path) -> Result<(), TemplateError> {
        let entries = fs::read_dir(dir).map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_tree(&path)?;
                continue;
            }

            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_png {
                continue;
            }

            let image = image::open(&path).map_err(|source| TemplateError::Decode {
                path: path.clone(),
                source,
            })?;
            let template = Template::from_image(name, &image);

            TemplateLoaded {
                name,
                width: template.width(),
                height: template.height(),
            }
            .log();

            self.insert(template);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl TemplateStore for TemplateLibrary {
    fn resolve(&self, name: &str) -> Result<Arc<Template>, TemplateError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn checker(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| Luma([if (x + y) % 2 == 0 { 255 } else { 0 }]))
    }

    #[test]
    fn resolve_missing_template_is_not_found() {
        let library = TemplateLibrary::new();
        let err = library.resolve("start_button.png").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "start_button.png"));
    }

    #[test]
    fn load_dir_walks_subdirectories_and_keys_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("menus");
        std::fs::create_dir(&nested).unwrap();

        checker(4).save(dir.path().join("ok.png")).unwrap();
        checker(6).save(nested.join("close.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let library = TemplateLibrary::load_dir(dir.path()).unwrap();

        assert_eq!(library.len(), 2);
        assert!(library.contains("ok.png"));
        let close = library.resolve("close.png").unwrap();
        assert_eq!((close.width(), close.height()), (6, 6));
    }

    #[test]
    fn load_dir_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = TemplateLibrary::load_dir(dir.path().join("absent"));
        assert!(matches!(result, Err(TemplateError::Io { .. })));
    }
}
