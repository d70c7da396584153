// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::errors::RecognitionError;
use crate::graph::RecognitionAlgorithm;
use crate::observability::messages::vision::{RegionOutsideFrame, TemplateDoesNotFit, TemplateScored};
use crate::observability::messages::StructuredLog;
use crate::traits::{Match, RecognitionRequest, Recognizer, TemplateStore};

use super::frame::Frame;
use super::geometry::Point;
use super::matcher;

/// Recognizer backed by a [`TemplateStore`] and normalized correlation matching.
///
/// Recognition is pure: it reads the frame and the store and mutates neither.
pub struct VisionRecognizer {
    store: Arc<dyn TemplateStore>,
}

impl VisionRecognizer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    fn match_template(
        &self,
        frame: &Frame,
        request: &RecognitionRequest<'_>,
    ) -> Result<Option<Match>, RecognitionError> {
        let template = self.store.resolve(request.template)?;

        let scaled = request.roi.scale(request.reference, frame.resolution());
        let Some(region) = scaled.clamp_to(frame.resolution()) else {
            RegionOutsideFrame {
                task: request.task,
                region: scaled,
                frame: frame.resolution(),
            }
            .log();
            return Ok(None);
        };

        let crop = frame.crop(region);
        let Some(best) = matcher::match_template(&crop, template.luma()) else {
            TemplateDoesNotFit {
                task: request.task,
                template: template.name(),
                template_width: template.width(),
                template_height: template.height(),
                region,
            }
            .log();
            return Ok(None);
        };

        TemplateScored {
            task: request.task,
            template: template.name(),
            score: best.score,
            threshold: request.threshold,
        }
        .log();

        if best.score < request.threshold {
            return Ok(None);
        }

        Ok(Some(Match {
            location: Point::new(
                region.x + best.x + template.width() / 2,
                region.y + best.y + template.height() / 2,
            ),
            confidence: best.score,
        }))
    }
}

impl Recognizer for VisionRecognizer {
    fn recognize(
        &self,
        frame: &Frame,
        request: &RecognitionRequest<'_>,
    ) -> Result<Option<Match>, RecognitionError> {
        match request.algorithm {
            RecognitionAlgorithm::MatchTemplate => self.match_template(frame, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{Region, Resolution, Template, TemplateLibrary};
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    const REFERENCE: Resolution = Resolution::new(1280, 720);

    fn icon() -> GrayImage {
        GrayImage::from_fn(10, 10, |x, y| Luma([((x * 37 + y * 91) % 251) as u8]))
    }

    fn background(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 13 + y * 7) % 97) as u8]))
    }

    fn recognizer() -> VisionRecognizer {
        let mut library = TemplateLibrary::new();
        library.insert(Template::from_luma8("icon.png", icon()));
        VisionRecognizer::new(Arc::new(library))
    }

    fn request(roi: Region, threshold: f32) -> RecognitionRequest<'static> {
        RecognitionRequest {
            task: "FindIcon",
            algorithm: RecognitionAlgorithm::MatchTemplate,
            template: "icon.png",
            roi,
            reference: REFERENCE,
            threshold,
        }
    }

    #[test]
    fn match_center_is_reported_in_full_frame_coordinates() {
        // ROI (100,100,50,50) at 1280x720 becomes (150,150,75,75) at 1920x1080.
        let mut screen = background(1920, 1080);
        image::imageops::replace(&mut screen, &icon(), 160, 170);
        let frame = Frame::from_luma8(screen);

        let found = recognizer()
            .recognize(&frame, &request(Region::new(100, 100, 50, 50), 0.8))
            .unwrap()
            .expect("icon should be recognized");

        assert_eq!(found.location, Point::new(165, 175));
        assert!(found.confidence > 0.99);
    }

    #[test]
    fn colour_inputs_are_matched_on_luma() {
        let colour_icon = RgbImage::from_fn(10, 10, |x, y| {
            Rgb([((x * 37 + y * 91) % 251) as u8, (x * 20) as u8, (y * 25) as u8])
        });
        let mut screen = RgbImage::from_fn(1280, 720, |x, y| {
            Rgb([((x * 13 + y * 7) % 97) as u8, 40, 90])
        });
        image::imageops::replace(&mut screen, &colour_icon, 300, 200);

        let mut library = TemplateLibrary::new();
        library.insert(Template::from_image(
            "icon.png",
            &DynamicImage::ImageRgb8(colour_icon),
        ));
        let frame = Frame::from_image(&DynamicImage::ImageRgb8(screen));

        let found = VisionRecognizer::new(Arc::new(library))
            .recognize(&frame, &request(Region::new(250, 150, 100, 100), 0.8))
            .unwrap()
            .expect("colour icon should be recognized");

        assert_eq!(found.location, Point::new(305, 205));
        assert!(found.confidence > 0.99);
    }

    #[test]
    fn target_outside_roi_is_not_found() {
        let mut screen = background(1280, 720);
        image::imageops::replace(&mut screen, &icon(), 600, 400);
        let frame = Frame::from_luma8(screen);

        let found = recognizer()
            .recognize(&frame, &request(Region::new(0, 0, 100, 100), 0.8))
            .unwrap();

        assert!(found.is_none());
    }

    #[test]
    fn flat_screen_scores_below_threshold() {
        let frame = Frame::from_luma8(GrayImage::from_pixel(1280, 720, Luma([40])));
        let found = recognizer()
            .recognize(&frame, &request(Region::new(0, 0, 64, 64), 0.5))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn roi_smaller_than_template_is_no_match() {
        let frame = Frame::from_luma8(background(1280, 720));
        let found = recognizer()
            .recognize(&frame, &request(Region::new(0, 0, 5, 5), 0.0))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn roi_beyond_small_frame_is_no_match() {
        // Frame is smaller than the reference; the ROI maps past its right edge.
        let frame = Frame::from_luma8(background(64, 36));
        let found = recognizer()
            .recognize(&frame, &request(Region::new(1270, 0, 10, 10), 0.0))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn unknown_template_is_an_error() {
        let frame = Frame::from_luma8(background(1280, 720));
        let mut req = request(Region::full(REFERENCE), 0.8);
        req.template = "missing.png";

        let result = recognizer().recognize(&frame, &req);
        assert!(matches!(result, Err(RecognitionError::Template(_))));
    }
}
